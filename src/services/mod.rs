pub mod config;
pub mod logging;
pub mod ocr;
pub mod server;
