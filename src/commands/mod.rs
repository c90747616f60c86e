pub mod config;
pub mod ocr;
pub mod server;
