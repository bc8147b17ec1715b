pub mod chunking;
pub mod config;
pub mod document;
pub mod handlers;
pub mod services;
pub mod utils;
