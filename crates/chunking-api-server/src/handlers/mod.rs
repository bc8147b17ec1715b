pub mod chunk;
pub mod health;
pub mod strategies;
pub mod upload;
