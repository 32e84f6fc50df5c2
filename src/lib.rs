pub mod cli;
pub mod config;
pub mod display;
pub mod embed_provider;
pub mod embedder;
pub mod error;
pub mod export;
pub mod loader;
pub mod pipeline;
