//! Core translation engine module

pub mod client;
pub mod config;
pub mod errors;
pub mod interaction;
pub mod languages;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod testing;
pub mod writer;
