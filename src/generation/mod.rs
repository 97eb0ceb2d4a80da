pub mod client;
pub mod http;

pub use client::{GenerationClient, GenerationError};
pub use http::HttpGenerationClient;
