//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::generation::{GenerationClient, GenerationError};

/// How a [`ScriptedClient`] ends its reply after sending its chunks.
pub enum Ending {
    Complete,
    Fail(String),
    /// Never finishes. Used to exercise cancellation.
    Hang,
}

/// A client that replays a fixed list of chunks.
pub struct ScriptedClient {
    chunks: Vec<String>,
    ending: Ending,
}

impl ScriptedClient {
    pub fn replying(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            ending: Ending::Complete,
        }
    }

    pub fn failing(chunks: &[&str], message: &str) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            ending: Ending::Fail(message.to_string()),
        }
    }

    pub fn hanging(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            ending: Ending::Hang,
        }
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _prompt: &str, sender: Sender<String>) -> Result<(), GenerationError> {
        for chunk in &self.chunks {
            sender
                .send(chunk.clone())
                .await
                .map_err(|_| GenerationError::ChannelClosed)?;
        }
        match &self.ending {
            Ending::Complete => Ok(()),
            Ending::Fail(message) => Err(GenerationError::Network(message.clone())),
            Ending::Hang => loop {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            },
        }
    }
}

/// Creates a test App whose client replies with nothing.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(ScriptedClient::replying(&[])))
}
