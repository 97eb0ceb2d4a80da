use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

/// Errors that can occur while generating a reply.
#[derive(Debug)]
pub enum GenerationError {
    /// Transport failure reaching the endpoint (DNS, refused connection, timeout).
    Network(String),
    /// The endpoint answered with a non-2xx status.
    Backend { status: u16, reason: String },
    /// The consumer dropped the receiving end of the chunk channel.
    ChannelClosed,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Network(msg) => write!(f, "{msg}"),
            GenerationError::Backend { status, reason } => {
                write!(f, "Backend connection failed: {status} {reason}")
            }
            GenerationError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Source of model replies.
///
/// A reply is a lazy, finite sequence of text chunks. Implementations send each
/// chunk on `sender` in order and return `Ok(())` once the sequence is complete.
/// The sequence cannot be restarted: call `generate` again for a new reply.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Generates a reply to `prompt`, streaming chunks to `sender`.
    ///
    /// `prompt` is expected to be non-empty and already trimmed.
    async fn generate(&self, prompt: &str, sender: Sender<String>) -> Result<(), GenerationError>;
}
