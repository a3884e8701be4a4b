use std::io;
use std::path::PathBuf;

/// Custom error type for drone_discord operations
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {}", render_chain(.0))]
    Template(#[from] tera::Error),

    #[error("Failed to read file '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Request to webhook failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Discord API error (status {status}): {message} (code {code})")]
    RemoteApi {
        status: u16,
        message: String,
        code: i64,
    },

    #[error("Unexpected webhook response (status {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

impl NotifyError {
    /// HTTP status reported by the webhook endpoint, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            NotifyError::RemoteApi { status, .. } | NotifyError::UnexpectedResponse { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

// tera keeps the useful part ("Variable `x` not found") in the source chain.
fn render_chain(err: &tera::Error) -> String {
    let mut msg = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    msg
}

/// Helper type for Results that use NotifyError
pub type Result<T> = std::result::Result<T, NotifyError>;
