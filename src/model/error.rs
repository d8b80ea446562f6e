//! Remote error descriptors.

use serde::{Deserialize, Serialize};

/// Category of a failed business-server call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    /// The server could not be reached.
    Connection,

    /// The server answered with an error.
    Server,
}

/// A failed server operation, stored in the state and rendered inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub code: ErrorCode,

    /// Server-provided detail, shown under the generic message when present.
    pub message: Option<String>,
}

impl ErrorMessage {
    pub fn connection() -> Self {
        Self {
            code: ErrorCode::Connection,
            message: None,
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Server,
            message: Some(message.into()),
        }
    }

    /// Translation key of the generic message for this error.
    pub fn summary_key(&self) -> &'static str {
        match self.code {
            ErrorCode::Connection => "Could not connect to the database.",
            ErrorCode::Server => "An error occurred on the server.",
        }
    }
}
