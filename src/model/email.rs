//! The email currently open in the host mail client.

use serde::{Deserialize, Serialize};

/// The email being processed.
///
/// `message_id` is the host's stable identifier for the message and keys the
/// logging ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub message_id: String,
    pub subject: String,
    pub body: String,
    pub sender_name: String,
    pub sender_email: String,
}
