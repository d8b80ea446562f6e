//! Contacts.

use serde::{Deserialize, Serialize};

use super::Task;

/// A contact in the business server.
///
/// `id` is absent for a sender that has no matching contact yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub image: Option<String>,
    pub is_company: bool,
    pub is_writeable: bool,

    /// Tasks already linked to this contact.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Partner {
    /// A contact known only from the email headers.
    pub fn from_sender(name: &str, email: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            email: Some(email.to_string()).filter(|e| !e.is_empty()),
            image: None,
            is_company: false,
            is_writeable: false,
            tasks: Vec::new(),
        }
    }
}
