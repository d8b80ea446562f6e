//! State snapshot: everything a card builder needs to redraw itself.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Email, ErrorMessage, Partner, Project};

/// A snapshot of the panel, rebuilt from its serialized form on every
/// invocation.
///
/// Search results distinguish "never searched" (`None`) from "searched,
/// nothing found" (`Some` of an empty list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// The contact linked to the open email.
    pub partner: Partner,

    pub email: Email,

    pub searched_projects: Option<Vec<Project>>,

    pub searched_partners: Option<Vec<Partner>>,

    /// Set when the last attempted server operation failed.
    pub error: Option<ErrorMessage>,

    pub can_create_project: bool,

    pub can_create_partner: bool,

    /// Companies the viewer may act as.
    pub odoo_user_companies: BTreeSet<i64>,
}

impl State {
    /// A fresh state with nothing searched yet.
    pub fn new(partner: Partner, email: Email) -> Self {
        Self {
            partner,
            email,
            searched_projects: None,
            searched_partners: None,
            error: None,
            can_create_project: false,
            can_create_partner: false,
            odoo_user_companies: BTreeSet::new(),
        }
    }

    /// Record the outcome of a server call: clears or sets `error`.
    pub fn record<T>(&mut self, result: Result<T, ErrorMessage>) -> Option<T> {
        match result {
            Ok(value) => {
                self.error = None;
                Some(value)
            }
            Err(error) => {
                self.error = Some(error);
                None
            }
        }
    }
}
