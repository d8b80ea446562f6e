//! Business-server collaborator.
//!
//! Every call reports failure as an [`ErrorMessage`] value. Nothing here
//! panics or aborts the handler; handlers decide whether the failure is shown
//! inline or as a notification.

#[cfg(test)]
pub mod fake;
mod http;

use std::collections::BTreeSet;

use crate::ledger::RecordKind;
use crate::model::{Email, ErrorMessage, Partner, Project, Task};

pub use http::HttpServer;

/// Result of looking up the contact behind an email.
///
/// Always carries a partner: on failure it is the sender as read from the
/// email headers, and `error` says why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerLookup {
    pub partner: Partner,
    pub companies: BTreeSet<i64>,
    pub can_create_partner: bool,
    pub can_create_project: bool,
    pub error: Option<ErrorMessage>,
}

impl PartnerLookup {
    pub fn failed(email: &str, name: &str, error: ErrorMessage) -> Self {
        Self {
            partner: Partner::from_sender(name, email),
            companies: BTreeSet::new(),
            can_create_partner: false,
            can_create_project: false,
            error: Some(error),
        }
    }
}

pub trait BusinessServer {
    fn search_projects(&self, query: &str) -> Result<Vec<Project>, ErrorMessage>;

    fn create_project(&self, name: &str) -> Result<Project, ErrorMessage>;

    fn create_task(
        &self,
        partner_id: i64,
        project_id: i64,
        body: &str,
        subject: &str,
    ) -> Result<Task, ErrorMessage>;

    /// Find the contact by id, or by email and name when `id` is `None`.
    fn get_partner(&self, email: &str, name: &str, id: Option<i64>) -> PartnerLookup;

    fn search_partners(&self, query: &str) -> Result<Vec<Partner>, ErrorMessage>;

    /// Post the email on the record's history.
    fn log_email(&self, record_id: i64, kind: RecordKind, email: &Email)
    -> Result<(), ErrorMessage>;
}
