//! In-memory business server for tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use crate::ledger::RecordKind;
use crate::model::{Email, ErrorMessage, Partner, Project, Task};

use super::{BusinessServer, PartnerLookup};

/// Serves canned records and records every call by name.
#[derive(Debug, Default)]
pub struct FakeServer {
    pub projects: Vec<Project>,
    pub partners: Vec<Partner>,
    pub can_create_project: bool,
    pub fail_search: bool,
    pub fail_create_project: bool,
    pub fail_create_task: bool,
    pub fail_log_email: bool,
    pub fail_lookup: bool,
    /// Last id handed out; created records get the next multiple of 100.
    pub next_id: Cell<i64>,
    /// Method names, in call order.
    pub calls: RefCell<Vec<String>>,
}

impl FakeServer {
    pub fn calls_to(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == name).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, name: &str) {
        self.calls.borrow_mut().push(name.to_string());
    }

    fn next_id(&self) -> i64 {
        let id = self.next_id.get() + 100;
        self.next_id.set(id);
        id
    }
}

impl BusinessServer for FakeServer {
    fn search_projects(&self, query: &str) -> Result<Vec<Project>, ErrorMessage> {
        self.record("search_projects");
        if self.fail_search {
            return Err(ErrorMessage::connection());
        }
        let query = query.to_lowercase();
        Ok(self
            .projects
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    fn create_project(&self, name: &str) -> Result<Project, ErrorMessage> {
        self.record("create_project");
        if self.fail_create_project {
            return Err(ErrorMessage::server("project creation refused"));
        }
        Ok(Project {
            id: self.next_id(),
            name: name.to_string(),
            partner_name: None,
        })
    }

    fn create_task(
        &self,
        _partner_id: i64,
        _project_id: i64,
        _body: &str,
        subject: &str,
    ) -> Result<Task, ErrorMessage> {
        self.record("create_task");
        if self.fail_create_task {
            return Err(ErrorMessage::server("task creation refused"));
        }
        Ok(Task {
            id: self.next_id(),
            name: subject.to_string(),
            project_name: None,
        })
    }

    fn get_partner(&self, email: &str, name: &str, id: Option<i64>) -> PartnerLookup {
        self.record("get_partner");
        if self.fail_lookup {
            return PartnerLookup::failed(email, name, ErrorMessage::connection());
        }
        let found = self.partners.iter().find(|p| match id {
            Some(id) => p.id == Some(id),
            None => p.email.as_deref() == Some(email),
        });
        PartnerLookup {
            partner: found
                .cloned()
                .unwrap_or_else(|| Partner::from_sender(name, email)),
            companies: BTreeSet::from([1]),
            can_create_partner: true,
            can_create_project: self.can_create_project,
            error: None,
        }
    }

    fn search_partners(&self, query: &str) -> Result<Vec<Partner>, ErrorMessage> {
        self.record("search_partners");
        if self.fail_search {
            return Err(ErrorMessage::connection());
        }
        let query = query.to_lowercase();
        Ok(self
            .partners
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p
                        .email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&query))
            })
            .cloned()
            .collect())
    }

    fn log_email(
        &self,
        _record_id: i64,
        _kind: RecordKind,
        _email: &Email,
    ) -> Result<(), ErrorMessage> {
        self.record("log_email");
        if self.fail_log_email {
            return Err(ErrorMessage::server("cannot log"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_update_keeps_call_log_empty() {
        let server = FakeServer {
            fail_search: true,
            ..FakeServer::default()
        };

        assert!(server.search_projects("").is_err());
        assert!(server.create_project("Moonshot").is_ok());
        assert_eq!(server.calls_to("search_projects"), 1);
        assert_eq!(server.total_calls(), 2);
        assert_eq!(server.next_id.get(), 100);
    }
}
