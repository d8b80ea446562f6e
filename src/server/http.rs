//! JSON-RPC client for the business server's mail plugin routes.
//!
//! Each call is a `POST` of `{"jsonrpc": "2.0", "method": "call", "params": …}`
//! to a `mail_plugin/...` route, resolved below the configured server URL.
//! Transport failures become connection errors, JSON-RPC errors and error
//! statuses become server errors.

use std::collections::BTreeSet;

use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::ledger::RecordKind;
use crate::model::{Email, ErrorMessage, Partner, Project, Task};

use super::{BusinessServer, PartnerLookup};

pub struct HttpServer {
    client: Client,
    base: Url,
    api_key: Option<String>,
}

impl HttpServer {
    pub fn new(base: Url, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base,
            api_key,
        })
    }

    /// `route` is relative: joined below any path prefix of the base URL.
    fn endpoint(&self, route: &str) -> Result<Url, url::ParseError> {
        self.base.join(route)
    }

    fn call<T: DeserializeOwned>(&self, route: &str, params: Value) -> Result<T, ErrorMessage> {
        self.send::<T>(route, params)?.into_result()
    }

    fn send<T: DeserializeOwned>(
        &self,
        route: &str,
        params: Value,
    ) -> Result<RpcResponse<T>, ErrorMessage> {
        let url = self.endpoint(route).map_err(|e| {
            warn!(route, error = %e, "invalid route");
            ErrorMessage::connection()
        })?;
        debug!(%url, "calling business server");

        let mut request = self.client.post(url).json(&json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": params,
        }));
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, key);
        }

        let response = request.send().map_err(|e| {
            warn!(route, error = %e, "business server unreachable");
            ErrorMessage::connection()
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(route, %status, "business server returned an error status");
            return Err(ErrorMessage::server(format!("HTTP {status}")));
        }

        response.json().map_err(|e| {
            warn!(route, error = %e, "unreadable response");
            ErrorMessage::server(format!("unreadable response: {e}"))
        })
    }
}

impl BusinessServer for HttpServer {
    fn search_projects(&self, query: &str) -> Result<Vec<Project>, ErrorMessage> {
        let projects: Vec<WireProject> =
            self.call("mail_plugin/project/search", json!({ "search_term": query }))?;
        Ok(projects.into_iter().map(WireProject::into_project).collect())
    }

    fn create_project(&self, name: &str) -> Result<Project, ErrorMessage> {
        let project: WireProject =
            self.call("mail_plugin/project/create", json!({ "name": name }))?;
        Ok(project.into_project())
    }

    fn create_task(
        &self,
        partner_id: i64,
        project_id: i64,
        body: &str,
        subject: &str,
    ) -> Result<Task, ErrorMessage> {
        let task: WireTask = self.call(
            "mail_plugin/task/create",
            json!({
                "partner_id": partner_id,
                "project_id": project_id,
                "email_body": body,
                "email_subject": subject,
            }),
        )?;
        Ok(task.into_task())
    }

    fn get_partner(&self, email: &str, name: &str, id: Option<i64>) -> PartnerLookup {
        let result: Result<WirePartnerLookup, _> = self.call(
            "mail_plugin/partner/get",
            json!({ "email": email, "name": name, "partner_id": id }),
        );
        match result {
            Ok(lookup) => lookup.into_lookup(email, name),
            Err(error) => PartnerLookup::failed(email, name, error),
        }
    }

    fn search_partners(&self, query: &str) -> Result<Vec<Partner>, ErrorMessage> {
        let found: WirePartnerSearch =
            self.call("mail_plugin/partner/search", json!({ "search_term": query }))?;
        Ok(found
            .partners
            .into_iter()
            .map(WirePartner::into_partner)
            .collect())
    }

    fn log_email(
        &self,
        record_id: i64,
        kind: RecordKind,
        email: &Email,
    ) -> Result<(), ErrorMessage> {
        self.send::<Value>(
            "mail_plugin/log_mail_content",
            json!({
                "res_id": record_id,
                "model": kind.model(),
                "message": log_message(email),
            }),
        )?
        .into_ack()
    }
}

/// The HTML posted on a record's history when an email is logged.
fn log_message(email: &Email) -> String {
    format!(
        "<p><b>From:</b> {} &lt;{}&gt;</p><p><b>Subject:</b> {}</p>{}",
        escape(&email.sender_name),
        escape(&email.sender_email),
        escape(&email.subject),
        email.body
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ── Wire format ──

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: String,
    data: Option<RpcErrorData>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorData {
    message: String,
}

impl<T> RpcResponse<T> {
    fn into_result(self) -> Result<T, ErrorMessage> {
        if let Some(error) = self.error {
            return Err(error.into_message());
        }
        self.result
            .ok_or_else(|| ErrorMessage::server("empty response"))
    }

    /// Success unless the server reported an error. The result may be null.
    fn into_ack(self) -> Result<(), ErrorMessage> {
        match self.error {
            Some(error) => Err(error.into_message()),
            None => Ok(()),
        }
    }
}

impl RpcError {
    fn into_message(self) -> ErrorMessage {
        ErrorMessage::server(self.data.map_or(self.message, |d| d.message))
    }
}

#[derive(Debug, Deserialize)]
struct WireProject {
    project_id: i64,
    name: String,
    #[serde(default)]
    partner_name: Option<String>,
}

impl WireProject {
    fn into_project(self) -> Project {
        Project {
            id: self.project_id,
            name: self.name,
            partner_name: self.partner_name.filter(|n| !n.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireTask {
    task_id: i64,
    name: String,
    #[serde(default)]
    project_name: Option<String>,
}

impl WireTask {
    fn into_task(self) -> Task {
        Task {
            id: self.task_id,
            name: self.name,
            project_name: self.project_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WirePartner {
    /// Missing or non-positive for a contact that does not exist yet.
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    is_company: bool,
    #[serde(default)]
    can_write_on_partner: bool,
}

impl WirePartner {
    fn into_partner(self) -> Partner {
        Partner {
            id: self.id.filter(|id| *id > 0),
            name: self.name,
            email: self.email.filter(|e| !e.is_empty()),
            image: self.image.filter(|i| !i.is_empty()),
            is_company: self.is_company,
            is_writeable: self.can_write_on_partner,
            tasks: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WirePartnerSearch {
    #[serde(default)]
    partners: Vec<WirePartner>,
}

#[derive(Debug, Deserialize)]
struct WirePartnerLookup {
    partner: Option<WirePartner>,
    #[serde(default)]
    user_companies: BTreeSet<i64>,
    #[serde(default)]
    can_create_partner: bool,
    #[serde(default)]
    can_create_project: bool,
    #[serde(default)]
    tasks: Vec<WireTask>,
}

impl WirePartnerLookup {
    fn into_lookup(self, email: &str, name: &str) -> PartnerLookup {
        let mut partner = self.partner.map_or_else(
            || Partner::from_sender(name, email),
            WirePartner::into_partner,
        );
        partner.tasks = self.tasks.into_iter().map(WireTask::into_task).collect();
        PartnerLookup {
            partner,
            companies: self.user_companies,
            can_create_partner: self.can_create_partner,
            can_create_project: self.can_create_project,
            error: None,
        }
    }
}
