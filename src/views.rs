//! Card builders and the handlers their widgets call.
//!
//! Each view module owns its builder and the handlers wired to its widgets,
//! and lists them in its `HANDLERS` table. [`handlers`] gathers every table
//! for the action registry.

pub mod create_task;
mod error;
mod icons;
pub mod partner;
pub mod search_partner;

#[cfg(test)]
pub(crate) mod fixture;

use tracing::{info, warn};

use crate::action::{Env, Handler, HandlerError};
use crate::card::{Section, Widget};
use crate::ledger::RecordKind;
use crate::model::{Email, ErrorMessage, State};
use crate::server::PartnerLookup;

/// Name of the root card. Both canonical views use it, so the host can
/// always pop back to it.
pub const ROOT_CARD: &str = "root";

/// The card a state must be shown with when rendered from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// The contact lookup failed; nothing to show but the error.
    ServerError,

    /// A known or unknown contact.
    Partner,
}

/// Every handler registered by the views.
pub fn handlers() -> Vec<(&'static str, Handler)> {
    [
        partner::HANDLERS,
        search_partner::HANDLERS,
        create_task::HANDLERS,
    ]
    .concat()
}

pub fn canonical(state: &State) -> ViewKind {
    if state.partner.id.is_none() && state.error.is_some() {
        ViewKind::ServerError
    } else {
        ViewKind::Partner
    }
}

/// Build the canonical card for `state`.
pub fn build_view(env: &Env<'_>, state: &State) -> Result<crate::card::Card, HandlerError> {
    match canonical(state) {
        ViewKind::ServerError => error::build(env, state),
        ViewKind::Partner => partner::build(env, state),
    }
}

/// Fresh top-level render for a newly opened email.
pub fn open(env: &Env<'_>, email: Email) -> Result<crate::card::Card, HandlerError> {
    info!(message_id = %email.message_id, "opening email");
    let lookup = env
        .server
        .get_partner(&email.sender_email, &email.sender_name, None);
    let state = state_from_lookup(lookup, email);
    build_view(env, &state)
}

/// A fresh state for a contact lookup, with nothing searched yet.
pub fn state_from_lookup(lookup: PartnerLookup, email: Email) -> State {
    let mut state = State::new(lookup.partner, email);
    state.odoo_user_companies = lookup.companies;
    state.can_create_partner = lookup.can_create_partner;
    state.can_create_project = lookup.can_create_project;
    state.error = lookup.error;
    state
}

/// What happened when asked to log the email on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    Logged,
    AlreadyLogged,

    /// The server refused; `state.error` says why.
    Failed,
}

/// Check the ledger, log remotely, and mark the ledger only on success.
///
/// A failed remote call leaves the ledger untouched so the user can retry.
pub fn log_email_once(
    env: &Env<'_>,
    state: &mut State,
    kind: RecordKind,
    id: i64,
) -> Result<LogOutcome, HandlerError> {
    let message_id = state.email.message_id.clone();
    if !env.ledger.check(&message_id, kind, id)? {
        return Ok(LogOutcome::AlreadyLogged);
    }

    match env.server.log_email(id, kind, &state.email) {
        Ok(()) => {
            env.ledger.mark_logged(&message_id, kind, id)?;
            state.error = None;
            info!(%message_id, ?kind, id, "email logged");
            Ok(LogOutcome::Logged)
        }
        Err(error) => {
            warn!(%message_id, ?kind, id, ?error, "failed to log email");
            state.error = Some(error);
            Ok(LogOutcome::Failed)
        }
    }
}

/// Translation key of the "already logged" message for a record kind.
pub fn already_logged_key(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Partners => "Email already logged on the contact",
        RecordKind::Projects => "Email already logged on the project",
        RecordKind::Tasks => "Email already logged on the task",
    }
}

/// Inline rendering of a remote error.
fn error_section(env: &Env<'_>, error: &ErrorMessage) -> Section {
    let mut section = Section::new().widget(Widget::paragraph(format!(
        "<font color=\"#d9534f\">{}</font>",
        env.t(error.summary_key())
    )));
    if let Some(message) = &error.message {
        section.push(Widget::paragraph(message.clone()));
    }
    section
}
