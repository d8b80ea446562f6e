//! Contact card: the root of the stack for a linked contact.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{Env, Handler, HandlerError, Inputs, arguments};
use crate::card::{Card, CardHeader, ImageButton, Section, Widget};
use crate::ledger::{LoggingState, RecordKind};
use crate::model::State;
use crate::navigation::{ActionResponse, notify, pop_to, push, replace_top, reset_to_root};

use super::{
    LogOutcome, ROOT_CARD, already_logged_key, build_view, create_task, error_section, icons,
    log_email_once, search_partner, state_from_lookup,
};

pub const LOG_EMAIL_CONTACT: &str = "log_email_contact";
pub const LOG_EMAIL_TASK: &str = "log_email_task";
pub const EMAIL_ALREADY_LOGGED: &str = "email_already_logged";
pub const OPEN_SEARCH_PARTNER: &str = "open_search_partner";
pub const OPEN_CREATE_TASK: &str = "open_create_task";
pub const RELOAD_PARTNER: &str = "reload_partner";
pub const BACK_TO_CONTACT: &str = "back_to_contact";

pub(super) const HANDLERS: &[(&str, Handler)] = &[
    (LOG_EMAIL_CONTACT, on_log_email_contact),
    (LOG_EMAIL_TASK, on_log_email_task),
    (EMAIL_ALREADY_LOGGED, on_email_already_logged),
    (OPEN_SEARCH_PARTNER, on_open_search_partner),
    (OPEN_CREATE_TASK, on_open_create_task),
    (RELOAD_PARTNER, on_reload_partner),
    (BACK_TO_CONTACT, on_back_to_contact),
];

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogTaskArgs {
    task_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct AlreadyLoggedArgs {
    kind: RecordKind,
}

fn on_log_email_contact(
    env: &Env<'_>,
    mut state: State,
    _arguments: Value,
    _inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    let id = state.partner.id.ok_or_else(|| {
        HandlerError::Precondition(env.t("This contact does not exist in the Odoo database."))
    })?;

    match log_email_once(env, &mut state, RecordKind::Partners, id)? {
        LogOutcome::AlreadyLogged => Ok(notify(env.t(already_logged_key(RecordKind::Partners)))),
        LogOutcome::Logged | LogOutcome::Failed => Ok(replace_top(build(env, &state)?)),
    }
}

fn on_log_email_task(
    env: &Env<'_>,
    mut state: State,
    args: Value,
    _inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    let args: LogTaskArgs = arguments(args)?;
    if !state.partner.tasks.iter().any(|t| t.id == args.task_id) {
        return Err(HandlerError::Precondition(
            env.t("This task does not exist in the Odoo database."),
        ));
    }

    match log_email_once(env, &mut state, RecordKind::Tasks, args.task_id)? {
        LogOutcome::AlreadyLogged => Ok(notify(env.t(already_logged_key(RecordKind::Tasks)))),
        LogOutcome::Logged | LogOutcome::Failed => Ok(replace_top(build(env, &state)?)),
    }
}

fn on_email_already_logged(
    env: &Env<'_>,
    _state: State,
    args: Value,
    _inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    let args: AlreadyLoggedArgs = arguments(args)?;
    Ok(notify(env.t(already_logged_key(args.kind))))
}

fn on_open_search_partner(
    env: &Env<'_>,
    mut state: State,
    _arguments: Value,
    _inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    let query = state
        .partner
        .email
        .clone()
        .unwrap_or_else(|| state.email.sender_email.clone());

    let found = state.record(env.server.search_partners(&query));
    state.searched_partners = Some(found.unwrap_or_default());

    Ok(push(search_partner::build(env, &state, &query, true)?))
}

fn on_open_create_task(
    env: &Env<'_>,
    mut state: State,
    _arguments: Value,
    _inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    if state.partner.id.is_none() {
        return Err(HandlerError::Precondition(
            env.t("This contact does not exist in the Odoo database."),
        ));
    }

    state.searched_projects = None;
    Ok(push(create_task::build(env, &mut state, "", false)?))
}

fn on_reload_partner(
    env: &Env<'_>,
    state: State,
    _arguments: Value,
    _inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    let email = state.partner.email.as_deref().unwrap_or(&state.email.sender_email);
    let lookup = env
        .server
        .get_partner(email, &state.partner.name, state.partner.id);
    let state = state_from_lookup(lookup, state.email);

    Ok(reset_to_root(build_view(env, &state)?))
}

fn on_back_to_contact(
    env: &Env<'_>,
    state: State,
    _arguments: Value,
    _inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    Ok(pop_to(ROOT_CARD, build_view(env, &state)?))
}

/// Build the contact card.
pub fn build(env: &Env<'_>, state: &State) -> Result<Card, HandlerError> {
    let logged = env.ledger.logged(&state.email.message_id)?;
    let partner = &state.partner;

    let mut card = Card::new().named(ROOT_CARD).header(CardHeader {
        title: partner.name.clone(),
        subtitle: partner.email.clone(),
        image_url: Some(partner.image.clone().unwrap_or_else(|| {
            let icon = if partner.is_company {
                icons::COMPANY
            } else {
                icons::PERSON
            };
            icon.to_string()
        })),
    });

    if let Some(error) = &state.error {
        card = card.section(error_section(env, error));
    }

    let mut contact = Section::with_header(format!("<b>{}</b>", env.t("Contact")));
    let button = match partner.id {
        Some(id) if partner.is_writeable => Some(log_button(
            env,
            state,
            &logged,
            RecordKind::Partners,
            id,
            LOG_EMAIL_CONTACT,
            &serde_json::Map::new(),
        )?),
        _ => None,
    };
    contact.push(Widget::DecoratedText {
        top_label: None,
        text: partner.name.clone(),
        bottom_label: partner.email.clone(),
        start_icon: None,
        on_click: None,
        button,
    });
    if partner.id.is_none() {
        contact.push(Widget::paragraph(
            env.t("This contact does not exist in the Odoo database."),
        ));
    }
    contact.push(Widget::button(
        env.t("Search contact"),
        env.action(state, OPEN_SEARCH_PARTNER)?,
    ));
    card = card.section(contact);

    if partner.id.is_some() {
        card = card.section(tasks_section(env, state, &logged)?);
    }

    Ok(card)
}

fn tasks_section(
    env: &Env<'_>,
    state: &State,
    logged: &LoggingState,
) -> Result<Section, HandlerError> {
    let tasks = &state.partner.tasks;
    let mut section = Section::with_header(format!("<b>{} ({})</b>", env.t("Tasks"), tasks.len()));

    if tasks.is_empty() {
        section.push(Widget::paragraph(env.t("No tasks found for this contact.")));
    }
    for task in tasks {
        let button = log_button(
            env,
            state,
            logged,
            RecordKind::Tasks,
            task.id,
            LOG_EMAIL_TASK,
            &LogTaskArgs { task_id: task.id },
        )?;
        section.push(Widget::DecoratedText {
            top_label: task.project_name.clone(),
            text: task.name.clone(),
            bottom_label: None,
            start_icon: None,
            on_click: None,
            button: Some(button),
        });
    }

    section.push(Widget::button(
        env.t("Create task"),
        env.action(state, OPEN_CREATE_TASK)?,
    ));
    Ok(section)
}

/// "Log email" button, or its disabled variant once the ledger has the record.
pub(super) fn log_button<A: Serialize>(
    env: &Env<'_>,
    state: &State,
    logged: &LoggingState,
    kind: RecordKind,
    id: i64,
    handler: &str,
    args: &A,
) -> Result<ImageButton, HandlerError> {
    if logged.contains(kind, id) {
        Ok(ImageButton {
            alt_text: env.t(already_logged_key(kind)),
            icon_url: icons::EMAIL_LOGGED.to_string(),
            on_click: env.action_with(state, EMAIL_ALREADY_LOGGED, &AlreadyLoggedArgs { kind })?,
        })
    } else {
        Ok(ImageButton {
            alt_text: env.t("Log email"),
            icon_url: icons::EMAIL_IN_ODOO.to_string(),
            on_click: env.action_with(state, handler, args)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::action::Inputs;
    use crate::model::ErrorMessage;
    use crate::navigation::Navigation;
    use crate::server::fake::FakeServer;
    use crate::views::fixture::{Fixture, action_for, known_partner, partner, project, row_button};

    #[test]
    fn build_is_idempotent() {
        let fx = Fixture::new(FakeServer::default());
        let state = fx.state();

        let first = build(&fx.env(), &state).unwrap();
        let second = build(&fx.env(), &state).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn known_contact_shows_tasks_and_log_button() {
        let fx = Fixture::new(FakeServer::default());
        let card = build(&fx.env(), &fx.state()).unwrap();

        assert_eq!(card.name.as_deref(), Some(ROOT_CARD));
        assert!(card.contains_text("Follow up"));
        assert!(card.contains_text("Create task"));
        let button = row_button(&card, "Ada Lovelace").unwrap();
        assert_eq!(button.alt_text, "Log email");
    }

    #[test]
    fn read_only_contact_has_no_log_button() {
        let fx = Fixture::new(FakeServer::default());
        let mut state = fx.state();
        state.partner.is_writeable = false;

        let card = build(&fx.env(), &state).unwrap();

        assert!(row_button(&card, "Ada Lovelace").is_none());
    }

    #[test]
    fn unknown_contact_offers_search_only() {
        let fx = Fixture::new(FakeServer::default());
        let mut state = fx.state();
        state.partner.id = None;

        let card = build(&fx.env(), &state).unwrap();

        assert!(card.contains_text("This contact does not exist in the Odoo database."));
        assert!(card.contains_text("Search contact"));
        assert!(!card.contains_text("Create task"));
    }

    #[test]
    fn logging_on_contact_flips_button() {
        let fx = Fixture::new(FakeServer::default());
        let card = build(&fx.env(), &fx.state()).unwrap();
        let log = row_button(&card, "Ada Lovelace").unwrap().on_click.clone();

        let response = fx.invoke(&log, Inputs::default());

        let Some(Navigation::ReplaceTop(card)) = response.navigation else {
            panic!("expected replace-top");
        };
        let button = row_button(&card, "Ada Lovelace").unwrap();
        assert_eq!(button.alt_text, "Email already logged on the contact");
        assert_eq!(fx.server.calls_to("log_email"), 1);

        // The stale button from the first card is caught by the ledger.
        let response = fx.invoke(&log, Inputs::default());
        assert_eq!(
            response.notification.as_deref(),
            Some("Email already logged on the contact")
        );
        assert_eq!(fx.server.calls_to("log_email"), 1);
    }

    #[test]
    fn failed_task_log_is_shown_inline_and_retryable() {
        let fx = Fixture::new(FakeServer {
            fail_log_email: true,
            ..FakeServer::default()
        });
        let card = build(&fx.env(), &fx.state()).unwrap();
        let log = row_button(&card, "Follow up").unwrap().on_click.clone();

        let response = fx.invoke(&log, Inputs::default());

        let Some(Navigation::ReplaceTop(card)) = response.navigation else {
            panic!("expected replace-top");
        };
        assert!(card.contains_text(
            "<font color=\"#d9534f\">An error occurred on the server.</font>"
        ));
        assert_eq!(row_button(&card, "Follow up").unwrap().alt_text, "Log email");
    }

    #[test]
    fn logging_unknown_task_is_a_precondition_failure() {
        let fx = Fixture::new(FakeServer::default());
        let reference = fx
            .env()
            .action_with(&fx.state(), LOG_EMAIL_TASK, &LogTaskArgs { task_id: 999 })
            .unwrap();

        let err = crate::action::dispatch(&fx.env(), &reference, Inputs::default()).unwrap_err();
        assert!(matches!(err, HandlerError::Precondition(_)));
    }

    #[test]
    fn search_contact_pushes_search_card() {
        let fx = Fixture::new(FakeServer {
            partners: vec![known_partner(), partner(43, "Ada Byron", true)],
            ..FakeServer::default()
        });
        let card = build(&fx.env(), &fx.state()).unwrap();

        let response = fx.invoke(&action_for(&card, "Search contact"), Inputs::default());

        let Some(Navigation::Push(card)) = response.navigation else {
            panic!("expected push");
        };
        assert_eq!(card.name.as_deref(), Some(search_partner::CARD_NAME));
        assert_eq!(fx.server.calls_to("search_partners"), 1);
    }

    #[test]
    fn create_task_pushes_card_with_one_initial_search() {
        let fx = Fixture::new(FakeServer {
            projects: vec![project(1, "Acme Corp")],
            ..FakeServer::default()
        });
        let card = build(&fx.env(), &fx.state()).unwrap();

        let response = fx.invoke(&action_for(&card, "Create task"), Inputs::default());

        let Some(Navigation::Push(card)) = response.navigation else {
            panic!("expected push");
        };
        assert!(card.contains_text("Acme Corp"));
        assert_eq!(fx.server.calls_to("search_projects"), 1);
    }

    #[test]
    fn reload_resets_to_root() {
        let mut updated = known_partner();
        updated.name = "Ada King".into();
        let fx = Fixture::new(FakeServer {
            partners: vec![updated],
            ..FakeServer::default()
        });
        let mut state = fx.state();
        state.error = Some(ErrorMessage::connection());
        let reference = fx.env().action(&state, RELOAD_PARTNER).unwrap();

        let response = fx.invoke(&reference, Inputs::default());

        let Some(Navigation::ResetToRoot(card)) = response.navigation else {
            panic!("expected reset-to-root");
        };
        assert!(card.contains_text("Ada King"));
        assert!(!card.contains_text(
            "<font color=\"#d9534f\">Could not connect to the database.</font>"
        ));
    }

    #[test]
    fn back_to_contact_pops_to_root() {
        let fx = Fixture::new(FakeServer::default());
        let reference = fx.env().action(&fx.state(), BACK_TO_CONTACT).unwrap();

        let response = fx.invoke(&reference, Inputs::default());

        match response.navigation {
            Some(Navigation::PopTo { target, card }) => {
                assert_eq!(target, ROOT_CARD);
                assert_eq!(card.name.as_deref(), Some(ROOT_CARD));
            }
            other => panic!("unexpected navigation: {other:?}"),
        }
    }
}
