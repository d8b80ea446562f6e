//! Search-contact card.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{Env, Handler, HandlerError, Inputs, arguments};
use crate::card::{Card, Section, Widget};
use crate::ledger::RecordKind;
use crate::model::{Partner, State};
use crate::navigation::{ActionResponse, notify, replace_top, reset_to_root};

use super::partner::{BACK_TO_CONTACT, log_button};
use super::{
    LogOutcome, already_logged_key, build_view, error_section, icons, log_email_once,
    state_from_lookup,
};

pub const CARD_NAME: &str = "search_partner";

pub const SEARCH_PARTNER: &str = "search_partner";
pub const LOG_EMAIL_PARTNER: &str = "log_email_partner";
pub const OPEN_PARTNER: &str = "open_partner";

const QUERY_FIELD: &str = "search_partner_query";

pub(super) const HANDLERS: &[(&str, Handler)] = &[
    (SEARCH_PARTNER, on_search_partner),
    (LOG_EMAIL_PARTNER, on_log_email_partner),
    (OPEN_PARTNER, on_open_partner),
];

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogPartnerArgs {
    partner_id: Option<i64>,
    query: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenPartnerArgs {
    partner: Partner,
}

fn on_search_partner(
    env: &Env<'_>,
    mut state: State,
    _arguments: Value,
    inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    let query = inputs.first(QUERY_FIELD);

    let partners = if query.is_empty() {
        state.error = None;
        Vec::new()
    } else {
        state
            .record(env.server.search_partners(query))
            .unwrap_or_default()
    };
    state.searched_partners = Some(partners);

    Ok(replace_top(build(env, &state, query, false)?))
}

fn on_log_email_partner(
    env: &Env<'_>,
    mut state: State,
    args: Value,
    _inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    let args: LogPartnerArgs = arguments(args)?;
    let id = args.partner_id.ok_or_else(|| {
        HandlerError::Precondition(env.t("This contact does not exist in the Odoo database."))
    })?;

    match log_email_once(env, &mut state, RecordKind::Partners, id)? {
        LogOutcome::AlreadyLogged => Ok(notify(env.t(already_logged_key(RecordKind::Partners)))),
        LogOutcome::Logged | LogOutcome::Failed => {
            Ok(replace_top(build(env, &state, &args.query, false)?))
        }
    }
}

/// Switch the linked contact. The old state is dropped, so the stack is
/// reset rather than pushed onto.
fn on_open_partner(
    env: &Env<'_>,
    state: State,
    args: Value,
    _inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    let OpenPartnerArgs { partner } = arguments(args)?;
    let lookup = env.server.get_partner(
        partner.email.as_deref().unwrap_or_default(),
        &partner.name,
        partner.id,
    );
    let state = state_from_lookup(lookup, state.email);

    Ok(reset_to_root(build_view(env, &state)?))
}

/// Build the search card.
///
/// On the initial search (by the sender's address) a single hit is the
/// contact already shown, so the list and the query are hidden.
pub fn build(
    env: &Env<'_>,
    state: &State,
    query: &str,
    initial_search: bool,
) -> Result<Card, HandlerError> {
    let logged = env.ledger.logged(&state.email.message_id)?;

    let mut partners: Vec<&Partner> = state
        .searched_partners
        .iter()
        .flatten()
        .filter(|p| p.id.is_some())
        .collect();
    let mut search_value = query;
    if initial_search && partners.len() <= 1 {
        partners.clear();
        search_value = "";
    }

    let mut card = Card::new().named(CARD_NAME);
    if let Some(error) = &state.error {
        card = card.section(error_section(env, error));
    }

    let search = env.action(state, SEARCH_PARTNER)?;
    let mut section = Section::new()
        .widget(Widget::TextInput {
            field_name: QUERY_FIELD.to_string(),
            title: env.t("Search contact"),
            value: search_value.to_string(),
            on_change: Some(search.clone()),
        })
        .widget(Widget::button(env.t("Search"), search));

    for partner in &partners {
        let button = match partner.id {
            Some(id) if partner.is_writeable => Some(log_button(
                env,
                state,
                &logged,
                RecordKind::Partners,
                id,
                LOG_EMAIL_PARTNER,
                &LogPartnerArgs {
                    partner_id: Some(id),
                    query: query.to_string(),
                },
            )?),
            _ => None,
        };
        let icon = partner.image.clone().unwrap_or_else(|| {
            let icon = if partner.is_company {
                icons::COMPANY
            } else {
                icons::PERSON
            };
            icon.to_string()
        });

        section.push(Widget::DecoratedText {
            top_label: None,
            text: partner.name.clone(),
            bottom_label: partner.email.clone(),
            start_icon: Some(icon),
            on_click: Some(env.action_with(
                state,
                OPEN_PARTNER,
                &OpenPartnerArgs {
                    partner: (*partner).clone(),
                },
            )?),
            button,
        });
    }

    if partners.is_empty() && !initial_search {
        section.push(Widget::paragraph(env.t("No contact found.")));
    }

    section.push(Widget::button(
        env.t("Back to contact"),
        env.action(state, BACK_TO_CONTACT)?,
    ));

    Ok(card.section(section))
}
