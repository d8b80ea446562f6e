//! Server-error card, shown when the contact lookup itself failed.

use crate::action::{Env, HandlerError};
use crate::card::{Card, CardHeader, Section, Widget};
use crate::model::State;

use super::partner::RELOAD_PARTNER;
use super::{ROOT_CARD, error_section, icons};

pub fn build(env: &Env<'_>, state: &State) -> Result<Card, HandlerError> {
    let mut card = Card::new().named(ROOT_CARD).header(CardHeader {
        title: state.partner.name.clone(),
        subtitle: state.partner.email.clone(),
        image_url: Some(icons::WARNING.to_string()),
    });
    if let Some(error) = &state.error {
        card = card.section(error_section(env, error));
    }

    Ok(card.section(Section::new().widget(Widget::button(
        env.t("Retry"),
        env.action(state, RELOAD_PARTNER)?,
    ))))
}
