//! Card stack directives.
//!
//! The host owns the visible stack. Handlers only describe how it should
//! change; nothing here tracks what is currently displayed.

use serde::{Deserialize, Serialize};

use crate::card::Card;

/// How the host should change its card stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "card", rename_all = "camelCase")]
pub enum Navigation {
    /// Replace the top card. Used for refinements of the same card.
    ReplaceTop(Card),

    /// Push a card on top. Back returns to the caller's card.
    Push(Card),

    /// Drop the whole stack and show `card` as its only entry.
    ResetToRoot(Card),

    /// Pop until the card named `target`, then replace it with `card`.
    PopTo { target: String, card: Card },
}

/// What a handler hands back to the host.
///
/// A response without navigation leaves the stack untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub navigation: Option<Navigation>,
    pub notification: Option<String>,
    pub open_link: Option<String>,
}

impl ActionResponse {
    #[must_use]
    pub fn open_link(mut self, url: impl Into<String>) -> Self {
        self.open_link = Some(url.into());
        self
    }
}

pub fn replace_top(card: Card) -> ActionResponse {
    navigate(Navigation::ReplaceTop(card))
}

pub fn push(card: Card) -> ActionResponse {
    navigate(Navigation::Push(card))
}

pub fn reset_to_root(card: Card) -> ActionResponse {
    navigate(Navigation::ResetToRoot(card))
}

pub fn pop_to(target: impl Into<String>, card: Card) -> ActionResponse {
    navigate(Navigation::PopTo {
        target: target.into(),
        card,
    })
}

/// A transient message. The stack is left as is.
pub fn notify(text: impl Into<String>) -> ActionResponse {
    ActionResponse {
        notification: Some(text.into()),
        ..ActionResponse::default()
    }
}

fn navigate(navigation: Navigation) -> ActionResponse {
    ActionResponse {
        navigation: Some(navigation),
        ..ActionResponse::default()
    }
}
