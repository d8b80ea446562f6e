//! Shared test fixture for the views: fake collaborators and card lookups.

use crate::action::{ActionReference, Env, Inputs, Registry, dispatch};
use crate::card::{Card, ImageButton, Widget};
use crate::config::Config;
use crate::ledger::Ledger;
use crate::model::{Email, Partner, Project, State, Task};
use crate::navigation::ActionResponse;
use crate::server::fake::FakeServer;
use crate::translate::Translator;

pub struct Fixture {
    pub registry: Registry,
    pub server: FakeServer,
    pub ledger: Ledger,
    pub translator: Translator,
    pub config: Config,
}

impl Fixture {
    pub fn new(server: FakeServer) -> Self {
        Self {
            registry: Registry::standard(),
            server,
            ledger: Ledger::in_memory(),
            translator: Translator::default(),
            config: Config::for_server("https://erp.example.com"),
        }
    }

    pub fn env(&self) -> Env<'_> {
        Env {
            registry: &self.registry,
            server: &self.server,
            ledger: &self.ledger,
            translator: &self.translator,
            config: &self.config,
        }
    }

    /// State linked to [`known_partner`].
    pub fn state(&self) -> State {
        let mut state = State::new(known_partner(), email());
        state.can_create_project = self.server.can_create_project;
        state
    }

    pub fn invoke(&self, reference: &ActionReference, inputs: Inputs) -> ActionResponse {
        dispatch(&self.env(), reference, inputs).unwrap()
    }
}

pub fn email() -> Email {
    Email {
        message_id: "<m1@example.com>".into(),
        subject: "Analytical engine quote".into(),
        body: "<p>Please find the quote attached.</p>".into(),
        sender_name: "Ada Lovelace".into(),
        sender_email: "ada@example.com".into(),
    }
}

pub fn known_partner() -> Partner {
    Partner {
        id: Some(42),
        name: "Ada Lovelace".into(),
        email: Some("ada@example.com".into()),
        image: None,
        is_company: false,
        is_writeable: true,
        tasks: vec![Task {
            id: 7,
            name: "Follow up".into(),
            project_name: Some("Engines".into()),
        }],
    }
}

pub fn partner(id: i64, name: &str, is_writeable: bool) -> Partner {
    Partner {
        id: Some(id),
        name: name.into(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        image: None,
        is_company: false,
        is_writeable,
        tasks: Vec::new(),
    }
}

pub fn project(id: i64, name: &str) -> Project {
    Project {
        id,
        name: name.into(),
        partner_name: None,
    }
}

/// The action fired by the widget showing `text`: a button's click, a row's
/// click, or an input's change.
pub fn action_for(card: &Card, text: &str) -> ActionReference {
    card.widgets()
        .find_map(|w| match w {
            Widget::TextButton { text: t, on_click } if t == text => Some(on_click.clone()),
            Widget::DecoratedText {
                text: t,
                on_click: Some(on_click),
                ..
            } if t == text => Some(on_click.clone()),
            Widget::TextInput {
                title,
                on_change: Some(on_change),
                ..
            } if title == text => Some(on_change.clone()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no action for {text:?} in {card:#?}"))
}

/// The trailing button of the row showing `text`.
pub fn row_button<'a>(card: &'a Card, text: &str) -> Option<&'a ImageButton> {
    card.widgets().find_map(|w| match w {
        Widget::DecoratedText {
            text: t, button, ..
        } if t == text => button.as_ref(),
        _ => None,
    })
}

/// Value shown in the input titled `title`.
pub fn input_value<'a>(card: &'a Card, title: &str) -> Option<&'a str> {
    card.widgets().find_map(|w| match w {
        Widget::TextInput { title: t, value, .. } if t == title => Some(value.as_str()),
        _ => None,
    })
}
