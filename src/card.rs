//! Declarative card tree handed to the host for rendering.
//!
//! Cards are plain data. Every interactive widget carries the
//! [`ActionReference`] the host sends back when the widget fires.

use serde::{Deserialize, Serialize};

use crate::action::ActionReference;

/// A single screen of widgets in the side panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Name the host can pop back to.
    pub name: Option<String>,
    pub header: Option<CardHeader>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardHeader {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub header: Option<String>,
    pub widgets: Vec<Widget>,
}

/// A widget inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Widget {
    /// Free text input. Its current value reaches handlers through `Inputs`
    /// under `field_name`.
    #[serde(rename_all = "camelCase")]
    TextInput {
        field_name: String,
        title: String,
        value: String,
        on_change: Option<ActionReference>,
    },

    #[serde(rename_all = "camelCase")]
    TextButton {
        text: String,
        on_click: ActionReference,
    },

    TextParagraph { text: String },

    #[serde(rename_all = "camelCase")]
    Image { image_url: String },

    /// A labelled row, optionally clickable, with an optional trailing button.
    #[serde(rename_all = "camelCase")]
    DecoratedText {
        top_label: Option<String>,
        text: String,
        bottom_label: Option<String>,
        start_icon: Option<String>,
        on_click: Option<ActionReference>,
        button: Option<ImageButton>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageButton {
    pub alt_text: String,
    pub icon_url: String,
    pub on_click: ActionReference,
}

impl Card {
    pub fn new() -> Self {
        Self {
            name: None,
            header: None,
            sections: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn header(mut self, header: CardHeader) -> Self {
        self.header = Some(header);
        self
    }

    #[must_use]
    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// All widgets of the card, in display order.
    #[cfg(test)]
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.sections.iter().flat_map(|s| s.widgets.iter())
    }

    /// Whether any widget shows exactly `text`.
    #[cfg(test)]
    pub fn contains_text(&self, text: &str) -> bool {
        self.widgets().any(|w| w.text() == Some(text))
    }
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
            widgets: Vec::new(),
        }
    }

    #[must_use]
    pub fn widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    pub fn push(&mut self, widget: Widget) {
        self.widgets.push(widget);
    }
}

impl Widget {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::TextParagraph { text: text.into() }
    }

    pub fn button(text: impl Into<String>, on_click: ActionReference) -> Self {
        Self::TextButton {
            text: text.into(),
            on_click,
        }
    }

    /// The main visible text of the widget, if it has one.
    #[cfg(test)]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::TextInput { title, .. } => Some(title),
            Self::TextButton { text, .. }
            | Self::TextParagraph { text }
            | Self::DecoratedText { text, .. } => Some(text),
            Self::Image { .. } => None,
        }
    }
}
