//! Live user inputs sent by the host with every invocation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current values of the card's input fields, by field name.
///
/// The host always sends a list per field, even for single-valued inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inputs(BTreeMap<String, Vec<String>>);

impl Inputs {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut inputs = Self::default();
        for (name, value) in pairs {
            inputs.push(name, value);
        }
        inputs
    }

    pub fn push(&mut self, name: &str, value: &str) {
        self.0
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// First value of a single-valued field, or `""` if the field is absent.
    pub fn first(&self, name: &str) -> &str {
        self.0
            .get(name)
            .and_then(|values| values.first())
            .map_or("", String::as_str)
    }
}
