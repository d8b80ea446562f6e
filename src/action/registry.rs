//! Handler registry and the action reference codec.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::model::State;

use super::{DispatchError, Handler, Inputs};

/// The single host entry point every action reference targets.
pub const ENTRY_POINT: &str = "actionCallback";

const HANDLER: &str = "handler";
const STATE: &str = "state";
const ARGUMENTS: &str = "arguments";
const REGISTRY: &str = "registry";

/// Opaque pointer to "handler + state + arguments", in the host's
/// parameter format: one function name and a flat map of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReference {
    pub function_name: String,
    pub parameters: BTreeMap<String, String>,
}

/// A decoded action reference, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub handler: String,
    pub state: State,
    pub arguments: Value,
    pub inputs: Inputs,
}

/// Handlers by id, resolved once at startup.
///
/// The fingerprint identifies this exact set of handlers. References built
/// by another registry are rejected as stale.
#[derive(Debug)]
pub struct Registry {
    handlers: BTreeMap<&'static str, Handler>,
    fingerprint: String,
}

impl Registry {
    pub fn new(entries: &[(&'static str, Handler)]) -> Self {
        let handlers: BTreeMap<_, _> = entries.iter().copied().collect();

        let mut hasher = Sha256::new();
        hasher.update(env!("CARGO_PKG_VERSION"));
        for id in handlers.keys() {
            hasher.update(b"\n");
            hasher.update(id);
        }
        let fingerprint = hex::encode(&hasher.finalize()[..8]);

        Self {
            handlers,
            fingerprint,
        }
    }

    /// Every handler the views register.
    pub fn standard() -> Self {
        Self::new(&crate::views::handlers())
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    pub fn resolve(&self, id: &str) -> Result<Handler, DispatchError> {
        self.handlers
            .get(id)
            .copied()
            .ok_or_else(|| DispatchError::UnknownHandler(id.to_string()))
    }

    /// Build the reference a widget carries.
    pub fn encode<A: Serialize + ?Sized>(
        &self,
        state: &State,
        handler: &str,
        arguments: &A,
    ) -> Result<ActionReference, DispatchError> {
        self.resolve(handler)?;

        let state = serde_json::to_string(state)
            .map_err(|e| DispatchError::Malformed(format!("state: {e}")))?;
        let arguments = serde_json::to_string(arguments)
            .map_err(|e| DispatchError::Malformed(format!("arguments: {e}")))?;

        let parameters = BTreeMap::from([
            (HANDLER.to_string(), handler.to_string()),
            (STATE.to_string(), state),
            (ARGUMENTS.to_string(), arguments),
            (REGISTRY.to_string(), self.fingerprint.clone()),
        ]);

        Ok(ActionReference {
            function_name: ENTRY_POINT.to_string(),
            parameters,
        })
    }

    /// Reverse of [`Registry::encode`], joined with the live inputs.
    pub fn decode(
        &self,
        reference: &ActionReference,
        inputs: Inputs,
    ) -> Result<Invocation, DispatchError> {
        if reference.function_name != ENTRY_POINT {
            return Err(DispatchError::Malformed(format!(
                "unexpected entry point: {}",
                reference.function_name
            )));
        }

        let found = parameter(reference, REGISTRY)?;
        if found != self.fingerprint {
            return Err(DispatchError::StaleAction {
                expected: self.fingerprint.clone(),
                found: found.to_string(),
            });
        }

        let handler = parameter(reference, HANDLER)?;
        self.resolve(handler)?;

        let state = serde_json::from_str(parameter(reference, STATE)?)
            .map_err(|e| DispatchError::Malformed(format!("state: {e}")))?;
        let arguments = serde_json::from_str(parameter(reference, ARGUMENTS)?)
            .map_err(|e| DispatchError::Malformed(format!("arguments: {e}")))?;

        Ok(Invocation {
            handler: handler.to_string(),
            state,
            arguments,
            inputs,
        })
    }
}

fn parameter<'a>(reference: &'a ActionReference, key: &str) -> Result<&'a str, DispatchError> {
    reference
        .parameters
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| DispatchError::Malformed(format!("missing parameter: {key}")))
}
