//! Action encoding and dispatch.
//!
//! The host is stateless between interactions: every widget carries an
//! [`ActionReference`] holding the handler id, the serialized [`State`] and
//! the handler's arguments. When the widget fires, the host sends the
//! reference back together with the live input values, and [`dispatch`]
//! rebuilds the state and runs the handler.

mod inputs;
mod registry;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::ledger::{Ledger, LedgerError};
use crate::model::State;
use crate::navigation::{ActionResponse, notify};
use crate::server::BusinessServer;
use crate::translate::Translator;

pub use inputs::Inputs;
pub use registry::{ActionReference, Registry};

/// A registered callback.
///
/// Receives the rebuilt state, the arguments given at encode time, and the
/// live user inputs.
pub type Handler = fn(&Env<'_>, State, Value, &Inputs) -> Result<ActionResponse, HandlerError>;

/// Failures decoding or resolving an action reference.
///
/// Never reaches the host: [`dispatch`] turns these into notifications.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown handler: {0}")]
    UnknownHandler(String),

    #[error("stale action: built for registry {found}, current is {expected}")]
    StaleAction { expected: String, found: String },

    #[error("malformed action reference: {0}")]
    Malformed(String),
}

impl DispatchError {
    /// Translation key of the notification shown instead of the handler's
    /// result.
    pub fn notification_key(&self) -> &'static str {
        match self {
            Self::StaleAction { .. } => "This action has expired. Please reopen the email.",
            Self::UnknownHandler(_) | Self::Malformed(_) => {
                "Something went wrong. Please try again."
            }
        }
    }
}

/// Failures that abort a handler and propagate to the host.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Acting on a record that does not exist.
    #[error("{0}")]
    Precondition(String),

    /// A builder referenced a handler the registry does not know.
    #[error("action wiring: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("invalid handler arguments: {0}")]
    Arguments(serde_json::Error),

    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// Collaborators available to handlers and view builders.
pub struct Env<'a> {
    pub registry: &'a Registry,
    pub server: &'a dyn BusinessServer,
    pub ledger: &'a Ledger,
    pub translator: &'a Translator,
    pub config: &'a Config,
}

impl Env<'_> {
    pub fn t(&self, key: &str) -> String {
        self.translator.translate(key)
    }

    /// An action reference for a handler that takes no arguments.
    pub fn action(&self, state: &State, handler: &str) -> Result<ActionReference, HandlerError> {
        Ok(self.registry.encode(state, handler, &serde_json::Map::new())?)
    }

    pub fn action_with<A: Serialize>(
        &self,
        state: &State,
        handler: &str,
        arguments: &A,
    ) -> Result<ActionReference, HandlerError> {
        Ok(self.registry.encode(state, handler, arguments)?)
    }
}

/// Decode a handler's arguments.
pub fn arguments<A: DeserializeOwned>(value: Value) -> Result<A, HandlerError> {
    serde_json::from_value(value).map_err(HandlerError::Arguments)
}

/// Decode `reference`, run its handler, and return the handler's response.
///
/// Stale, unknown, or malformed references become a notification. Only
/// handler failures are returned as errors.
pub fn dispatch(
    env: &Env<'_>,
    reference: &ActionReference,
    inputs: Inputs,
) -> Result<ActionResponse, HandlerError> {
    let resolved = env
        .registry
        .decode(reference, inputs)
        .and_then(|invocation| Ok((env.registry.resolve(&invocation.handler)?, invocation)));

    let (handler, invocation) = match resolved {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!(error = %e, "rejected action");
            return Ok(notify(env.t(e.notification_key())));
        }
    };

    info!(
        handler = %invocation.handler,
        message_id = %invocation.state.email.message_id,
        "dispatching action"
    );
    handler(env, invocation.state, invocation.arguments, &invocation.inputs)
}
