//! Core data model for the mail panel.
//!
//! Everything here is plain data: it can be serialized into an action
//! reference, carried through the host, and rebuilt exactly on the other side.

mod email;
mod error;
mod partner;
mod project;
mod state;
mod task;

pub use email::Email;
#[cfg(test)]
pub use error::ErrorCode;
pub use error::ErrorMessage;
pub use partner::Partner;
pub use project::Project;
pub use state::State;
pub use task::Task;
