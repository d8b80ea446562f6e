use serde::{Deserialize, Serialize};

/// A project a task can be created in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub partner_name: Option<String>,
}
