//! Mail panel configuration.
//!
//! Loaded from `~/.mailpanel/config.toml`.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// Mail panel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Base URL of the business server, e.g. `https://erp.example.com`.
    pub server_url: String,

    /// Sent as the `Authorization` header on every server call.
    #[serde(default)]
    pub api_key: Option<String>,

    /// JSON dictionary of translated strings.
    #[serde(default)]
    pub translations: Option<PathBuf>,

    /// Where the logging ledger lives. Defaults to `~/.mailpanel/ledger.sqlite`.
    #[serde(default)]
    pub ledger_path: Option<PathBuf>,
}

impl Config {
    /// Load config from `~/.mailpanel/config.toml`.
    /// Returns an error if the file is missing or invalid.
    pub fn load() -> Result<Self, String> {
        let path = Self::path().ok_or("could not determine home directory")?;

        if !path.exists() {
            return Err(format!(
                "no config file found at {}\n\
                 Create one with at minimum:\n\n\
                 server-url = \"https://your-server.example.com\"",
                path.display()
            ));
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// Parse and validate a config document.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| e.to_string())?;
        config.base_url()?;
        Ok(config)
    }

    /// A config pointing at `server_url` with everything else defaulted.
    #[cfg(test)]
    pub fn for_server(server_url: &str) -> Self {
        Self {
            server_url: server_url.to_string(),
            api_key: None,
            translations: None,
            ledger_path: None,
        }
    }

    /// The config file path: `~/.mailpanel/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".mailpanel").join("config.toml"))
    }

    pub fn ledger_path(&self) -> Option<PathBuf> {
        self.ledger_path.clone().or_else(|| {
            dirs::home_dir().map(|h| h.join(".mailpanel").join("ledger.sqlite"))
        })
    }

    /// The server URL with a trailing slash, so relative routes resolve
    /// below any path prefix (`https://host/odoo/` + `web`).
    pub fn base_url(&self) -> Result<Url, String> {
        if self.server_url.trim().is_empty() {
            return Err("server-url is empty".to_string());
        }
        let mut url =
            Url::parse(&self.server_url).map_err(|e| format!("invalid server-url: {e}"))?;
        if url.cannot_be_a_base() {
            return Err(format!("invalid server-url: {} cannot be a base", self.server_url));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Deep link to a task's form in the server's web UI.
    pub fn task_url(&self, task_id: i64) -> Result<String, String> {
        let mut url = self.base_url()?.join("web").map_err(|e| e.to_string())?;
        url.set_fragment(Some(&format!(
            "id={task_id}&action=project_mail_plugin.project_task_action_form_edit\
             &model=project.task&view_type=form"
        )));
        Ok(url.into())
    }
}
