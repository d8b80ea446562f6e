//! CLI interface for the mail panel.
//!
//! Stands in for the mail host: each subcommand is one host interaction.
//! JSON goes to stdout, logs to stderr.
//!
//! - `mailpanel open --email <file>` renders the card for a newly opened email.
//! - `mailpanel invoke --action <file|->` fires a widget's action reference.
//! - `mailpanel ledger show <message-id>` prints what was logged for an email.
//! - `mailpanel handlers` lists the registered handlers.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::action::{ActionReference, Env, Inputs, dispatch};
use crate::card::Card;
use crate::ledger::LoggingState;
use crate::model::Email;
use crate::navigation::ActionResponse;
use crate::views;

/// Mail panel: link emails to contacts, projects and tasks.
#[derive(Debug, Parser)]
#[command(name = "mailpanel", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: creating a task from an email
  1. mailpanel open --email message.json
     → prints the contact card; every widget carries an action reference
  2. save the "Create task" button's onClick to create.json
  3. mailpanel invoke --action create.json
     → prints the pushed create-task card
  4. mailpanel invoke --action search.json --input search_project_query=Acme

Inspect:
  mailpanel ledger show "<m1@example.com>"
  mailpanel handlers"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open an email: look up its sender and print the root card.
    Open {
        /// Email JSON: messageId, subject, body, senderName, senderEmail.
        #[arg(long)]
        email: PathBuf,
    },

    /// Fire an action reference and print the host response.
    Invoke {
        /// Action reference JSON file, or `-` to read stdin.
        #[arg(long)]
        action: String,

        /// Live input value as `name=value`. Can be specified multiple times.
        #[arg(long = "input", value_parser = parse_input)]
        inputs: Vec<(String, String)>,
    },

    /// Inspect the logging ledger.
    Ledger {
        #[command(subcommand)]
        command: LedgerCommand,
    },

    /// List handler ids and the registry fingerprint.
    Handlers,
}

#[derive(Debug, Subcommand)]
pub enum LedgerCommand {
    /// Print the records an email was logged on.
    Show {
        /// Host message id of the email.
        message_id: String,
    },
}

#[derive(Debug, Serialize)]
struct HandlerListing<'a> {
    fingerprint: &'a str,
    handlers: Vec<&'static str>,
}

/// Run the CLI, returning an error message on failure.
pub fn run(env: &Env<'_>) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Open { email } => print_json(&cmd_open(env, &email)?),
        Command::Invoke { action, inputs } => {
            let source = read_source(&action)?;
            print_json(&cmd_invoke(env, &source, &inputs)?)
        }
        Command::Ledger {
            command: LedgerCommand::Show { message_id },
        } => print_json(&cmd_ledger_show(env, &message_id)?),
        Command::Handlers => print_json(&HandlerListing {
            fingerprint: env.registry.fingerprint(),
            handlers: env.registry.ids().collect(),
        }),
    }
}

fn cmd_open(env: &Env<'_>, path: &Path) -> Result<Card, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let email: Email = serde_json::from_str(&contents)
        .map_err(|e| format!("invalid email at {}: {e}", path.display()))?;

    views::open(env, email).map_err(|e| e.to_string())
}

fn cmd_invoke(
    env: &Env<'_>,
    source: &str,
    inputs: &[(String, String)],
) -> Result<ActionResponse, String> {
    let reference: ActionReference =
        serde_json::from_str(source).map_err(|e| format!("invalid action reference: {e}"))?;

    let live = Inputs::from_pairs(inputs.iter().map(|(n, v)| (n.as_str(), v.as_str())));
    dispatch(env, &reference, live).map_err(|e| e.to_string())
}

fn cmd_ledger_show(env: &Env<'_>, message_id: &str) -> Result<LoggingState, String> {
    env.ledger
        .peek(message_id)
        .map_err(|e| format!("failed to read ledger: {e}"))
}

/// Parse `name=value`. The value may be empty or contain `=`.
fn parse_input(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {s:?}"))?;
    if name.is_empty() {
        return Err(format!("missing input name in {s:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}

fn read_source(source: &str) -> Result<String, String> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        Ok(buf)
    } else {
        fs::read_to_string(source).map_err(|e| format!("failed to read {source}: {e}"))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
