//! Create-task card: pick or create a project, then create a task in it for
//! the linked contact.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::action::{Env, Handler, HandlerError, Inputs, arguments};
use crate::card::{Card, Section, Widget};
use crate::model::{Project, State};
use crate::navigation::{ActionResponse, notify, push, replace_top, reset_to_root};

use super::partner::BACK_TO_CONTACT;
use super::{build_view, error_section, icons};

pub const CARD_NAME: &str = "create_task";

pub const SEARCH_PROJECT: &str = "search_project";
pub const CREATE_PROJECT: &str = "create_project";
pub const SELECT_PROJECT: &str = "select_project";

const QUERY_FIELD: &str = "search_project_query";
const NAME_FIELD: &str = "new_project_name";

pub(super) const HANDLERS: &[(&str, Handler)] = &[
    (SEARCH_PROJECT, on_search_project),
    (CREATE_PROJECT, on_create_project),
    (SELECT_PROJECT, on_select_project),
];

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArgs {
    #[serde(default)]
    hide_create_project_section: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct SelectArgs {
    project: Project,
}

/// Search projects. The first search from the full card pushes a results
/// card without the create-project section; searches from there replace it,
/// so back returns to the full card.
fn on_search_project(
    env: &Env<'_>,
    mut state: State,
    args: Value,
    inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    let args: SearchArgs = arguments(args)?;
    let query = inputs.first(QUERY_FIELD);

    let projects = state
        .record(env.server.search_projects(query))
        .unwrap_or_default();
    state.searched_projects = Some(projects);

    let card = build(env, &mut state, query, true)?;
    if args.hide_create_project_section {
        Ok(replace_top(card))
    } else {
        Ok(push(card))
    }
}

fn on_create_project(
    env: &Env<'_>,
    state: State,
    _arguments: Value,
    inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    let name = inputs.first(NAME_FIELD).trim();
    if name.is_empty() {
        return Ok(notify(env.t("The project name is required")));
    }

    match env.server.create_project(name) {
        Ok(project) => select(env, state, project),
        Err(error) => {
            warn!(?error, "failed to create project");
            Ok(notify(env.t("Could not create the project")))
        }
    }
}

fn on_select_project(
    env: &Env<'_>,
    state: State,
    args: Value,
    _inputs: &Inputs,
) -> Result<ActionResponse, HandlerError> {
    let SelectArgs { project } = arguments(args)?;
    select(env, state, project)
}

/// Create the task, open it in the server's web UI, and reset to the
/// contact card with the new task listed.
fn select(
    env: &Env<'_>,
    mut state: State,
    project: Project,
) -> Result<ActionResponse, HandlerError> {
    let partner_id = state.partner.id.ok_or_else(|| {
        HandlerError::Precondition(env.t("This contact does not exist in the Odoo database."))
    })?;

    let mut task = match env.server.create_task(
        partner_id,
        project.id,
        &state.email.body,
        &state.email.subject,
    ) {
        Ok(task) => task,
        Err(error) => {
            warn!(?error, project_id = project.id, "failed to create task");
            return Ok(notify(env.t("Could not create the task")));
        }
    };

    task.project_name = Some(project.name);
    let task_id = task.id;
    state.partner.tasks.push(task);
    state.searched_projects = None;
    state.error = None;

    let response = reset_to_root(build_view(env, &state)?);
    match env.config.task_url(task_id) {
        Ok(url) => Ok(response.open_link(url)),
        Err(e) => {
            warn!(error = %e, task_id, "cannot build task link");
            Ok(response)
        }
    }
}

/// Build the create-task card.
///
/// Runs one empty-query project search if none was done for this state yet.
/// An empty-query search with no results means the server has no project
/// at all, which gets its own layout.
pub fn build(
    env: &Env<'_>,
    state: &mut State,
    query: &str,
    hide_create_project_section: bool,
) -> Result<Card, HandlerError> {
    if state.searched_projects.is_none() {
        let projects = state
            .record(env.server.search_projects(""))
            .unwrap_or_default();
        state.searched_projects = Some(projects);
    }

    let state = &*state;
    let projects = state.searched_projects.as_deref().unwrap_or_default();
    let no_project = query.is_empty() && projects.is_empty() && state.error.is_none();

    let mut card = Card::new().named(CARD_NAME);
    if let Some(error) = &state.error {
        card = card.section(error_section(env, error));
    }

    if !no_project {
        let search = env.action_with(
            state,
            SEARCH_PROJECT,
            &SearchArgs {
                hide_create_project_section,
            },
        )?;
        let mut section = Section::with_header(format!(
            "<b>{}</b>",
            env.t("Create a Task in an existing Project")
        ))
        .widget(Widget::TextInput {
            field_name: QUERY_FIELD.to_string(),
            title: env.t("Search a Project"),
            value: query.to_string(),
            on_change: Some(search.clone()),
        })
        .widget(Widget::button(env.t("Search"), search));

        if projects.is_empty() {
            section.push(Widget::paragraph(env.t("No project found.")));
        }
        for project in projects {
            section.push(Widget::DecoratedText {
                top_label: None,
                text: project.name.clone(),
                bottom_label: project.partner_name.clone(),
                start_icon: None,
                on_click: Some(env.action_with(
                    state,
                    SELECT_PROJECT,
                    &SelectArgs {
                        project: project.clone(),
                    },
                )?),
                button: None,
            });
        }
        card = card.section(section);
    }

    if !hide_create_project_section && state.can_create_project {
        card = card.section(
            Section::with_header(format!(
                "<b>{}</b>",
                env.t("Create a Task in a new Project")
            ))
            .widget(Widget::TextInput {
                field_name: NAME_FIELD.to_string(),
                title: env.t("Project Name"),
                value: String::new(),
                on_change: None,
            })
            .widget(Widget::button(
                env.t("Create Project & Task"),
                env.action(state, CREATE_PROJECT)?,
            )),
        );
    } else if no_project {
        card = card.section(
            Section::new()
                .widget(Widget::Image {
                    image_url: icons::EMPTY_FOLDER.to_string(),
                })
                .widget(Widget::paragraph(format!("<b>{}</b>", env.t("No project"))))
                .widget(Widget::paragraph(env.t(
                    "There are no project in your database. \
                     Please ask your project manager to create one.",
                ))),
        );
    }

    Ok(card.section(Section::new().widget(Widget::button(
        env.t("Back to contact"),
        env.action(state, BACK_TO_CONTACT)?,
    ))))
}
