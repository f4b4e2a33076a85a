//! `planty task`: create, edit, complete, reorder and move tasks.
//!
//! Tasks are addressed by id or by title. A title is resolved through the
//! search endpoint and must match exactly one task.

use super::section::pick_section;
use super::{store, today};
use crate::api::Store;
use crate::libs::form::{parse_due, TaskForm};
use crate::libs::messages::Message;
use crate::libs::reorder::{DropOutcome, TaskList, TaskMove};
use crate::libs::task::{RecurrenceType, Task};
use crate::libs::view::View;
use crate::{msg_error, msg_error_anyhow, msg_info, msg_print, msg_success, msg_warning};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use uuid::Uuid;

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Default, Args)]
struct TaskFields {
    #[arg(short, long)]
    description: Option<String>,
    /// Due date: YYYY-MM-DD, today, tomorrow or none
    #[arg(long)]
    due: Option<String>,
    /// Repeat every N units after the due date
    #[arg(long)]
    every: Option<u32>,
    /// Unit of --every: days, weeks, months or years
    #[arg(long)]
    unit: Option<RecurrenceType>,
    /// Count the next due date from the completion date
    #[arg(long)]
    flexible: bool,
    /// Remove the recurrence
    #[arg(long, conflicts_with = "every")]
    once: bool,
}

impl TaskFields {
    fn is_empty(&self) -> bool {
        self.description.is_none() && self.due.is_none() && self.every.is_none() && self.unit.is_none() && !self.flexible && !self.once
    }

    fn apply(&self, form: &mut TaskForm, today: NaiveDate) -> Result<()> {
        if let Some(description) = &self.description {
            form.description = description.clone();
        }
        if let Some(due) = &self.due {
            form.due_to = parse_due(due, today)?;
        }
        if let Some(every) = self.every {
            form.recurring = true;
            form.period = every;
        }
        if let Some(unit) = self.unit {
            form.recurring = true;
            form.recurrence_type = unit;
        }
        if self.flexible {
            form.recurring = true;
            form.flexible_mode = true;
        }
        if self.once {
            form.recurring = false;
        }
        Ok(())
    }
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Add a task to a section
    Add {
        title: Option<String>,
        #[arg(short, long)]
        section: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Edit a task; without options the form is shown prefilled
    Edit {
        task: String,
        #[arg(short, long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Show a task with its attachments
    Show { task: String },
    /// Toggle the completed flag
    Complete { task: String },
    /// Toggle the archived flag
    Archive { task: String },
    /// Delete a task
    Delete {
        task: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a task to another position within its section
    Reorder { task: String, position: usize },
    /// Move a task to the top of another section
    Move {
        task: String,
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Search tasks by text
    Search { query: String },
}

pub async fn cmd(task_args: TaskArgs) -> Result<()> {
    let store = store()?;
    match task_args.command {
        TaskCommand::Add { title, section, fields } => add(&store, title, section, fields).await,
        TaskCommand::Edit { task, title, fields } => edit(&store, &task, title, fields).await,
        TaskCommand::Show { task } => {
            View::task(&resolve_task(&store, &task).await?, today());
            Ok(())
        }
        TaskCommand::Complete { task } => complete(&store, &task).await,
        TaskCommand::Archive { task } => archive(&store, &task).await,
        TaskCommand::Delete { task, yes } => delete(&store, &task, yes).await,
        TaskCommand::Reorder { task, position } => reorder(&store, &task, position).await,
        TaskCommand::Move { task, to } => move_task(&store, &task, to).await,
        TaskCommand::Search { query } => {
            let tasks = store.search(&query).await?;
            if tasks.is_empty() {
                msg_info!(Message::NoTasksFound(query));
            } else {
                View::tasks(&tasks, today());
            }
            Ok(())
        }
    }
}

/// Finds a task by id, or by title through search.
pub(crate) async fn resolve_task(store: &Store, needle: &str) -> Result<Task> {
    if let Ok(id) = Uuid::parse_str(needle.trim()) {
        return store
            .find_task(id)
            .await?
            .ok_or_else(|| msg_error_anyhow!(Message::TaskNotFound(needle.to_string())));
    }

    let found = store.search(needle).await?;
    let wanted = needle.trim().to_lowercase();
    let exact: Vec<&Task> = found.iter().filter(|t| t.title.trim().to_lowercase() == wanted).collect();
    match (exact.as_slice(), found.as_slice()) {
        ([task], _) => Ok((*task).clone()),
        ([], [task]) => Ok(task.clone()),
        ([], []) => Err(msg_error_anyhow!(Message::TaskNotFound(needle.to_string()))),
        (_, many) => Err(msg_error_anyhow!(Message::AmbiguousTask(needle.to_string(), many.len()))),
    }
}

/// Interactive task form, starting from `form`.
fn prompt_form(mut form: TaskForm, today: NaiveDate) -> Result<TaskForm> {
    let theme = ColorfulTheme::default();
    form.title = Input::with_theme(&theme)
        .with_prompt(Message::PromptTaskTitle.to_string())
        .with_initial_text(form.title.clone())
        .interact_text()?;
    form.description = Input::with_theme(&theme)
        .with_prompt(Message::PromptTaskDescription.to_string())
        .with_initial_text(form.description.clone())
        .allow_empty(true)
        .interact_text()?;

    loop {
        let due: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptDueDate.to_string())
            .with_initial_text(form.due_to.map(|d| d.to_string()).unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        match parse_due(&due, today) {
            Ok(due_to) => {
                form.due_to = due_to;
                break;
            }
            Err(e) => msg_error!(e),
        }
    }

    form.recurring = Confirm::with_theme(&theme)
        .with_prompt(Message::PromptRecurring.to_string())
        .default(form.recurring)
        .interact()?;
    if form.recurring && form.due_to.is_none() {
        msg_warning!(Message::RecurrenceNeedsDueDate);
    }
    if form.recurring && form.due_to.is_some() {
        form.period = Input::with_theme(&theme)
            .with_prompt(Message::PromptPeriod.to_string())
            .default(form.period)
            .validate_with(|period: &u32| if *period > 0 { Ok(()) } else { Err(Message::InvalidPeriod.to_string()) })
            .interact_text()?;
        let units: Vec<String> = RecurrenceType::ALL.iter().map(|t| t.to_string()).collect();
        let current = RecurrenceType::ALL.iter().position(|t| *t == form.recurrence_type).unwrap_or(0);
        let selection = Select::with_theme(&theme)
            .with_prompt(Message::PromptRecurrenceType.to_string())
            .items(&units)
            .default(current)
            .interact()?;
        form.recurrence_type = RecurrenceType::ALL[selection];
        form.flexible_mode = Confirm::with_theme(&theme)
            .with_prompt(Message::PromptFlexibleMode.to_string())
            .default(form.flexible_mode)
            .interact()?;
    }
    Ok(form)
}

async fn show_section(store: &Store, section_id: Uuid) -> Result<()> {
    let section = store.section(section_id).await?;
    msg_print!(Message::SectionHeader(section.title.clone()), true);
    View::tasks(&section.tasks, today());
    Ok(())
}

async fn add(store: &Store, title: Option<String>, section: Option<String>, fields: TaskFields) -> Result<()> {
    let today = today();
    let section = pick_section(store, section.as_deref()).await?;
    let mut form = TaskForm::default();
    fields.apply(&mut form, today)?;
    let form = match title {
        Some(title) => {
            if form.recurring && form.due_to.is_none() {
                msg_warning!(Message::RecurrenceNeedsDueDate);
            }
            TaskForm { title, ..form }
        }
        None => prompt_form(form, today)?,
    };

    let payload = form.to_create(section.id)?;
    store.create_task(&payload).await?;
    msg_success!(Message::TaskCreated(payload.title));
    show_section(store, section.id).await
}

async fn edit(store: &Store, needle: &str, title: Option<String>, fields: TaskFields) -> Result<()> {
    let today = today();
    let task = resolve_task(store, needle).await?;
    let mut form = TaskForm::from_task(&task);
    let form = if title.is_none() && fields.is_empty() {
        prompt_form(form, today)?
    } else {
        fields.apply(&mut form, today)?;
        if let Some(title) = title {
            form.title = title;
        }
        if form.recurring && form.due_to.is_none() {
            msg_warning!(Message::RecurrenceNeedsDueDate);
        }
        form
    };

    let payload = form.to_update(task.id)?;
    let updated = store.update_task(&payload).await?;
    msg_success!(Message::TaskUpdated(updated.title));
    show_section(store, task.section_id).await
}

async fn complete(store: &Store, needle: &str) -> Result<()> {
    let task = resolve_task(store, needle).await?;
    store.toggle_completed(&task).await?;
    if task.is_completed {
        msg_success!(Message::TaskReopened(task.title.clone()));
    } else {
        msg_success!(Message::TaskCompleted(task.title.clone()));
    }
    show_section(store, task.section_id).await
}

async fn archive(store: &Store, needle: &str) -> Result<()> {
    let task = resolve_task(store, needle).await?;
    store.toggle_archived(&task).await?;
    if task.is_archived {
        msg_success!(Message::TaskRestored(task.title.clone()));
    } else {
        msg_success!(Message::TaskArchived(task.title.clone()));
    }
    show_section(store, task.section_id).await
}

async fn delete(store: &Store, needle: &str, yes: bool) -> Result<()> {
    let task = resolve_task(store, needle).await?;
    let confirmed = yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteTask(task.title.clone()).to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    store.remove_task(&task).await?;
    msg_success!(Message::TaskDeleted(task.title.clone()));
    Ok(())
}

/// Keyboard-style drag: pick the task up, drop it on the one at `position`.
async fn reorder(store: &Store, needle: &str, position: usize) -> Result<()> {
    let task = resolve_task(store, needle).await?;
    let section = store.section(task.section_id).await?;
    let mut list = TaskList::new(section.id, section.tasks);

    let outcome = list.move_to(task.id, position)?;
    if outcome == DropOutcome::NoOp {
        msg_info!(Message::TaskAlreadyThere(task.title.clone(), position));
        return Ok(());
    }

    match store.commit_drop(&mut list, outcome).await {
        Ok(Some(request)) => {
            msg_success!(Message::TaskReordered(task.title.clone(), request.index));
        }
        Ok(None) => {}
        Err(e) => {
            msg_error!(Message::ReorderRolledBack(task.title.clone()));
            View::tasks(list.tasks(), today());
            return Err(e);
        }
    }
    View::tasks(list.tasks(), today());
    Ok(())
}

async fn move_task(store: &Store, needle: &str, to: Option<String>) -> Result<()> {
    let task = resolve_task(store, needle).await?;
    let target = pick_section(store, to.as_deref()).await?;
    if target.id == task.section_id {
        msg_info!(Message::TaskAlreadyInSection(task.title.clone(), target.title.clone()));
        return Ok(());
    }

    let request = TaskMove {
        task_id: task.id,
        section_to_id: target.id,
        index: 0,
    };
    store.move_task(&request, task.section_id).await?;
    msg_success!(Message::TaskMovedTo(task.title.clone(), target.title.clone()));
    show_section(store, target.id).await
}
