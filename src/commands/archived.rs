use super::{store, today};
use crate::libs::messages::Message;
use crate::libs::task::Task;
use crate::libs::view::View;
use crate::{msg_error_anyhow, msg_info, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ArchivedArgs {
    /// Unarchive a task, by id or title
    #[arg(short, long)]
    restore: Option<String>,
}

fn matches(task: &Task, needle: &str) -> bool {
    let needle = needle.trim();
    task.id.to_string() == needle || task.title.trim().to_lowercase() == needle.to_lowercase()
}

pub async fn cmd(archived_args: ArchivedArgs) -> Result<()> {
    let store = store()?;
    let archived = store.archived().await?;

    let Some(needle) = archived_args.restore else {
        if archived.tasks.is_empty() {
            msg_info!(Message::NoArchivedTasks);
        } else {
            View::tasks(&archived.tasks, today());
        }
        return Ok(());
    };

    let found: Vec<&Task> = archived.tasks.iter().filter(|t| matches(t, &needle)).collect();
    let task = match found.as_slice() {
        [task] => *task,
        [] => return Err(msg_error_anyhow!(Message::TaskNotFound(needle))),
        many => return Err(msg_error_anyhow!(Message::AmbiguousTask(needle, many.len()))),
    };

    store.toggle_archived(task).await?;
    msg_success!(Message::TaskRestored(task.title.clone()));
    Ok(())
}
