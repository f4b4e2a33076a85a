//! `planty attach`: encrypted file attachments.
//!
//! Files are encrypted locally before upload and decrypted after download;
//! the key and IV are stored with the attachment record on the server.

use super::store;
use super::task::resolve_task;
use crate::libs::attachment::encrypt_file;
use crate::libs::messages::Message;
use crate::libs::task::{Attachment, Task};
use crate::{msg_error_anyhow, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct AttachArgs {
    #[command(subcommand)]
    command: AttachCommand,
}

#[derive(Debug, Subcommand)]
enum AttachCommand {
    /// Encrypt a file and attach it to a task
    Add { task: String, file: PathBuf },
    /// Delete an attachment
    Remove { task: String, attachment: String },
    /// Download and decrypt an attachment
    Get {
        task: String,
        attachment: String,
        /// Where to write the file; the attachment name by default
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Attachment by id, or by the file name it was uploaded with.
fn find_attachment<'a>(task: &'a Task, needle: &str) -> Result<&'a Attachment> {
    let needle = needle.trim();
    task.attachments
        .iter()
        .find(|a| a.id.to_string() == needle || file_name(a) == needle)
        .ok_or_else(|| msg_error_anyhow!(Message::AttachmentNotFound(needle.to_string(), task.title.clone())))
}

/// Last component of the storage key.
fn file_name(attachment: &Attachment) -> &str {
    attachment.s3_file_key.rsplit('/').next().unwrap_or(&attachment.s3_file_key)
}

pub async fn cmd(attach_args: AttachArgs) -> Result<()> {
    let store = store()?;
    match attach_args.command {
        AttachCommand::Add { task, file } => {
            let task = resolve_task(&store, &task).await?;
            let encrypted = encrypt_file(&file)?;
            let name = encrypted.file_name.clone();
            store.add_attachment(&task, encrypted).await?;
            msg_success!(Message::AttachmentAdded(name, task.title));
        }
        AttachCommand::Remove { task, attachment } => {
            let task = resolve_task(&store, &task).await?;
            let attachment = find_attachment(&task, &attachment)?;
            store.remove_attachment(&task, attachment.id).await?;
            msg_success!(Message::AttachmentRemoved(file_name(attachment).to_string()));
        }
        AttachCommand::Get { task, attachment, output } => {
            let task = resolve_task(&store, &task).await?;
            let attachment = find_attachment(&task, &attachment)?;
            let bytes = store.api().download_attachment(attachment).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(file_name(attachment)));
            std::fs::write(&path, bytes)?;
            msg_success!(Message::AttachmentSaved(path.display().to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn attachment(key: &str) -> Attachment {
        Attachment {
            id: Uuid::from_u128(7),
            aes_key_b64: String::new(),
            aes_iv_b64: String::new(),
            s3_file_key: key.to_string(),
            task_id: Uuid::from_u128(1),
            added_at: "2025-01-01T00:00:00".to_string(),
            url: String::new(),
        }
    }

    #[test]
    fn file_name_is_the_last_key_segment() {
        assert_eq!(file_name(&attachment("user/task/photo.jpg")), "photo.jpg");
        assert_eq!(file_name(&attachment("photo.jpg")), "photo.jpg");
    }
}
