//! `planty section`: browse and edit the section tree.
//!
//! Sections are addressed by id or by title (case-insensitive). When no
//! section is given, a picker over the whole tree is shown.

use super::{store, today};
use crate::api::Store;
use crate::libs::form::{SectionForm, SectionMoveForm};
use crate::libs::hierarchy::{find_by_title, parent_choices, section_choices, SectionTree, SectionsQuery};
use crate::libs::messages::Message;
use crate::libs::section::Section;
use crate::libs::view::View;
use crate::{msg_error_anyhow, msg_info, msg_print, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Args)]
pub struct SectionArgs {
    #[command(subcommand)]
    command: SectionCommand,
}

#[derive(Debug, Subcommand)]
enum SectionCommand {
    /// Show the section tree
    List {
        /// Only sections without subsections
        #[arg(short, long)]
        leaves: bool,
    },
    /// Show the tasks of a section
    Show { section: Option<String> },
    /// Create a section
    Create {
        title: Option<String>,
        /// Parent section; the top level when omitted
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Rename a section
    Edit { section: Option<String>, title: Option<String> },
    /// Move a section under another parent
    Move {
        section: Option<String>,
        /// New parent; "root" for the top level
        #[arg(short, long)]
        parent: Option<String>,
        /// Zero-based position among the new siblings
        #[arg(short, long)]
        index: Option<String>,
    },
    /// Shuffle the tasks of a section
    Shuffle { section: Option<String> },
}

pub async fn cmd(section_args: SectionArgs) -> Result<()> {
    let store = store()?;
    match section_args.command {
        SectionCommand::List { leaves } => list(&store, leaves).await,
        SectionCommand::Show { section } => {
            let section = pick_section(&store, section.as_deref()).await?;
            show(&section);
            Ok(())
        }
        SectionCommand::Create { title, parent } => create(&store, title, parent).await,
        SectionCommand::Edit { section, title } => edit(&store, section, title).await,
        SectionCommand::Move { section, parent, index } => move_section(&store, section, parent, index).await,
        SectionCommand::Shuffle { section } => {
            let section = pick_section(&store, section.as_deref()).await?;
            let shuffled = store.shuffle_section(section.id).await?;
            msg_success!(Message::SectionShuffled(shuffled.title.clone()));
            show(&store.section(section.id).await?);
            Ok(())
        }
    }
}

async fn list(store: &Store, leaves: bool) -> Result<()> {
    let query = if leaves { SectionsQuery::leaves() } else { SectionsQuery::tree() };
    let tree = store.section_tree(query).await?;
    if tree.sections.is_empty() {
        msg_info!(Message::NoSections);
        return Ok(());
    }
    View::sections(&tree);
    Ok(())
}

fn show(section: &Section) {
    msg_print!(Message::SectionHeader(section.title.clone()), true);
    if section.tasks.is_empty() {
        msg_info!(Message::SectionEmpty(section.title.clone()));
        return;
    }
    View::tasks(&section.tasks, today());
}

/// Finds a section in the tree by id or title.
fn lookup<'a>(tree: &'a SectionTree, needle: &str) -> Result<&'a Section> {
    if let Ok(id) = Uuid::parse_str(needle.trim()) {
        return Ok(tree.find(id)?);
    }
    match find_by_title(&tree.sections, needle).as_slice() {
        [section] => Ok(*section),
        [] => Err(msg_error_anyhow!(Message::SectionNotFoundByName(needle.to_string()))),
        many => Err(msg_error_anyhow!(Message::AmbiguousSection(needle.to_string(), many.len()))),
    }
}

fn select(tree: &SectionTree, prompt: Message) -> Result<Uuid> {
    let choices = section_choices(tree, &HashSet::new());
    if choices.is_empty() {
        return Err(msg_error_anyhow!(Message::NoSections));
    }
    let labels: Vec<String> = choices.iter().map(|c| c.label()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(choices[selection].id)
}

/// Resolves `needle` (or asks) and loads the section with its tasks.
pub(crate) async fn pick_section(store: &Store, needle: Option<&str>) -> Result<Section> {
    let tree = store.section_tree(SectionsQuery::tree()).await?;
    let id = match needle {
        Some(needle) => lookup(&tree, needle)?.id,
        None => select(&tree, Message::PromptSelectSection)?,
    };
    Ok(store.section(id).await?)
}

async fn create(store: &Store, title: Option<String>, parent: Option<String>) -> Result<()> {
    let tree = store.section_tree(SectionsQuery::tree()).await?;
    let parent_id = match parent.as_deref() {
        None | Some("root") => tree.root_id()?,
        Some(needle) => lookup(&tree, needle)?.id,
    };
    let title = match title {
        Some(title) => title,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSectionTitle.to_string())
            .interact_text()?,
    };

    let payload = SectionForm::new(&title).to_create(parent_id)?;
    store.create_section(&payload).await?;
    msg_success!(Message::SectionCreated(payload.title));
    list(store, false).await
}

async fn edit(store: &Store, section: Option<String>, title: Option<String>) -> Result<()> {
    let section = pick_section(store, section.as_deref()).await?;
    let title = match title {
        Some(title) => title,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSectionTitle.to_string())
            .default(section.title.clone())
            .interact_text()?,
    };

    let payload = SectionForm::new(&title).to_update(section.id)?;
    let updated = store.edit_section(&payload).await?;
    msg_success!(Message::SectionRenamed(section.title, updated.title));
    Ok(())
}

async fn move_section(store: &Store, section: Option<String>, parent: Option<String>, index: Option<String>) -> Result<()> {
    let tree = store.section_tree(SectionsQuery::tree()).await?;
    let moving = match section.as_deref() {
        Some(needle) => lookup(&tree, needle)?.clone(),
        None => tree.find(select(&tree, Message::PromptSelectSection)?)?.clone(),
    };

    let choices = parent_choices(&tree, moving.id)?;
    let parent_id = match parent.as_deref() {
        Some("root") => tree.root_id()?,
        Some(needle) => {
            let parent = lookup(&tree, needle)?;
            if !choices.iter().any(|c| c.id == parent.id) {
                return Err(msg_error_anyhow!(Message::InvalidParent(parent.title.clone())));
            }
            parent.id
        }
        None => {
            let labels: Vec<String> = choices.iter().map(|c| c.label()).collect();
            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptNewParent(moving.title.clone()).to_string())
                .items(&labels)
                .default(0)
                .interact()?;
            choices[selection].id
        }
    };
    let index = match index {
        Some(index) => index,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptPosition.to_string())
            .default("0".to_string())
            .interact_text()?,
    };

    let payload = SectionMoveForm { parent_id, index }.to_request(moving.id)?;
    store.move_section(&payload).await?;
    msg_success!(Message::SectionMoved(moving.title));
    list(store, false).await
}
