//! Cached access to the Planty API.
//!
//! Reads go through the [`ResourceCache`]; every write runs its request and
//! then invalidates whatever its [`Mutation`] declares, so the next read of
//! an affected resource refetches it from the server. Nothing is merged
//! locally except the optimistic task reorder handled by [`Store::commit_drop`].

use super::cache::{Mutation, ResourceCache, ResourceKey};
use super::error::ApiError;
use super::planty::PlantyApi;
use super::transport::{HttpTransport, Transport};
use crate::libs::attachment::EncryptedFile;
use crate::libs::calendar::CalendarWeek;
use crate::libs::config::Config;
use crate::libs::form::{SectionCreate, SectionMove, SectionUpdate, TaskCreate, TaskUpdate};
use crate::libs::hierarchy::{build_tree, SectionTree, SectionsQuery};
use crate::libs::reorder::{DropOutcome, TaskList, TaskMove};
use crate::libs::section::Section;
use crate::libs::task::{ArchivedTasks, Task, TasksByDate, User};
use anyhow::Result;
use uuid::Uuid;

/// The API client plus its read cache.
///
/// Commands build one `Store` per invocation with [`Store::from_config`];
/// tests build one over a mock server with [`Store::new`].
pub struct Store<T: Transport = HttpTransport> {
    api: PlantyApi<T>,
    cache: ResourceCache,
    auto_archive: bool,
}

impl Store<HttpTransport> {
    /// Creates a store for the configured backend and auto-archive setting.
    pub fn from_config(config: &Config) -> Self {
        Self::new(PlantyApi::from_config(config)).with_auto_archive(config.auto_archive)
    }

    /// Uploads an encrypted file and attaches it to `task`.
    ///
    /// # Arguments
    ///
    /// * `task` - The task to attach to; its section is invalidated
    /// * `file` - Ciphertext produced by `libs::attachment::encrypt_file`
    ///
    /// # Returns
    ///
    /// * `Result<()>` - Fails if the upload URL cannot be issued or the upload is rejected
    pub async fn add_attachment(&self, task: &Task, file: EncryptedFile) -> Result<()> {
        self.api.upload_attachment(task.id, file).await?;
        self.cache.apply(&Mutation::AttachmentChanged {
            section_id: task.section_id,
        });
        Ok(())
    }
}

impl<T: Transport> Store<T> {
    /// Wraps `api` with an empty cache. Auto-archive defaults to on.
    pub fn new(api: PlantyApi<T>) -> Self {
        Self {
            api,
            cache: ResourceCache::new(),
            auto_archive: true,
        }
    }

    pub fn with_auto_archive(mut self, auto_archive: bool) -> Self {
        self.auto_archive = auto_archive;
        self
    }

    pub fn api(&self) -> &PlantyApi<T> {
        &self.api
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    // --- reads ---

    /// The signed-in user, or `None` when there is no session.
    pub async fn me(&self) -> Result<Option<User>, ApiError> {
        self.cache.get_or_fetch(ResourceKey::Me, || self.api.me()).await
    }

    /// Raw sections for `query`, cached per query shape.
    pub async fn sections(&self, query: SectionsQuery) -> Result<Vec<Section>, ApiError> {
        self.cache
            .get_or_fetch(ResourceKey::Sections(query), || self.api.sections(query))
            .await
    }

    /// Sections for `query` normalized into a [`SectionTree`].
    ///
    /// # Arguments
    ///
    /// * `query` - Which projection to ask for: full tree, leaves or flat
    ///
    /// # Returns
    ///
    /// * `Result<SectionTree, ApiError>` - Root children and the root id
    pub async fn section_tree(&self, query: SectionsQuery) -> Result<SectionTree, ApiError> {
        Ok(build_tree(self.sections(query).await?, query))
    }

    pub async fn section(&self, section_id: Uuid) -> Result<Section, ApiError> {
        self.cache
            .get_or_fetch(ResourceKey::Section(section_id), || self.api.section(section_id))
            .await
    }

    /// Due tasks for one calendar week, including overdue ones.
    pub async fn tasks_by_date(&self, week: &CalendarWeek) -> Result<TasksByDate, ApiError> {
        let key = ResourceKey::TasksByDate {
            not_before: week.start,
            not_after: week.end,
        };
        self.cache
            .get_or_fetch(key, || self.api.tasks_by_date(week.start, week.end))
            .await
    }

    pub async fn archived(&self) -> Result<ArchivedTasks, ApiError> {
        self.cache.get_or_fetch(ResourceKey::Archived, || self.api.archived()).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Task>, ApiError> {
        self.cache
            .get_or_fetch(ResourceKey::Search(query.to_string()), || self.api.search(query))
            .await
    }

    /// Looks a task up by id through the section tree.
    pub async fn find_task(&self, task_id: Uuid) -> Result<Option<Task>, ApiError> {
        let tree = self.section_tree(SectionsQuery::flat()).await?;
        for summary in &tree.sections {
            let section = self.section(summary.id).await?;
            if let Some(task) = section.tasks.into_iter().find(|t| t.id == task_id) {
                return Ok(Some(task));
            }
        }
        Ok(None)
    }

    // --- auth ---

    /// Signs in and drops every cached resource of the previous session.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.api.login(email, password).await?;
        self.cache.apply(&Mutation::SessionChanged);
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api.logout().await?;
        self.cache.apply(&Mutation::SessionChanged);
        Ok(())
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<User, ApiError> {
        self.api.register(email, password).await
    }

    // --- task writes ---

    pub async fn create_task(&self, payload: &TaskCreate) -> Result<Uuid, ApiError> {
        let id = self.api.create_task(payload).await?;
        self.cache.apply(&Mutation::TaskCreated {
            section_id: payload.section_id,
        });
        Ok(id)
    }

    pub async fn update_task(&self, payload: &TaskUpdate) -> Result<Task, ApiError> {
        let task = self.api.update_task(payload).await?;
        self.cache.apply(&Mutation::TaskUpdated {
            section_id: task.section_id,
        });
        Ok(task)
    }

    pub async fn remove_task(&self, task: &Task) -> Result<(), ApiError> {
        self.api.remove_task(task.id).await?;
        self.cache.apply(&Mutation::TaskRemoved {
            section_id: task.section_id,
        });
        Ok(())
    }

    /// Completing a task also archives it when auto-archive is on.
    pub async fn toggle_completed(&self, task: &Task) -> Result<Section, ApiError> {
        let section = self.api.toggle_completed(task.id, self.auto_archive).await?;
        self.cache.apply(&Mutation::TaskCompletionToggled {
            section_id: task.section_id,
        });
        Ok(section)
    }

    pub async fn toggle_archived(&self, task: &Task) -> Result<Section, ApiError> {
        let section = self.api.toggle_archived(task.id).await?;
        self.cache.apply(&Mutation::TaskArchiveToggled {
            section_id: task.section_id,
        });
        Ok(section)
    }

    /// Moves a task to `request.index` of `request.section_to_id`.
    ///
    /// # Arguments
    ///
    /// * `request` - Task, target section and zero-based target index
    /// * `from_section_id` - The section the task leaves; both sections are invalidated
    pub async fn move_task(&self, request: &TaskMove, from_section_id: Uuid) -> Result<(), ApiError> {
        self.api.move_task(request).await?;
        self.cache.apply(&Mutation::TaskMoved {
            from_section_id,
            to_section_id: request.section_to_id,
        });
        Ok(())
    }

    /// Commits the result of a drop gesture.
    ///
    /// Sends the move, then confirms it and reloads the list from the
    /// server. Clicks and no-op drops send nothing.
    ///
    /// # Arguments
    ///
    /// * `list` - The list the gesture ran on; it must be `Reconciling` for a move
    /// * `outcome` - What `TaskList::drop_on` or `TaskList::move_to` returned
    ///
    /// # Returns
    ///
    /// * `Ok(Some(request))` - The server accepted the move
    /// * `Ok(None)` - Nothing was sent
    /// * `Err(_)` - The server rejected the move and the local order was rolled back
    ///
    /// A failed reload after an accepted move is not an error: the move
    /// stands and the list keeps the optimistic order.
    pub async fn commit_drop(&self, list: &mut TaskList, outcome: DropOutcome) -> Result<Option<TaskMove>> {
        let DropOutcome::Move(request) = outcome else {
            return Ok(None);
        };

        if let Err(e) = self.move_task(&request, list.section_id()).await {
            list.rollback()?;
            return Err(e.into());
        }
        list.confirm()?;

        match self.section(list.section_id()).await {
            Ok(section) => list.replace_tasks(section.tasks)?,
            Err(e) => tracing::warn!(section = %list.section_id(), error = %e, "reload after move failed"),
        }
        Ok(Some(request))
    }

    pub async fn remove_attachment(&self, task: &Task, attachment_id: Uuid) -> Result<(), ApiError> {
        self.api.remove_attachment(task.id, attachment_id).await?;
        self.cache.apply(&Mutation::AttachmentChanged {
            section_id: task.section_id,
        });
        Ok(())
    }

    // --- section writes ---

    pub async fn create_section(&self, payload: &SectionCreate) -> Result<Uuid, ApiError> {
        let id = self.api.create_section(payload).await?;
        self.cache.apply(&Mutation::SectionCreated);
        Ok(id)
    }

    pub async fn edit_section(&self, payload: &SectionUpdate) -> Result<Section, ApiError> {
        let section = self.api.edit_section(payload).await?;
        self.cache.apply(&Mutation::SectionEdited);
        Ok(section)
    }

    /// Reparents a section. Every section listing is invalidated.
    pub async fn move_section(&self, payload: &SectionMove) -> Result<(), ApiError> {
        self.api.move_section(payload).await?;
        self.cache.apply(&Mutation::SectionMoved);
        Ok(())
    }

    /// Asks the server to shuffle the tasks of a section into a random order.
    pub async fn shuffle_section(&self, section_id: Uuid) -> Result<Section, ApiError> {
        let section = self.api.shuffle_section(section_id).await?;
        self.cache.apply(&Mutation::SectionShuffled { section_id });
        Ok(section)
    }
}
