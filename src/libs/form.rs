//! Task and section forms and the request payloads they produce.
//!
//! Form fields hold raw user input; validation happens when a payload is
//! built. A recurrence rule is only ever submitted together with a due date:
//! toggling "recurring" on a task without a due date sends `recurrence: null`.

use super::task::{InvalidPeriod, RecurrenceInfo, RecurrenceType, Task};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_PERIOD: u32 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error(transparent)]
    InvalidPeriod(#[from] InvalidPeriod),
    #[error("'{0}' is not a valid position")]
    InvalidIndex(String),
    #[error("'{0}' is not a date, use YYYY-MM-DD, today, tomorrow or none")]
    InvalidDate(String),
}

/// Parses a due date typed by the user. Empty input and `none` clear it.
pub fn parse_due(text: &str, today: NaiveDate) -> Result<Option<NaiveDate>, FormError> {
    match text.trim().to_lowercase().as_str() {
        "" | "none" | "-" => Ok(None),
        "today" => Ok(Some(today)),
        "tomorrow" => Ok(today.succ_opt()),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| FormError::InvalidDate(text.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCreate {
    pub section_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_to: Option<NaiveDate>,
    pub recurrence: Option<RecurrenceInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskUpdate {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_to: Option<NaiveDate>,
    pub recurrence: Option<RecurrenceInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionCreate {
    pub title: String,
    pub parent_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionUpdate {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionMove {
    pub section_id: Uuid,
    pub to_parent_id: Uuid,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_to: Option<NaiveDate>,
    pub recurring: bool,
    pub period: u32,
    pub recurrence_type: RecurrenceType,
    pub flexible_mode: bool,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_to: None,
            recurring: false,
            period: DEFAULT_PERIOD,
            recurrence_type: RecurrenceType::default(),
            flexible_mode: false,
        }
    }
}

impl TaskForm {
    /// Prefills the form from an existing task.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_to: task.due_to,
            ..Self::default()
        };
        if let Some(recurrence) = task.recurrence {
            form.recurring = true;
            form.period = recurrence.period;
            form.recurrence_type = recurrence.recurrence_type;
            form.flexible_mode = recurrence.flexible_mode;
        }
        form
    }

    fn title(&self) -> Result<String, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyTitle);
        }
        Ok(title.to_string())
    }

    fn description(&self) -> Option<String> {
        let description = self.description.trim();
        (!description.is_empty()).then(|| description.to_string())
    }

    /// The recurrence to submit, if any.
    pub fn recurrence(&self) -> Result<Option<RecurrenceInfo>, FormError> {
        if !self.recurring || self.due_to.is_none() {
            return Ok(None);
        }
        Ok(Some(RecurrenceInfo::new(self.period, self.recurrence_type, self.flexible_mode)?))
    }

    pub fn to_create(&self, section_id: Uuid) -> Result<TaskCreate, FormError> {
        Ok(TaskCreate {
            section_id,
            title: self.title()?,
            description: self.description(),
            due_to: self.due_to,
            recurrence: self.recurrence()?,
        })
    }

    pub fn to_update(&self, id: Uuid) -> Result<TaskUpdate, FormError> {
        Ok(TaskUpdate {
            id,
            title: self.title()?,
            description: self.description(),
            due_to: self.due_to,
            recurrence: self.recurrence()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionForm {
    pub title: String,
}

impl SectionForm {
    pub fn new(title: &str) -> Self {
        Self { title: title.to_string() }
    }

    fn title(&self) -> Result<String, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyTitle);
        }
        Ok(title.to_string())
    }

    pub fn to_create(&self, parent_id: Uuid) -> Result<SectionCreate, FormError> {
        Ok(SectionCreate {
            title: self.title()?,
            parent_id,
        })
    }

    pub fn to_update(&self, id: Uuid) -> Result<SectionUpdate, FormError> {
        Ok(SectionUpdate { id, title: self.title()? })
    }
}

/// Move form; the index is typed by the user and is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMoveForm {
    pub parent_id: Uuid,
    pub index: String,
}

impl SectionMoveForm {
    pub fn to_request(&self, section_id: Uuid) -> Result<SectionMove, FormError> {
        let index = self
            .index
            .trim()
            .parse::<usize>()
            .map_err(|_| FormError::InvalidIndex(self.index.clone()))?;
        Ok(SectionMove {
            section_id,
            to_parent_id: self.parent_id,
            index,
        })
    }
}
