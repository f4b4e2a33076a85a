//! Task, recurrence, attachment and user models as exchanged with the Planty API.
//!
//! These types mirror the JSON documents served by the backend. Timestamps are
//! kept as the strings the server sends; due dates are parsed into
//! [`NaiveDate`] since the client computes with them (calendar buckets,
//! urgency markers).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unit of a recurrence period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    #[default]
    Days,
    Weeks,
    Months,
    Years,
}

impl RecurrenceType {
    pub const ALL: [RecurrenceType; 4] = [Self::Days, Self::Weeks, Self::Months, Self::Years];
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        };
        f.write_str(name)
    }
}

impl FromStr for RecurrenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.to_string() == unit || t.to_string().trim_end_matches('s') == unit)
            .ok_or_else(|| format!("unknown recurrence unit '{}', expected days, weeks, months or years", s))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("recurrence period must be a positive number")]
pub struct InvalidPeriod;

/// Recurrence rule of a task.
///
/// The next due date is computed by the server. With `flexible_mode` set it is
/// counted from the completion date instead of the previous due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceInfo {
    pub period: u32,
    #[serde(rename = "type")]
    pub recurrence_type: RecurrenceType,
    pub flexible_mode: bool,
}

impl RecurrenceInfo {
    pub fn new(period: u32, recurrence_type: RecurrenceType, flexible_mode: bool) -> Result<Self, InvalidPeriod> {
        if period == 0 {
            return Err(InvalidPeriod);
        }
        Ok(Self {
            period,
            recurrence_type,
            flexible_mode,
        })
    }
}

impl fmt::Display for RecurrenceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {} {}", self.period, self.recurrence_type)?;
        if self.flexible_mode {
            write!(f, " (flexible)")?;
        }
        Ok(())
    }
}

/// Reference to a client-encrypted file stored next to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub aes_key_b64: String,
    pub aes_iv_b64: String,
    pub s3_file_key: String,
    pub task_id: Uuid,
    pub added_at: String,
    pub url: String,
}

/// Pre-signed form upload target for a new attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentUploadInfo {
    pub post_url: String,
    pub post_fields: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub section_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub is_completed: bool,
    pub is_archived: bool,
    pub added_at: String,
    #[serde(default)]
    pub due_to: Option<NaiveDate>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceInfo>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Task {
    pub fn is_recurrent(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn attachment(&self, id: Uuid) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_verified: bool,
}

/// Tasks falling on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTasks {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

/// Response of the by-date query: one entry per day in the range plus
/// everything due before the range start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TasksByDate {
    #[serde(default)]
    pub by_dates: Vec<DateTasks>,
    #[serde(default)]
    pub overdue: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ArchivedTasks {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recurrence_uses_type_on_the_wire() {
        let recurrence = RecurrenceInfo::new(7, RecurrenceType::Days, false).unwrap();
        let value = serde_json::to_value(recurrence).unwrap();
        assert_eq!(value, json!({"period": 7, "type": "days", "flexible_mode": false}));
    }

    #[test]
    fn recurrence_unit_parses_singular_and_plural() {
        assert_eq!("week".parse::<RecurrenceType>(), Ok(RecurrenceType::Weeks));
        assert_eq!("Months".parse::<RecurrenceType>(), Ok(RecurrenceType::Months));
        assert!("fortnight".parse::<RecurrenceType>().is_err());
    }

    #[test]
    fn zero_period_is_rejected() {
        assert_eq!(RecurrenceInfo::new(0, RecurrenceType::Weeks, true), Err(InvalidPeriod));
    }

    #[test]
    fn task_with_missing_optionals_deserializes() {
        let task: Task = serde_json::from_value(json!({
            "id": "0b6c5b40-7f5b-4d6c-9b2a-8b0f3f3b8a11",
            "section_id": "1c0f4a52-31b2-4bb0-a0e1-2f1d0b3e9c22",
            "title": "Water the plants",
            "is_completed": false,
            "is_archived": false,
            "added_at": "2025-01-10T08:00:00",
            "due_to": "2025-01-15",
            "recurrence": {"period": 3, "type": "days", "flexible_mode": true}
        }))
        .unwrap();
        assert_eq!(task.due_to, NaiveDate::from_ymd_opt(2025, 1, 15));
        assert!(task.is_recurrent());
        assert!(task.attachments.is_empty());
        assert_eq!(task.recurrence.unwrap().to_string(), "every 3 days (flexible)");
    }
}
