use super::task::Task;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node of the user's task hierarchy.
///
/// The backend always keeps one synthetic root section (the only one with
/// `parent_id == None`); everything the user creates hangs below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub added_at: String,
    #[serde(default)]
    pub subsections: Vec<Section>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Section {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.subsections.is_empty()
    }
}
