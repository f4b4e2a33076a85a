//! Drag-to-reorder for the tasks of one section.
//!
//! A [`TaskList`] owns the locally displayed order of a section's tasks and a
//! gesture state machine:
//!
//! ```text
//! Idle ──press──▶ Pending ──activation met──▶ Dragging ──drop──▶ Reconciling ──confirm/rollback──▶ Idle
//!                    │                            │
//!                    └─release: click             └─drop on itself / nowhere: no-op
//! ```
//!
//! A press only turns into a drag once the activation constraint of its input
//! kind is met (pointer distance, touch hold delay), so a plain click on a
//! task stays a click. A valid drop splices the local order immediately and
//! yields the [`TaskMove`] to send; the caller then either confirms it or, if
//! the request failed, rolls it back, which replays the inverse move.

use super::task::Task;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Mouse drags start after this many pixels of movement.
pub const POINTER_ACTIVATION_DISTANCE: f64 = 5.0;
/// Touch drags start after the finger is held this long...
pub const TOUCH_ACTIVATION_DELAY: Duration = Duration::from_millis(500);
/// ...without moving further than this (otherwise it is a scroll).
pub const TOUCH_TOLERANCE: f64 = 5.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorderError {
    #[error("another drag gesture is in progress")]
    GestureInProgress,
    #[error("no drag gesture is in progress")]
    NotDragging,
    #[error("no move is waiting for confirmation")]
    NothingToReconcile,
    #[error("a move is waiting for confirmation")]
    Reconciling,
    #[error("task {0} is not in this list")]
    UnknownTask(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Mouse,
    Touch,
    Keyboard,
}

/// Request payload for `POST /api/task/move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TaskMove {
    pub task_id: Uuid,
    pub section_to_id: Uuid,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub request: TaskMove,
    pub old_index: usize,
    pub new_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Pending { active: Uuid, kind: InputKind },
    Dragging { active: Uuid },
    Reconciling(PendingMove),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Released before the activation constraint was met.
    Click(Uuid),
    /// Dropped on itself or outside any target; nothing to send.
    NoOp,
    /// Order changed locally; the request must be sent and then confirmed or
    /// rolled back.
    Move(TaskMove),
}

/// Moves the element at `from` to `to`, keeping the relative order of all
/// other elements.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[derive(Debug, Clone)]
pub struct TaskList {
    section_id: Uuid,
    tasks: Vec<Task>,
    state: GestureState,
}

impl TaskList {
    pub fn new(section_id: Uuid, tasks: Vec<Task>) -> Self {
        Self {
            section_id,
            tasks,
            state: GestureState::Idle,
        }
    }

    pub fn section_id(&self) -> Uuid {
        self.section_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn index_of(&self, task_id: Uuid) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    /// Replaces the local order with a fresh server snapshot.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) -> Result<(), ReorderError> {
        if matches!(self.state, GestureState::Reconciling(_)) {
            return Err(ReorderError::Reconciling);
        }
        self.tasks = tasks;
        self.state = GestureState::Idle;
        Ok(())
    }

    pub fn press(&mut self, task_id: Uuid, kind: InputKind) -> Result<GestureState, ReorderError> {
        if self.state != GestureState::Idle {
            return Err(ReorderError::GestureInProgress);
        }
        if self.index_of(task_id).is_none() {
            return Err(ReorderError::UnknownTask(task_id));
        }
        self.state = match kind {
            InputKind::Keyboard => GestureState::Dragging { active: task_id },
            _ => GestureState::Pending { active: task_id, kind },
        };
        tracing::debug!(task = %task_id, ?kind, state = ?self.state, "press");
        Ok(self.state)
    }

    /// Feeds pointer progress since the press: total distance travelled and
    /// how long the press has been held.
    pub fn motion(&mut self, distance: f64, held: Duration) -> GestureState {
        if let GestureState::Pending { active, kind } = self.state {
            self.state = match kind {
                InputKind::Mouse if distance >= POINTER_ACTIVATION_DISTANCE => GestureState::Dragging { active },
                InputKind::Touch if distance > TOUCH_TOLERANCE => GestureState::Idle,
                InputKind::Touch if held >= TOUCH_ACTIVATION_DELAY => GestureState::Dragging { active },
                _ => self.state,
            };
            if self.state != (GestureState::Pending { active, kind }) {
                tracing::debug!(task = %active, state = ?self.state, "activation resolved");
            }
        }
        self.state
    }

    /// Aborts a pending or active drag without touching the order.
    pub fn cancel(&mut self) {
        if matches!(self.state, GestureState::Pending { .. } | GestureState::Dragging { .. }) {
            self.state = GestureState::Idle;
        }
    }

    pub fn drop_on(&mut self, over: Option<Uuid>) -> Result<DropOutcome, ReorderError> {
        let active = match self.state {
            GestureState::Pending { active, .. } => {
                self.state = GestureState::Idle;
                return Ok(DropOutcome::Click(active));
            }
            GestureState::Dragging { active } => active,
            GestureState::Idle => return Err(ReorderError::NotDragging),
            GestureState::Reconciling(_) => return Err(ReorderError::Reconciling),
        };
        self.state = GestureState::Idle;

        let over = match over {
            Some(over) if over != active => over,
            _ => return Ok(DropOutcome::NoOp),
        };
        let (Some(old_index), Some(new_index)) = (self.index_of(active), self.index_of(over)) else {
            return Ok(DropOutcome::NoOp);
        };

        array_move(&mut self.tasks, old_index, new_index);
        let request = TaskMove {
            task_id: active,
            section_to_id: self.section_id,
            index: new_index,
        };
        self.state = GestureState::Reconciling(PendingMove {
            request,
            old_index,
            new_index,
        });
        tracing::debug!(task = %active, old_index, new_index, "optimistic move applied");
        Ok(DropOutcome::Move(request))
    }

    /// Keyboard-driven reorder: pick up `task_id` and drop it on whatever task
    /// currently sits at `index`.
    pub fn move_to(&mut self, task_id: Uuid, index: usize) -> Result<DropOutcome, ReorderError> {
        let over = self.tasks.get(index.min(self.tasks.len().saturating_sub(1))).map(|t| t.id);
        self.press(task_id, InputKind::Keyboard)?;
        self.drop_on(over)
    }

    /// The server accepted the move.
    pub fn confirm(&mut self) -> Result<TaskMove, ReorderError> {
        match self.state {
            GestureState::Reconciling(pending) => {
                self.state = GestureState::Idle;
                Ok(pending.request)
            }
            _ => Err(ReorderError::NothingToReconcile),
        }
    }

    /// The server rejected the move: replay the inverse splice.
    pub fn rollback(&mut self) -> Result<TaskMove, ReorderError> {
        match self.state {
            GestureState::Reconciling(pending) => {
                array_move(&mut self.tasks, pending.new_index, pending.old_index);
                self.state = GestureState::Idle;
                tracing::debug!(task = %pending.request.task_id, "optimistic move rolled back");
                Ok(pending.request)
            }
            _ => Err(ReorderError::NothingToReconcile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(n: u128) -> Task {
        Task {
            id: Uuid::from_u128(n),
            section_id: Uuid::from_u128(100),
            title: format!("Task {}", n),
            description: None,
            content: None,
            is_completed: false,
            is_archived: false,
            added_at: "2025-01-01T00:00:00".to_string(),
            due_to: None,
            recurrence: None,
            attachments: vec![],
        }
    }

    fn list(n: u128) -> TaskList {
        TaskList::new(Uuid::from_u128(100), (1..=n).map(task).collect())
    }

    fn ids(list: &TaskList) -> Vec<u128> {
        list.tasks().iter().map(|t| t.id.as_u128()).collect()
    }

    #[test]
    fn array_move_is_stable() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        array_move(&mut items, 1, 3);
        assert_eq!(items, vec!['a', 'c', 'd', 'b', 'e']);
        array_move(&mut items, 3, 0);
        assert_eq!(items, vec!['b', 'a', 'c', 'd', 'e']);
    }

    #[test]
    fn every_drag_is_a_permutation_and_rollback_restores_it() {
        let n = 5;
        for from in 0..n {
            for to in 0..n {
                if from == to {
                    continue;
                }
                let mut list = list(n as u128);
                let original = ids(&list);
                let active = list.tasks()[from].id;
                let over = list.tasks()[to].id;

                list.press(active, InputKind::Mouse).unwrap();
                list.motion(POINTER_ACTIVATION_DISTANCE, Duration::ZERO);
                let outcome = list.drop_on(Some(over)).unwrap();
                assert_eq!(
                    outcome,
                    DropOutcome::Move(TaskMove {
                        task_id: active,
                        section_to_id: Uuid::from_u128(100),
                        index: to,
                    })
                );
                assert_eq!(list.index_of(active), Some(to));

                let mut sorted = ids(&list);
                sorted.sort();
                assert_eq!(sorted, original);

                list.rollback().unwrap();
                assert_eq!(ids(&list), original);
                assert_eq!(list.state(), GestureState::Idle);
            }
        }
    }

    #[test]
    fn confirm_keeps_the_new_order() {
        let mut list = list(3);
        list.move_to(Uuid::from_u128(1), 2).unwrap();
        list.confirm().unwrap();
        assert_eq!(ids(&list), vec![2, 3, 1]);
        assert_eq!(list.confirm(), Err(ReorderError::NothingToReconcile));
    }

    #[test]
    fn short_mouse_motion_is_a_click() {
        let mut list = list(3);
        list.press(Uuid::from_u128(2), InputKind::Mouse).unwrap();
        assert!(matches!(list.motion(2.0, Duration::from_millis(50)), GestureState::Pending { .. }));
        assert_eq!(list.drop_on(Some(Uuid::from_u128(3))), Ok(DropOutcome::Click(Uuid::from_u128(2))));
        assert_eq!(ids(&list), vec![1, 2, 3]);
    }

    #[test]
    fn touch_needs_a_steady_hold() {
        let mut list = list(3);
        list.press(Uuid::from_u128(1), InputKind::Touch).unwrap();
        assert!(matches!(list.motion(1.0, Duration::from_millis(100)), GestureState::Pending { .. }));
        assert_eq!(list.motion(2.0, TOUCH_ACTIVATION_DELAY), GestureState::Dragging { active: Uuid::from_u128(1) });

        list.cancel();
        list.press(Uuid::from_u128(1), InputKind::Touch).unwrap();
        assert_eq!(list.motion(TOUCH_TOLERANCE + 1.0, Duration::from_millis(100)), GestureState::Idle);
    }

    #[test]
    fn drop_on_itself_or_nowhere_is_a_no_op() {
        let mut list = list(3);
        list.press(Uuid::from_u128(2), InputKind::Keyboard).unwrap();
        assert_eq!(list.drop_on(Some(Uuid::from_u128(2))), Ok(DropOutcome::NoOp));
        list.press(Uuid::from_u128(2), InputKind::Keyboard).unwrap();
        assert_eq!(list.drop_on(None), Ok(DropOutcome::NoOp));
        assert_eq!(ids(&list), vec![1, 2, 3]);
        assert_eq!(list.rollback(), Err(ReorderError::NothingToReconcile));
    }

    #[test]
    fn one_gesture_at_a_time() {
        let mut list = list(3);
        list.move_to(Uuid::from_u128(3), 0).unwrap();
        assert_eq!(list.press(Uuid::from_u128(1), InputKind::Mouse), Err(ReorderError::GestureInProgress));
        assert_eq!(list.replace_tasks(vec![]), Err(ReorderError::Reconciling));
        list.confirm().unwrap();
        list.replace_tasks(vec![task(9)]).unwrap();
        assert_eq!(ids(&list), vec![9]);
    }

    #[test]
    fn unknown_task_cannot_be_picked_up() {
        let mut list = list(2);
        let stranger = Uuid::from_u128(42);
        assert_eq!(list.press(stranger, InputKind::Mouse), Err(ReorderError::UnknownTask(stranger)));
    }
}
