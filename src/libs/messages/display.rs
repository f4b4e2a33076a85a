use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let s = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigDeleted => "Configuration and saved credentials removed".to_string(),
            Message::ConfigModuleServer => "Server".to_string(),
            Message::ConfigModuleAccount => "Account".to_string(),
            Message::ConfigModuleTasks => "Tasks".to_string(),
            Message::PromptSelectModules => "Select settings to change".to_string(),
            Message::PromptApiUrl => "Planty API URL".to_string(),
            Message::PromptEmail => "Email".to_string(),
            Message::PromptAutoArchive => "Archive tasks when they are completed?".to_string(),

            // === AUTH MESSAGES ===
            Message::PromptPassword(email) => format!("Password for {}", email),
            Message::PromptNewPassword => "Password".to_string(),
            Message::PromptRepeatPassword => "Repeat password".to_string(),
            Message::PasswordMismatch => "Passwords do not match".to_string(),
            Message::BadCredentials => "Wrong email or password".to_string(),
            Message::WrongPassword(attempts) => format!("Login failed {} times, giving up", attempts),
            Message::LoggedIn(email) => format!("Logged in as {}", email),
            Message::LoggedOut => "Logged out".to_string(),
            Message::Registered(email) => format!("Account {} created", email),
            Message::NotLoggedIn => "You are not logged in".to_string(),
            Message::LoginHint => "Run `planty login` to sign in".to_string(),

            // === SECTION MESSAGES ===
            Message::NoSections => "No sections yet. Create one with `planty section create`".to_string(),
            Message::SectionHeader(title) => format!("== {} ==", title),
            Message::SectionEmpty(title) => format!("'{}' has no tasks", title),
            Message::SectionNotFoundByName(needle) => format!("No section matches '{}'", needle),
            Message::AmbiguousSection(needle, count) => {
                format!("{} sections match '{}', use the section id instead", count, needle)
            }
            Message::PromptSelectSection => "Section".to_string(),
            Message::PromptSectionTitle => "Section title".to_string(),
            Message::SectionCreated(title) => format!("Section '{}' created", title),
            Message::SectionRenamed(old, new) => format!("Section '{}' renamed to '{}'", old, new),
            Message::InvalidParent(title) => {
                format!("'{}' cannot be the parent: a section cannot move into itself or its subsections", title)
            }
            Message::PromptNewParent(title) => format!("New parent for '{}'", title),
            Message::PromptPosition => "Position among siblings (0 is first)".to_string(),
            Message::SectionMoved(title) => format!("Section '{}' moved", title),
            Message::SectionShuffled(title) => format!("Tasks in '{}' shuffled", title),

            // === TASK MESSAGES ===
            Message::TaskCreated(title) => format!("Task '{}' created", title),
            Message::TaskUpdated(title) => format!("Task '{}' updated", title),
            Message::TaskDeleted(title) => format!("Task '{}' deleted", title),
            Message::TaskCompleted(title) => format!("Task '{}' completed", title),
            Message::TaskReopened(title) => format!("Task '{}' is open again", title),
            Message::TaskArchived(title) => format!("Task '{}' archived", title),
            Message::TaskRestored(title) => format!("Task '{}' restored from the archive", title),
            Message::TaskNotFound(needle) => format!("No task matches '{}'", needle),
            Message::AmbiguousTask(needle, count) => {
                format!("{} tasks match '{}', use the task id instead", count, needle)
            }
            Message::NoTasksFound(query) => format!("Nothing found for '{}'", query),
            Message::NoArchivedTasks => "The archive is empty".to_string(),
            Message::ConfirmDeleteTask(title) => format!("Delete task '{}'?", title),
            Message::OperationCancelled => "Cancelled".to_string(),
            Message::PromptTaskTitle => "Title".to_string(),
            Message::PromptTaskDescription => "Description".to_string(),
            Message::PromptDueDate => "Due date (YYYY-MM-DD, today, tomorrow, empty for none)".to_string(),
            Message::PromptRecurring => "Repeat this task?".to_string(),
            Message::PromptPeriod => "Repeat every".to_string(),
            Message::PromptRecurrenceType => "Unit".to_string(),
            Message::PromptFlexibleMode => "Count from the completion date?".to_string(),
            Message::InvalidPeriod => "Period must be a positive number".to_string(),
            Message::RecurrenceNeedsDueDate => "Repeating tasks need a due date; the task will be saved without repeat".to_string(),

            // === REORDER MESSAGES ===
            Message::TaskReordered(title, index) => format!("Task '{}' moved to position {}", title, index),
            Message::TaskAlreadyThere(title, index) => format!("Task '{}' is already at position {}", title, index),
            Message::ReorderRolledBack(title) => format!("Could not move '{}', the previous order was restored", title),
            Message::TaskMovedTo(title, section) => format!("Task '{}' moved to '{}'", title, section),
            Message::TaskAlreadyInSection(title, section) => format!("Task '{}' is already in '{}'", title, section),

            // === CALENDAR MESSAGES ===
            Message::NothingDue => "Nothing due this week".to_string(),

            // === ATTACHMENT MESSAGES ===
            Message::AttachmentAdded(file, task) => format!("'{}' attached to '{}'", file, task),
            Message::AttachmentRemoved(file) => format!("Attachment '{}' removed", file),
            Message::AttachmentSaved(path) => format!("Saved to {}", path),
            Message::AttachmentNotFound(needle, task) => format!("Task '{}' has no attachment '{}'", task, needle),
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_interpolate_their_arguments() {
        assert_eq!(Message::TaskCreated("Water the plants".into()).to_string(), "Task 'Water the plants' created");
        assert_eq!(
            Message::SectionRenamed("Home".into(), "House".into()).to_string(),
            "Section 'Home' renamed to 'House'"
        );
        assert_eq!(Message::WrongPassword(3).to_string(), "Login failed 3 times, giving up");
    }
}
