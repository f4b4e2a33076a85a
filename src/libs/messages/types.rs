/// Every user-facing line printed by the CLI.
#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleServer,
    ConfigModuleAccount,
    ConfigModuleTasks,
    PromptSelectModules,
    PromptApiUrl,
    PromptEmail,
    PromptAutoArchive,

    // === AUTH MESSAGES ===
    PromptPassword(String), // email
    PromptNewPassword,
    PromptRepeatPassword,
    PasswordMismatch,
    BadCredentials,
    WrongPassword(u32), // attempts
    LoggedIn(String),
    LoggedOut,
    Registered(String),
    NotLoggedIn,
    LoginHint,

    // === SECTION MESSAGES ===
    NoSections,
    SectionHeader(String),
    SectionEmpty(String),
    SectionNotFoundByName(String),
    AmbiguousSection(String, usize), // needle, matches
    PromptSelectSection,
    PromptSectionTitle,
    SectionCreated(String),
    SectionRenamed(String, String), // old, new
    InvalidParent(String),
    PromptNewParent(String),
    PromptPosition,
    SectionMoved(String),
    SectionShuffled(String),

    // === TASK MESSAGES ===
    TaskCreated(String),
    TaskUpdated(String),
    TaskDeleted(String),
    TaskCompleted(String),
    TaskReopened(String),
    TaskArchived(String),
    TaskRestored(String),
    TaskNotFound(String),
    AmbiguousTask(String, usize), // needle, matches
    NoTasksFound(String),         // query
    NoArchivedTasks,
    ConfirmDeleteTask(String),
    OperationCancelled,
    PromptTaskTitle,
    PromptTaskDescription,
    PromptDueDate,
    PromptRecurring,
    PromptPeriod,
    PromptRecurrenceType,
    PromptFlexibleMode,
    InvalidPeriod,
    RecurrenceNeedsDueDate,

    // === REORDER MESSAGES ===
    TaskReordered(String, usize), // title, index
    TaskAlreadyThere(String, usize),
    ReorderRolledBack(String),
    TaskMovedTo(String, String), // title, section
    TaskAlreadyInSection(String, String),

    // === CALENDAR MESSAGES ===
    NothingDue,

    // === ATTACHMENT MESSAGES ===
    AttachmentAdded(String, String), // file, task
    AttachmentRemoved(String),
    AttachmentSaved(String), // path
    AttachmentNotFound(String, String), // needle, task
}
