// -----------------------------------------------------------------------------
// System - Memory Allocation
// -----------------------------------------------------------------------------

/// Number of pre-allocated entries in the registry task map.
pub const CAP_REGISTRY_TASKS: usize = 1 << 10;

/// Number of pre-allocated slots in a task's mailbox map.
pub const CAP_TASK_MAILBOXES: usize = 8;

// Number of pre-allocated messages in a single mailbox queue.
pub const CAP_MAILBOX_MESSAGES: usize = 8;
