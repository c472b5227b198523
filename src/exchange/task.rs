use bitflags::bitflags;
use hashbrown::HashMap;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::core::Mailbox;
use crate::core::TaskId;
use crate::exchange::WaitState;
use crate::exchange::Wake;

// -----------------------------------------------------------------------------
// Task Flags
// -----------------------------------------------------------------------------

bitflags! {
  /// Lifecycle flags of a task state.
  #[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
  pub(crate) struct TaskFlags: u32 {
    /// The task is a valid send target and receive caller.
    ///
    /// Cleared by teardown; handles obtained before removal refuse service.
    const REGISTERED = 1 << 0;
  }
}

// -----------------------------------------------------------------------------
// Task State
// -----------------------------------------------------------------------------

/// Per-task exchange state, owned by the registry.
///
/// Split in two sections: read-only data shared without coordination, and
/// the mutable mailbox/wait state behind one mutex. The wake primitive lives
/// in the read-only section so senders can issue permits after releasing the
/// state lock.
#[derive(Debug)]
#[repr(C)]
pub(crate) struct TaskState {
  pub(crate) readonly: TaskReadOnly,
  pub(crate) internal: Mutex<TaskInternal>,
}

impl TaskState {
  /// Creates the state of a freshly registered task.
  pub(crate) fn new(id: TaskId, cap_mailboxes: usize) -> Self {
    Self {
      readonly: TaskReadOnly {
        id,
        notify: Notify::new(),
      },
      internal: Mutex::new(TaskInternal {
        flags: TaskFlags::REGISTERED,
        mailboxes: HashMap::with_capacity(cap_mailboxes),
        wait: None,
      }),
    }
  }
}

// -----------------------------------------------------------------------------
// Task Read-only
// -----------------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct TaskReadOnly {
  /// Id of the task.
  pub(crate) id: TaskId,
  /// Wake primitive for a parked poll.
  pub(crate) notify: Notify,
}

// -----------------------------------------------------------------------------
// Task Internal
// -----------------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct TaskInternal {
  /// Lifecycle flags.
  pub(crate) flags: TaskFlags,
  /// Undelivered messages, keyed by sender.
  pub(crate) mailboxes: HashMap<TaskId, Mailbox>,
  /// Wait state of an in-flight poll.
  pub(crate) wait: Option<WaitState>,
}

impl TaskInternal {
  /// Arms the wake trigger if an active wait is watching `sender`.
  ///
  /// Returns `true` if this call armed the trigger; the caller issues the
  /// wake permit after releasing the state lock.
  pub(crate) fn arm_wake(&mut self, sender: TaskId) -> bool {
    match self.wait.as_mut() {
      Some(wait) => wait.arm(Wake::Sender(sender)),
      None => false,
    }
  }

  /// Arms the defunct-sender trigger if an active wait is watching `sender`.
  pub(crate) fn arm_defunct(&mut self, sender: TaskId) -> bool {
    match self.wait.as_mut() {
      Some(wait) => wait.arm(Wake::Defunct(sender)),
      None => false,
    }
  }

  /// Arms the retirement trigger if a wait is active.
  pub(crate) fn arm_retired(&mut self) -> bool {
    match self.wait.as_mut() {
      Some(wait) => wait.arm(Wake::Retired),
      None => false,
    }
  }

  /// Takes a pending wake trigger, leaving the wait installed.
  pub(crate) fn take_wake(&mut self) -> Option<Wake> {
    self.wait.as_mut().and_then(WaitState::take_wake)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use tokio::time::Instant;

  use super::*;

  #[test]
  fn test_arm_without_wait() {
    let state: TaskState = TaskState::new(TaskId::from_bits(1), 4);
    let mut guard = state.internal.lock();

    assert!(!guard.arm_wake(TaskId::from_bits(2)));
    assert!(!guard.arm_defunct(TaskId::from_bits(2)));
    assert!(!guard.arm_retired());
    assert!(guard.take_wake().is_none());
  }

  #[test]
  fn test_arm_with_wait() {
    let state: TaskState = TaskState::new(TaskId::from_bits(1), 4);
    let mut guard = state.internal.lock();

    let watch: [TaskId; 1] = [TaskId::from_bits(2)];

    guard.wait = Some(WaitState::new(&watch, Instant::now()));

    assert!(guard.arm_wake(TaskId::from_bits(2)));
    assert_eq!(guard.take_wake(), Some(Wake::Sender(TaskId::from_bits(2))));

    // The trigger was taken but the wait is still installed.
    assert!(guard.wait.is_some());
    assert!(guard.arm_retired());
  }
}
