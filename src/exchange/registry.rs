use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use parking_lot::RwLock;
use triomphe::Arc;

use crate::core::TaskId;
use crate::exchange::TaskState;

// -----------------------------------------------------------------------------
// Registry
// -----------------------------------------------------------------------------

/// Tracks which tasks are registered and owns their mailbox state.
///
/// The map itself is read-mostly: sends, receives and polls take the read
/// lock only to resolve a handle, then operate under the per-task state
/// lock. Registration and teardown take the write lock.
#[derive(Debug)]
pub(crate) struct Registry {
  tasks: RwLock<HashMap<TaskId, Arc<TaskState>>>,
  cap_mailboxes: usize,
}

impl Registry {
  /// Creates an empty `Registry` with at least the given task capacity.
  #[inline]
  pub(crate) fn with_capacity(cap_tasks: usize, cap_mailboxes: usize) -> Self {
    Self {
      tasks: RwLock::new(HashMap::with_capacity(cap_tasks)),
      cap_mailboxes,
    }
  }

  /// Inserts a fresh state for `id`, or keeps the existing one.
  ///
  /// Returns `true` if this call created the state.
  pub(crate) fn register(&self, id: TaskId) -> bool {
    match self.tasks.write().entry(id) {
      Entry::Occupied(_) => false,
      Entry::Vacant(entry) => {
        entry.insert(Arc::new(TaskState::new(id, self.cap_mailboxes)));
        true
      }
    }
  }

  /// Returns a handle to the state of `id`, or `None` if not registered.
  #[inline]
  pub(crate) fn lookup(&self, id: TaskId) -> Option<Arc<TaskState>> {
    self.tasks.read().get(&id).map(Arc::clone)
  }

  /// Returns `true` if `id` is registered.
  #[inline]
  pub(crate) fn contains(&self, id: TaskId) -> bool {
    self.tasks.read().contains_key(&id)
  }

  /// Removes and returns the state of `id`.
  #[inline]
  pub(crate) fn remove(&self, id: TaskId) -> Option<Arc<TaskState>> {
    self.tasks.write().remove(&id)
  }

  /// Returns a handle to every registered state.
  pub(crate) fn snapshot(&self) -> Vec<Arc<TaskState>> {
    self.tasks.read().values().map(Arc::clone).collect()
  }

  /// Returns the number of registered tasks.
  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.tasks.read().len()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
