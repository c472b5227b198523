use hashbrown::HashMap;

use crate::core::Mailbox;
use crate::core::TaskId;

// -----------------------------------------------------------------------------
// Poll Entry
// -----------------------------------------------------------------------------

/// Per-watched-sender entry of a poll result.
///
/// A poll returns one entry per watch-list position, in watch-list order;
/// duplicate watch entries are reported individually.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct PollEntry {
  task: TaskId,
  pending: bool,
}

impl PollEntry {
  #[inline]
  pub(crate) const fn new(task: TaskId, pending: bool) -> Self {
    Self { task, pending }
  }

  /// Returns the watched sender this entry reports on.
  #[inline]
  pub const fn task(&self) -> TaskId {
    self.task
  }

  /// Returns `true` if the sender had a pending message at resolution time.
  #[inline]
  pub const fn pending(&self) -> bool {
    self.pending
  }
}

// -----------------------------------------------------------------------------
// Result Assembly
// -----------------------------------------------------------------------------

/// Marks every watch entry whose mailbox currently holds a message.
///
/// A present mailbox is never empty, so presence alone is the match.
pub(crate) fn scan(watch: &[TaskId], mailboxes: &HashMap<TaskId, Mailbox>) -> Vec<PollEntry> {
  watch
    .iter()
    .map(|task| PollEntry::new(*task, mailboxes.contains_key(task)))
    .collect()
}

/// Marks only the sender that triggered a wake.
pub(crate) fn woken(watch: &[TaskId], sender: TaskId) -> Vec<PollEntry> {
  watch
    .iter()
    .map(|task| PollEntry::new(*task, *task == sender))
    .collect()
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::core::Message;

  use super::*;

  fn mailboxes(senders: &[u64]) -> HashMap<TaskId, Mailbox> {
    let mut map: HashMap<TaskId, Mailbox> = HashMap::new();

    for bits in senders {
      let sender: TaskId = TaskId::from_bits(*bits);
      let mut mailbox: Mailbox = Mailbox::new(sender);

      mailbox.push(Message::copied(sender, b"x"));
      map.insert(sender, mailbox);
    }

    map
  }

  fn watch(bits: &[u64]) -> Vec<TaskId> {
    bits.iter().copied().map(TaskId::from_bits).collect()
  }

  #[test]
  fn test_scan_marks_all_matches() {
    let watch: Vec<TaskId> = watch(&[1, 2, 3]);
    let entries: Vec<PollEntry> = scan(&watch, &mailboxes(&[1, 3]));

    assert_eq!(entries.len(), 3);
    assert!(entries[0].pending());
    assert!(!entries[1].pending());
    assert!(entries[2].pending());
  }

  #[test]
  fn test_scan_preserves_duplicates() {
    let watch: Vec<TaskId> = watch(&[1, 1]);
    let entries: Vec<PollEntry> = scan(&watch, &mailboxes(&[1]));

    assert_eq!(entries.len(), 2);
    assert!(entries[0].pending());
    assert!(entries[1].pending());
  }

  #[test]
  fn test_woken_marks_single_sender() {
    let watch: Vec<TaskId> = watch(&[1, 2, 3]);
    let entries: Vec<PollEntry> = woken(&watch, TaskId::from_bits(2));

    assert!(!entries[0].pending());
    assert!(entries[1].pending());
    assert!(!entries[2].pending());
  }
}
