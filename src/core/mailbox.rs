use std::collections::VecDeque;

use crate::consts::CAP_MAILBOX_MESSAGES;
use crate::core::Message;
use crate::core::TaskId;

// -----------------------------------------------------------------------------
// Mailbox
// -----------------------------------------------------------------------------

/// A FIFO queue of undelivered messages from one sender to one receiver.
///
/// Mailboxes are created lazily on the first send from a given sender and
/// removed eagerly once drained; between exchange operations an existing
/// mailbox is never empty. Insertion order is delivery order.
///
/// Note: Queues grow without bound if the receiver never drains them; the
///       exchange applies no backpressure.
#[derive(Debug)]
pub struct Mailbox {
  sender: TaskId,
  queue: VecDeque<Message>,
}

impl Mailbox {
  /// Creates an empty `Mailbox` for messages sent by `sender`.
  #[inline]
  pub(crate) fn new(sender: TaskId) -> Self {
    Self {
      sender,
      queue: VecDeque::with_capacity(CAP_MAILBOX_MESSAGES),
    }
  }

  /// Returns the id of the sending task.
  #[inline]
  pub const fn sender(&self) -> TaskId {
    self.sender
  }

  /// Returns the number of undelivered messages.
  #[inline]
  pub fn len(&self) -> usize {
    self.queue.len()
  }

  /// Returns `true` if the mailbox holds no messages.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.queue.is_empty()
  }

  /// Appends a message in arrival order.
  #[inline]
  pub(crate) fn push(&mut self, message: Message) {
    debug_assert_eq!(message.sender(), self.sender);

    self.queue.push_back(message);
  }

  /// Removes and returns the oldest message.
  #[inline]
  pub(crate) fn pop(&mut self) -> Option<Message> {
    self.queue.pop_front()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  fn payload(mailbox: &mut Mailbox) -> Option<Vec<u8>> {
    mailbox.pop().map(Message::into_payload)
  }

  #[test]
  fn test_fifo_order() {
    let sender: TaskId = TaskId::from_bits(7);
    let mut mailbox: Mailbox = Mailbox::new(sender);

    mailbox.push(Message::copied(sender, b"first"));
    mailbox.push(Message::copied(sender, b"second"));
    mailbox.push(Message::copied(sender, b"third"));

    assert_eq!(mailbox.len(), 3);
    assert_eq!(payload(&mut mailbox), Some(b"first".to_vec()));
    assert_eq!(payload(&mut mailbox), Some(b"second".to_vec()));
    assert_eq!(payload(&mut mailbox), Some(b"third".to_vec()));
    assert_eq!(payload(&mut mailbox), None);
    assert!(mailbox.is_empty());
  }

  #[test]
  fn test_payload_copied() {
    let sender: TaskId = TaskId::from_bits(1);
    let mut mailbox: Mailbox = Mailbox::new(sender);

    let bytes: Vec<u8> = vec![0xDE, 0xAD, 0xBE, 0xEF];

    mailbox.push(Message::copied(sender, &bytes));

    drop(bytes);

    let message: Message = mailbox.pop().expect("pushed message");

    assert_eq!(message.sender(), sender);
    assert_eq!(message.size(), 4);
    assert_eq!(message.payload(), &[0xDE, 0xAD, 0xBE, 0xEF]);
  }
}
