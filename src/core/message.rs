use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::core::TaskId;

// -----------------------------------------------------------------------------
// Message
// -----------------------------------------------------------------------------

/// A single undelivered message: an immutable byte payload tagged with the
/// identity of the task that sent it.
///
/// The payload is copied in when the message is enqueued, and moved out -
/// destroying the message - when it is delivered.
#[derive(Clone)]
pub struct Message {
  sender: TaskId,
  payload: Vec<u8>,
}

impl Message {
  /// Creates a `Message` by copying `payload`.
  #[inline]
  pub(crate) fn copied(sender: TaskId, payload: &[u8]) -> Self {
    Self {
      sender,
      payload: payload.to_vec(),
    }
  }

  /// Returns the id of the task that sent this message.
  #[inline]
  pub const fn sender(&self) -> TaskId {
    self.sender
  }

  /// Returns the message payload.
  #[inline]
  pub fn payload(&self) -> &[u8] {
    self.payload.as_slice()
  }

  /// Returns the payload length in bytes.
  #[inline]
  pub fn size(&self) -> usize {
    self.payload.len()
  }

  /// Consumes the message, transferring payload ownership to the caller.
  #[inline]
  pub(crate) fn into_payload(self) -> Vec<u8> {
    self.payload
  }
}

impl Debug for Message {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("Message")
      .field("sender", &self.sender)
      .field("size", &self.payload.len())
      .finish()
  }
}
