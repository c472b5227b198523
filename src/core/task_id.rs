use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

// -----------------------------------------------------------------------------
// Task Id
// -----------------------------------------------------------------------------

/// An opaque identifier for a participant in the message exchange.
///
/// Identifiers are supplied by the hosting environment, which guarantees
/// uniqueness among live tasks. The exchange never mints ids of its own and
/// attaches no meaning to the raw bits.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TaskId {
  bits: u64,
}

impl TaskId {
  /// Creates a `TaskId` from raw bits.
  #[inline]
  pub const fn from_bits(bits: u64) -> Self {
    Self { bits }
  }

  /// Returns the raw bits of the id.
  #[inline]
  pub const fn into_bits(self) -> u64 {
    self.bits
  }
}

impl Debug for TaskId {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for TaskId {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "#Task<{}>", self.bits)
  }
}

impl From<u64> for TaskId {
  #[inline]
  fn from(other: u64) -> Self {
    Self::from_bits(other)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_bits_round_trip() {
    let task: TaskId = TaskId::from_bits(42);

    assert_eq!(task.into_bits(), 42);
    assert_eq!(task, TaskId::from(42_u64));
  }

  #[test]
  fn test_display() {
    let task: TaskId = TaskId::from_bits(7);

    assert_eq!(format!("{}", task), "#Task<7>");
    assert_eq!(format!("{:?}", task), "#Task<7>");
  }
}
