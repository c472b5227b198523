use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Failure category returned by exchange operations.
///
/// Faults provide semantic information for error handling and logging; every
/// operation returns them synchronously and leaves no partial mutation
/// behind on failure.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum Fault {
  /// Malformed caller input.
  ///
  /// Indicates the caller violated an operation precondition; retrying
  /// without correction cannot succeed.
  InvalidArgument,
  /// The addressed task is not registered.
  ///
  /// Indicates the target never registered or has been torn down.
  NoSuchTask,
  /// The calling task is not registered.
  ///
  /// Indicates the task must register before using the exchange.
  PermissionDenied,
  /// No message is available yet.
  ///
  /// Indicates the caller should retry later, or poll first.
  WouldBlock,
  /// The poll deadline passed without a matching send.
  TimedOut,
}

impl Fault {
  #[inline]
  pub(crate) const fn label(&self) -> &'static str {
    match self {
      Self::InvalidArgument => "invalid_argument",
      Self::NoSuchTask => "no_such_task",
      Self::PermissionDenied => "permission_denied",
      Self::WouldBlock => "would_block",
      Self::TimedOut => "timed_out",
    }
  }
}

impl Display for Fault {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::InvalidArgument => {
        f.write_str("(InvalidArgument) errors were found with the given argument(s)")
      }
      Self::NoSuchTask => f.write_str("(NoSuchTask) the addressed task is not registered"),
      Self::PermissionDenied => f.write_str("(PermissionDenied) the calling task is not registered"),
      Self::WouldBlock => {
        f.write_str("(WouldBlock) no message is available from the requested sender")
      }
      Self::TimedOut => f.write_str("(TimedOut) no watched sender delivered before the deadline"),
    }
  }
}

impl Error for Fault {}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::error::Fault;

  #[test]
  fn test_display() {
    let invalid: String = format!("{}", Fault::InvalidArgument);
    let nowhere: String = format!("{}", Fault::NoSuchTask);
    let refused: String = format!("{}", Fault::PermissionDenied);
    let pending: String = format!("{}", Fault::WouldBlock);
    let expired: String = format!("{}", Fault::TimedOut);

    assert!(invalid.starts_with("(InvalidArgument)"));
    assert!(nowhere.starts_with("(NoSuchTask)"));
    assert!(refused.starts_with("(PermissionDenied)"));
    assert!(pending.starts_with("(WouldBlock)"));
    assert!(expired.starts_with("(TimedOut)"));
  }

  #[test]
  fn test_label() {
    assert_eq!(Fault::InvalidArgument.label(), "invalid_argument");
    assert_eq!(Fault::NoSuchTask.label(), "no_such_task");
    assert_eq!(Fault::PermissionDenied.label(), "permission_denied");
    assert_eq!(Fault::WouldBlock.label(), "would_block");
    assert_eq!(Fault::TimedOut.label(), "timed_out");
  }
}
