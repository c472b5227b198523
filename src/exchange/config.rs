use crate::consts;

// -----------------------------------------------------------------------------
// Exchange Config
// -----------------------------------------------------------------------------

/// Capacity configuration of an [`Exchange`].
///
/// [`Exchange`]: crate::exchange::Exchange
#[derive(Clone, Copy, Debug)]
pub struct ExchangeConfig {
  /// Pre-allocated entries in the registry task map.
  pub cap_registry_tasks: usize,
  /// Pre-allocated slots in each task's mailbox map.
  pub cap_task_mailboxes: usize,
}

impl ExchangeConfig {
  #[inline]
  pub fn new() -> Self {
    Self {
      cap_registry_tasks: consts::CAP_REGISTRY_TASKS,
      cap_task_mailboxes: consts::CAP_TASK_MAILBOXES,
    }
  }
}

impl Default for ExchangeConfig {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
