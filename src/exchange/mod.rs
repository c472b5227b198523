mod config;
mod poll;
mod registry;
mod task;
mod wait;

pub use self::config::ExchangeConfig;
pub use self::poll::PollEntry;

pub(crate) use self::registry::Registry;
pub(crate) use self::task::TaskFlags;
pub(crate) use self::task::TaskState;
pub(crate) use self::wait::WaitState;
pub(crate) use self::wait::Wake;

use std::time::Duration;
use tokio::time::Instant;
use tokio::time::timeout_at;

use crate::core::Mailbox;
use crate::core::Message;
use crate::core::TaskId;
use crate::error::Fault;

// -----------------------------------------------------------------------------
// Exchange
// -----------------------------------------------------------------------------

/// The in-process message exchange.
///
/// One `Exchange` owns the registry of participating tasks and dispatches
/// every operation: registration, sends, receives, watched-sender polls and
/// teardown. All operations may be called from any number of tasks
/// concurrently; only [`poll`][Self::poll] ever suspends the caller.
#[derive(Debug)]
pub struct Exchange {
  registry: Registry,
}

impl Exchange {
  /// Creates an `Exchange` with the default configuration.
  #[inline]
  pub fn new() -> Self {
    Self::with_config(ExchangeConfig::new())
  }

  /// Creates an `Exchange` with the given configuration.
  #[inline]
  pub fn with_config(config: ExchangeConfig) -> Self {
    Self {
      registry: Registry::with_capacity(config.cap_registry_tasks, config.cap_task_mailboxes),
    }
  }

  // ---------------------------------------------------------------------------
  // Registration
  // ---------------------------------------------------------------------------

  /// Registers `task` as an exchange participant.
  ///
  /// Registration is idempotent: registering an already-registered task is a
  /// no-op success. A registered task is a valid send target and receive
  /// caller.
  pub fn register(&self, task: TaskId) {
    if self.registry.register(task) {
      tracing::debug!(%task, tasks = self.registry.len(), "task registered");
    } else {
      tracing::trace!(%task, "task already registered");
    }
  }

  /// Returns `true` if `task` is currently registered.
  #[inline]
  pub fn registered(&self, task: TaskId) -> bool {
    self.registry.contains(task)
  }

  /// Returns the number of undelivered messages from `sender` to `caller`.
  ///
  /// A probe for diagnostics and tests; absent mailboxes report zero.
  pub fn pending(&self, caller: TaskId, sender: TaskId) -> usize {
    match self.registry.lookup(caller) {
      Some(state) => state.internal.lock().mailboxes.get(&sender).map_or(0, Mailbox::len),
      None => 0,
    }
  }

  // ---------------------------------------------------------------------------
  // Send
  // ---------------------------------------------------------------------------

  /// Sends `payload` from `sender` to `target`.
  ///
  /// The payload is copied into the target's mailbox for `sender`, creating
  /// the mailbox on the first undelivered message. If the target is parked
  /// in [`poll`][Self::poll] watching `sender`, exactly one wake is issued.
  ///
  /// # Errors
  ///
  /// - [`Fault::InvalidArgument`] if `payload` is empty.
  /// - [`Fault::NoSuchTask`] if `target` is not registered.
  /// - [`Fault::PermissionDenied`] if `sender` is not registered.
  pub fn send(&self, sender: TaskId, target: TaskId, payload: &[u8]) -> Result<(), Fault> {
    if payload.is_empty() {
      return Err(refused("send", Fault::InvalidArgument));
    }

    let Some(state) = self.registry.lookup(target) else {
      return Err(refused("send", Fault::NoSuchTask));
    };

    // Both endpoints must be registered.
    if !self.registry.contains(sender) {
      return Err(refused("send", Fault::PermissionDenied));
    }

    let woken: bool = {
      let mut guard = state.internal.lock();

      // A handle resolved before a concurrent teardown refuses service.
      if !guard.flags.contains(TaskFlags::REGISTERED) {
        return Err(refused("send", Fault::NoSuchTask));
      }

      guard
        .mailboxes
        .entry(sender)
        .or_insert_with(|| Mailbox::new(sender))
        .push(Message::copied(sender, payload));

      guard.arm_wake(sender)
    };

    // The permit is issued outside the state lock; a waiter that has not
    // parked yet still observes it.
    if woken {
      state.readonly.notify.notify_one();
      tracing::trace!(from = %sender, to = %target, "waiter woken");
    }

    tracing::trace!(from = %sender, to = %target, size = payload.len(), "message enqueued");

    Ok(())
  }

  // ---------------------------------------------------------------------------
  // Receive
  // ---------------------------------------------------------------------------

  /// Receives the oldest undelivered message sent by `sender` to `caller`.
  ///
  /// At most `capacity` bytes of the payload are returned; a longer payload
  /// is truncated silently and the surplus discarded with the message. This
  /// operation never suspends - callers wanting to wait use
  /// [`poll`][Self::poll] first.
  ///
  /// # Errors
  ///
  /// - [`Fault::InvalidArgument`] if `capacity` is zero.
  /// - [`Fault::PermissionDenied`] if `caller` is not registered.
  /// - [`Fault::WouldBlock`] if no message from `sender` is pending.
  pub fn receive(&self, caller: TaskId, sender: TaskId, capacity: usize) -> Result<Vec<u8>, Fault> {
    if capacity < 1 {
      return Err(refused("receive", Fault::InvalidArgument));
    }

    let Some(state) = self.registry.lookup(caller) else {
      return Err(refused("receive", Fault::PermissionDenied));
    };

    let message: Message = {
      let mut guard = state.internal.lock();

      let Some(message) = guard.mailboxes.get_mut(&sender).and_then(Mailbox::pop) else {
        return Err(refused("receive", Fault::WouldBlock));
      };

      // Drained mailboxes are removed eagerly.
      if guard.mailboxes.get(&sender).is_some_and(Mailbox::is_empty) {
        guard.mailboxes.remove(&sender);
      }

      message
    };

    tracing::trace!(from = %sender, to = %caller, size = message.size(), "message delivered");

    let mut payload: Vec<u8> = message.into_payload();

    payload.truncate(capacity);

    Ok(payload)
  }

  // ---------------------------------------------------------------------------
  // Poll
  // ---------------------------------------------------------------------------

  /// Waits for a message from any task in `watch`, up to `timeout`.
  ///
  /// The caller's mailboxes are first scanned against `watch` in order; if
  /// any watched sender already has a pending message the call returns
  /// immediately with every such sender marked. Otherwise the caller parks
  /// until a matching send arrives or the deadline passes. A zero timeout
  /// with no pending match fails without suspending.
  ///
  /// A wake reports only the sender that triggered it, even if others have
  /// delivered in the meantime; the immediate path reports all matches.
  /// Callers needing the full picture after a wake poll again.
  ///
  /// # Errors
  ///
  /// - [`Fault::InvalidArgument`] if `watch` is empty.
  /// - [`Fault::PermissionDenied`] if `caller` is not registered, or is torn
  ///   down while parked.
  /// - [`Fault::NoSuchTask`] if a watched sender is torn down while parked.
  /// - [`Fault::TimedOut`] if `timeout` elapses with no matching send.
  pub async fn poll(
    &self,
    caller: TaskId,
    watch: &[TaskId],
    timeout: Duration,
  ) -> Result<Vec<PollEntry>, Fault> {
    if watch.is_empty() {
      return Err(refused("poll", Fault::InvalidArgument));
    }

    let Some(state) = self.registry.lookup(caller) else {
      return Err(refused("poll", Fault::PermissionDenied));
    };

    let deadline: Instant = match Instant::now().checked_add(timeout) {
      Some(deadline) => deadline,
      None => Instant::now() + Duration::from_secs(86400 * 365 * 30),
    };

    // Scan and interest registration are one critical section: a send that
    // misses the scan necessarily observes the wait state.
    {
      let mut guard = state.internal.lock();

      let entries: Vec<PollEntry> = poll::scan(watch, &guard.mailboxes);

      if entries.iter().any(PollEntry::pending) {
        tracing::trace!(%caller, watched = watch.len(), "poll resolved on scan");
        return Ok(entries);
      }

      debug_assert!(guard.wait.is_none(), "overlapping poll calls");

      guard.wait = Some(WaitState::new(watch, deadline));
    }

    tracing::trace!(%caller, watched = watch.len(), ?timeout, "poll parked");

    'park: loop {
      // The permit semantics of `Notify` cover the gap between releasing
      // the state lock and parking here.
      match timeout_at(deadline, state.readonly.notify.notified()).await {
        Ok(()) => {
          let mut guard = state.internal.lock();

          let Some(wake) = guard.take_wake() else {
            // A stale permit from an earlier poll; park again.
            continue 'park;
          };

          guard.wait = None;
          drop(guard);

          match wake {
            Wake::Sender(task) => {
              tracing::trace!(%caller, from = %task, "poll woken");
              return Ok(poll::woken(watch, task));
            }
            Wake::Defunct(task) => {
              tracing::trace!(%caller, from = %task, "watched sender torn down");
              return Err(refused("poll", Fault::NoSuchTask));
            }
            Wake::Retired => {
              return Err(refused("poll", Fault::PermissionDenied));
            }
          }
        }
        Err(_elapsed) => {
          let wait: Option<WaitState> = state.internal.lock().wait.take();

          let Some(wait) = wait else {
            debug_assert!(false, "poll deadline without wait state");
            return Err(Fault::TimedOut);
          };

          debug_assert!(Instant::now() >= wait.deadline());

          // The deadline and a late wake can race; the armed trigger wins.
          return match wait.into_wake() {
            Some(Wake::Sender(task)) => Ok(poll::woken(watch, task)),
            Some(Wake::Defunct(_task)) => Err(refused("poll", Fault::NoSuchTask)),
            Some(Wake::Retired) => Err(refused("poll", Fault::PermissionDenied)),
            None => Err(refused("poll", Fault::TimedOut)),
          };
        }
      }
    }
  }

  // ---------------------------------------------------------------------------
  // Teardown
  // ---------------------------------------------------------------------------

  /// Removes `task` from the exchange when the hosting environment reports
  /// its termination.
  ///
  /// Every mailbox addressed to or from `task` is released: the departing
  /// state is dropped wholesale, and each surviving task loses its mailbox
  /// from `task`. A survivor parked watching `task` is woken and its poll
  /// fails with [`Fault::NoSuchTask`]; a poll in flight on `task` itself
  /// fails with [`Fault::PermissionDenied`]. Unknown ids are ignored.
  pub fn teardown(&self, task: TaskId) {
    let Some(state) = self.registry.remove(task) else {
      tracing::trace!(%task, "teardown of unknown task");
      return;
    };

    let retired: bool = {
      let mut guard = state.internal.lock();

      guard.flags.remove(TaskFlags::REGISTERED);
      guard.mailboxes.clear();
      guard.arm_retired()
    };

    if retired {
      state.readonly.notify.notify_one();
    }

    // Orphaned mailboxes and watchers of the departed sender.
    for survivor in self.registry.snapshot() {
      let defunct: bool = {
        let mut guard = survivor.internal.lock();

        guard.mailboxes.remove(&task);
        guard.arm_defunct(task)
      };

      if defunct {
        survivor.readonly.notify.notify_one();
        tracing::trace!(%task, watcher = %survivor.readonly.id, "defunct sender wake");
      }
    }

    tracing::debug!(%task, tasks = self.registry.len(), "task torn down");
  }
}

impl Default for Exchange {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Misc. Utilities
// -----------------------------------------------------------------------------

#[cold]
fn refused(op: &'static str, fault: Fault) -> Fault {
  tracing::trace!(op, fault = fault.label(), "request refused");
  fault
}
