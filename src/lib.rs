//! Courier - An in-process inter-task message exchange.
//!
//! Courier provides mailbox-style message passing between concurrently
//! executing tasks: strict per-sender FIFO delivery, non-blocking receives,
//! and a blocking poll that parks the caller until one of a watched set of
//! senders delivers or a deadline passes.
//!
//! # Quick Start
//!
//! ```
//! use courier::core::TaskId;
//! use courier::exchange::Exchange;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let exchange: Exchange = Exchange::new();
//! let sender: TaskId = TaskId::from_bits(1);
//! let target: TaskId = TaskId::from_bits(2);
//!
//! exchange.register(sender);
//! exchange.register(target);
//!
//! exchange.send(sender, target, b"ping").unwrap();
//!
//! let bytes: Vec<u8> = exchange.receive(target, sender, 16).unwrap();
//! assert_eq!(bytes, b"ping");
//! # }
//! ```
//!
//! # Core Modules
//!
//! - [`exchange`]: Operation surface, registry, and wait coordination
//! - [`core`]: Core types (task ids, messages, mailboxes)
//! - [`error`]: Fault taxonomy
//! - [`consts`]: Capacity configuration constants

pub mod consts;
pub mod core;
pub mod error;
pub mod exchange;
