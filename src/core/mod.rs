mod mailbox;
mod message;
mod task_id;

pub use self::mailbox::Mailbox;
pub use self::message::Message;
pub use self::task_id::TaskId;
