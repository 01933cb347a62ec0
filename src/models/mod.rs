pub mod command;
pub mod entry;

pub use command::CommandRequest;
pub use entry::{Email, MailingListEntry, Name};
