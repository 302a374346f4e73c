//! Entry records and the entry store.

mod record;
mod store;

pub use record::{Entry, QueueStatus};
pub use store::EntryStore;
