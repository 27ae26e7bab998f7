pub mod page;
pub mod session;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod fake;

pub use page::{CdpPage, PageDriver};
pub use session::BrowserSession;
pub use snapshot::SnapshotStore;
