//! Writing services built on top of the completion port.

pub mod drafting;
pub mod sessions;

pub use drafting::{DEFAULT_DRAFT_EXTENSION, DraftService};
pub use sessions::SessionManager;
