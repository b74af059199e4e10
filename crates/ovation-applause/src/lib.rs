pub mod aggregator;
pub mod applause;
pub mod backend;
pub mod error;
pub mod memory_backend;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod presence_client;
pub mod sweeper;

pub use aggregator::Aggregator;
pub use applause::Applause;
pub use backend::CountingBackend;
pub use error::{ApplauseError, BackendError, PresenceError, Result};
pub use memory_backend::MemoryBackend;
pub use message::{LevelDiff, LevelUpdate, pick_latest_for_meeting};
pub use metrics::Metrics;
pub use presence::{FixedPresence, PresenceDirectory};
pub use presence_client::HttpPresenceDirectory;
pub use sweeper::Sweeper;

/// Meeting identifier as used on the wire and by the directory.
pub type MeetingId = i64;

/// User identifier as established by the authenticator.
pub type UserId = i64;

#[cfg(test)]
mod tests;
