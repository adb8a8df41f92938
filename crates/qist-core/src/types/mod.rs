mod id;
mod timestamp;

pub use id::{EntityId, EntityIdError};
pub use timestamp::{Rfc3339, Timestamp, TimestampError};
