mod handles;
mod session;

pub use handles::{HandleId, HandleTable};
pub use session::{EditError, EditOptions, EditSession, InsertionCandidate};
