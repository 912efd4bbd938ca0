//! Command implementations.

mod preview_diff;
mod release_notes;

pub use preview_diff::preview_diff;
pub use release_notes::release_notes;
