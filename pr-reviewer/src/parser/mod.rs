//! Unified-diff parser for per-file patches as delivered by the platform.
//!
//! Features:
//! - Works on hunks-only input (no `---`/`+++` file headers required).
//! - Dual old/new numbering for every body line.
//! - Raw patch positions kept per line for the legacy anchoring scheme.
//!
//! Coordinate projections over the parsed hunks live in `crate::map`.

pub mod hunk_header;
pub mod patch;
pub mod types;

pub use hunk_header::parse_hunk_header;
pub use patch::parse_patch;
pub use types::{DiffLine, Hunk, HunkHeader, LineRange, LineTag, PositionRecord};
