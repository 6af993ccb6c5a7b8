//! # Show-Identity Matcher
//!
//! Reduces show titles to [`ShowRoot`](crate::types::ShowRoot)s and decides
//! whether two titles name the same show.

mod identity;
mod root;

pub use identity::{ToShowRoot, appears_in, dedup_shows, filter_known, is_match};
pub use root::get_root;
