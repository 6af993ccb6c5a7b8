//! # Kagami
//!
//! Parses scene release names into shows, episodes and qualities, and tells
//! shows apart by their canonical roots.
//!
//! This crate re-exports [`kagami_core`]; see its documentation for details.
//!
//! ```rust
//! let release = kagami::parse_file("House.S07E13.720p.HDTV.X264-DIMENSION").unwrap();
//! assert_eq!(release.episode_code().as_deref(), Some("S07E13"));
//! assert_eq!(release.quality, kagami::Quality::Hdtv720p);
//! ```
pub use kagami_core::*;
