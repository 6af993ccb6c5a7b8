//! # Kagami Core
//!
//! Scene release-name parsing and show-identity matching. Turns names such
//! as `House.S07E13.720p.HDTV.X264-DIMENSION` into structured episode
//! descriptors and decides whether two show titles name the same show.
//!
//! ## Quick Start
//!
//! ```rust
//! use kagami_core::parser::ReleaseParser;
//! use kagami_core::matching::{get_root, is_match};
//!
//! let parser = ReleaseParser::new().unwrap();
//! let release = parser.parse_file("top_gear.16x01.real.720p_hdtv_x264-fov.mkv");
//!
//! assert!(release.success);
//! assert_eq!((release.season, release.episode), (16, 1));
//! assert_eq!(release.quality.to_string(), "720p HDTV");
//! assert!(is_match(release.show.as_str(), &get_root("Top Gear")));
//! ```
pub mod error;
pub mod matching;
pub mod parser;
pub mod types;

// Re-export primary API
pub use error::{KagamiError, Result};
pub use matching::{ToShowRoot, appears_in, dedup_shows, filter_known, get_root, is_match};
pub use parser::{
    ConventionMatcher, Normalizer, ParseContext, ParserConfig, ParserHandle, Recognizer,
    ReleaseParser, TitleExtractor, classify_quality, describe_quality, normalize, parse_file,
};
pub use types::{
    ConventionKind, NamingConvention, ParsedRelease, QUALITY_TABLE, Quality, QualityEntry,
    QualityTier, ShowRoot,
};
