pub mod convention;
pub mod quality;
pub mod release;
pub mod root;

pub use convention::{ConventionKind, NamingConvention};
pub use quality::{QUALITY_TABLE, Quality, QualityEntry, QualityTier};
pub use release::ParsedRelease;
pub use root::ShowRoot;
