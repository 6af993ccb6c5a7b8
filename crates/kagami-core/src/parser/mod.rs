pub mod classifier;
pub mod convention;
pub mod extractor;
pub mod handle;
pub mod normalizer;
pub mod release;

pub use classifier::{classify_quality, describe_quality};
pub use convention::{ConventionMatcher, Recognizer};
pub use extractor::{ExtractedTitles, TitleExtractor};
pub use handle::ParserHandle;
pub use normalizer::{Normalized, Normalizer, Separator, Token, normalize};
pub use release::{ParseContext, ParserConfig, ReleaseParser, parse_file};
