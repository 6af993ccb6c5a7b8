//! # Token Normalizer
//!
//! Splits release names into tokens, lower-cases them and drops noise
//! (checksums, site tags, release groups at either end). Every token keeps
//! its byte range in the original string so later stages can cut the
//! original text at token boundaries.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

/// Release-group tags removed when they open or close a name.
pub(crate) const RELEASE_GROUPS: &[&str] = &[
    "2hd", "aaf", "asap", "bajskorv", "ctu", "dimension", "fov", "fqm", "immerse", "lol", "notv",
    "ntb", "orenji", "sys", "tla", "xor",
];

/// Distribution-site tags removed wherever they appear.
pub(crate) const SITE_TAGS: &[&str] = &[
    "eztv", "ettv", "publichd", "rarbg", "rartv", "scenetime", "torrentday", "tvteam", "vtv", "www",
];

/// Top-level domains that close a `www.<site>.<tld>` run.
const DOMAIN_SUFFIXES: &[&str] = &["cc", "com", "info", "me", "net", "org", "se", "to", "tv"];

/// Media and sidecar extensions recognized at the end of a file name.
pub(crate) const CONTAINERS: &[&str] = &[
    "avi", "divx", "m2ts", "m4v", "mkv", "mov", "mp4", "mpg", "mpeg", "nfo", "ogm", "rmvb", "sfv",
    "srt", "ass", "ssa", "sub", "idx", "ts", "wmv",
];

/// Audio, encoding and distribution tokens that never belong to a title.
pub(crate) const FORMAT_TOKENS: &[&str] = &[
    "10bit", "8bit", "aac", "aac2", "ac3", "amzn", "atmos", "dd2", "dd5", "ddp", "ddp2", "ddp5",
    "dts", "dsnp", "eac3", "flac", "h265", "hdr", "hevc", "hmax", "mp3", "nf", "truehd", "ws",
    "x265",
];

/// Scene tags that only count as noise when followed by other noise or by
/// the end of the name: "real" and "internal" are ordinary words too.
pub(crate) const SCENE_TAGS: &[&str] = &[
    "dirfix", "dubbed", "internal", "limited", "nfofix", "proper", "readnfo", "real", "repack",
    "rerip", "subbed", "uncut",
];

/// Characters that separate tokens.
pub(crate) fn is_separator(c: char) -> bool {
    matches!(c, '.' | '_' | '-' | '[' | ']' | '(' | ')' | '{' | '}') || c.is_whitespace()
}

/// The separator run that precedes a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Separator {
    /// First token.
    None,
    /// Dots, underscores, whitespace, brackets.
    Space,
    /// A single hyphen, as in `x264-GROUP`.
    Hyphen,
    /// A hyphen surrounded by other separators, as in `Show - Title`.
    SpacedHyphen,
}

impl Separator {
    fn of_gap(gap: &str) -> Self {
        match gap {
            "" => Self::None,
            "-" => Self::Hyphen,
            g if g.contains('-') => Self::SpacedHyphen,
            _ => Self::Space,
        }
    }

    /// Character written between tokens in the normalized form.
    fn normalized(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Space => " ",
            Self::Hyphen | Self::SpacedHyphen => "-",
        }
    }

    /// Text written between tokens when rendering original text for display.
    pub(crate) fn display(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Space => " ",
            Self::Hyphen => "-",
            Self::SpacedHyphen => " - ",
        }
    }
}

/// A token of a normalized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lower-cased token text.
    pub text: String,
    /// Byte range in the original string.
    pub raw: Range<usize>,
    /// Byte range in the normalized string.
    pub norm: Range<usize>,
    /// Separator before this token.
    pub sep: Separator,
}

/// A normalized name together with its surviving tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Normalized {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Maps a byte range of the normalized text to the range of token
    /// indices it covers.
    #[must_use]
    pub fn token_span(&self, span: &Range<usize>) -> Option<Range<usize>> {
        let start = self
            .tokens
            .iter()
            .position(|token| token.norm.end > span.start)?;
        let end = self
            .tokens
            .iter()
            .rposition(|token| token.norm.start < span.end)?;
        (start <= end).then_some(start..end + 1)
    }
}

/// Release-name normalizer.
///
/// The default instance uses the built-in noise tables; a parser built from a
/// `ParserConfig` extends them with configured tokens.
#[derive(Debug, Clone)]
pub struct Normalizer {
    release_groups: HashSet<String>,
    site_tags: HashSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            release_groups: RELEASE_GROUPS.iter().map(|g| g.to_string()).collect(),
            site_tags: SITE_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

static DEFAULT_NORMALIZER: LazyLock<Normalizer> = LazyLock::new(Normalizer::default);

/// Normalizes a release name with the built-in noise tables.
///
/// # Examples
/// ```
/// use kagami_core::parser::normalize;
///
/// assert_eq!(normalize("[eztv] Top_Gear.16x01..720p [A1B2C3D4]"), "top gear 16x01 720p");
/// assert_eq!(normalize("House.S07E13.720p.HDTV.X264-DIMENSION"), "house s07e13 720p hdtv x264");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}

impl Normalizer {
    /// Create a normalizer with the built-in noise tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with extra release groups and site tags on top of
    /// the built-in tables. Tokens are compared lower-case.
    pub fn with_extra<G, S>(release_groups: G, site_tags: S) -> Self
    where
        G: IntoIterator,
        G::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let mut normalizer = Self::default();
        normalizer
            .release_groups
            .extend(release_groups.into_iter().map(|g| g.as_ref().to_lowercase()));
        normalizer
            .site_tags
            .extend(site_tags.into_iter().map(|s| s.as_ref().to_lowercase()));
        normalizer
    }

    /// Returns `true` if `token` is a known release group (case-insensitive).
    #[must_use]
    pub fn is_release_group(&self, token: &str) -> bool {
        self.release_groups.contains(&token.to_lowercase())
    }

    /// Returns `true` if `token` is a known site tag (case-insensitive).
    #[must_use]
    pub fn is_site_tag(&self, token: &str) -> bool {
        self.site_tags.contains(&token.to_lowercase())
    }

    /// Normalizes `raw` and returns only the text.
    ///
    /// Idempotent: `normalize(normalize(x)) == normalize(x)`.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        self.analyze(raw).text
    }

    /// Normalizes `raw`, keeping the surviving tokens and their positions.
    #[must_use]
    pub fn analyze(&self, raw: &str) -> Normalized {
        let tokens = split_tokens(raw);
        let mut keep = vec![true; tokens.len()];

        for (i, (text, _, _)) in tokens.iter().enumerate() {
            if is_checksum(text) || self.site_tags.contains(text) {
                keep[i] = false;
            }
            if text == "www"
                && tokens
                    .get(i + 2)
                    .is_some_and(|(tld, _, _)| DOMAIN_SUFFIXES.contains(&tld.as_str()))
            {
                keep[i + 1] = false;
                keep[i + 2] = false;
            }
        }

        // Peel release groups off both ends until neither end is one.
        loop {
            let first = keep.iter().position(|&k| k);
            let last = keep.iter().rposition(|&k| k);
            let (Some(first), Some(last)) = (first, last) else {
                break;
            };
            if self.release_groups.contains(&tokens[first].0) {
                keep[first] = false;
            } else if self.release_groups.contains(&tokens[last].0) {
                keep[last] = false;
            } else {
                break;
            }
        }

        let mut normalized = Normalized::default();
        let mut pending = Separator::None;
        for ((text, raw, sep), kept) in tokens.into_iter().zip(keep) {
            pending = pending.max(sep);
            if !kept {
                continue;
            }
            let sep = if normalized.tokens.is_empty() {
                Separator::None
            } else {
                pending
            };
            normalized.text.push_str(sep.normalized());
            let start = normalized.text.len();
            normalized.text.push_str(&text);
            normalized.tokens.push(Token {
                text,
                raw,
                norm: start..normalized.text.len(),
                sep,
            });
            pending = Separator::None;
        }
        normalized
    }
}

/// Splits on separator runs, lower-casing each token.
fn split_tokens(raw: &str) -> Vec<(String, Range<usize>, Separator)> {
    let mut tokens = Vec::new();
    let mut gap_start = 0;
    let mut token_start = None;

    for (idx, c) in raw.char_indices() {
        match (is_separator(c), token_start) {
            (true, Some(start)) => {
                let sep = Separator::of_gap(&raw[gap_start..start]);
                tokens.push((raw[start..idx].to_lowercase(), start..idx, sep));
                token_start = None;
                gap_start = idx;
            }
            (false, None) => token_start = Some(idx),
            _ => {}
        }
    }
    if let Some(start) = token_start {
        let sep = Separator::of_gap(&raw[gap_start..start]);
        tokens.push((raw[start..].to_lowercase(), start..raw.len(), sep));
    }

    // The gap before the first token is leading noise, not a separator.
    if let Some(first) = tokens.first_mut() {
        first.2 = Separator::None;
    }
    tokens
}

/// Eight hex digits that are not all decimal, e.g. `a1b2c3d4`.
fn is_checksum(token: &str) -> bool {
    token.len() == 8
        && token.bytes().all(|b| b.is_ascii_hexdigit())
        && !token.bytes().all(|b| b.is_ascii_digit())
}
