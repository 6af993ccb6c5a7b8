//! # Release Parser
//!
//! Orchestrates normalization, convention matching, title extraction and
//! quality classification over a single file name.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classifier::classify_quality;
use super::convention::ConventionMatcher;
use super::extractor::TitleExtractor;
use super::normalizer::{CONTAINERS, Normalized, Normalizer, is_separator};
use crate::error::{KagamiError, Result};
use crate::types::{ConventionKind, NamingConvention, ParsedRelease, ShowRoot};

/// Trailing `-GROUP`, optionally followed by bracketed tags.
const GROUP_PATTERN: &str = r"-(?P<group>[A-Za-z0-9]+)(?:\s*\[[^\]]*\])*\s*$";

/// Configuration for the release parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Release groups stripped in addition to the built-in table.
    pub release_groups: Vec<String>,
    /// Site tags stripped in addition to the built-in table.
    pub site_tags: Vec<String>,
    /// Whether ancestor directories may supply a missing show title.
    pub directory_fallback: bool,
    /// Whether a bare number after a known show is read as an episode.
    pub absolute_numbering: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            release_groups: Vec::new(),
            site_tags: Vec::new(),
            directory_fallback: true,
            absolute_numbering: true,
        }
    }
}

impl ParserConfig {
    /// Create a new parser configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add release groups to strip.
    pub fn with_release_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.release_groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Add site tags to strip.
    pub fn with_site_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.site_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Enable or disable the directory-name fallback.
    pub fn with_directory_fallback(mut self, enabled: bool) -> Self {
        self.directory_fallback = enabled;
        self
    }

    /// Enable or disable absolute episode numbering.
    pub fn with_absolute_numbering(mut self, enabled: bool) -> Self {
        self.absolute_numbering = enabled;
        self
    }

    /// Checks that every configured token is a single non-empty token.
    pub fn validate(&self) -> Result<()> {
        for token in self.release_groups.iter().chain(&self.site_tags) {
            if token.trim().is_empty() {
                return Err(KagamiError::InvalidConfig(
                    "empty release group or site tag".into(),
                ));
            }
            if token.chars().any(is_separator) {
                return Err(KagamiError::InvalidConfig(format!(
                    "{token:?} contains a separator and can never match a token"
                )));
            }
        }
        Ok(())
    }
}

/// Caller-supplied context for a single parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    /// Ancestor directory names, closest first.
    pub directories: Vec<String>,
    /// Show the file is expected to belong to; enables absolute numbering.
    pub known_show: Option<ShowRoot>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directories<I, S>(mut self, directories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directories = directories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_known_show(mut self, show: ShowRoot) -> Self {
        self.known_show = Some(show);
        self
    }
}

/// Scene release-name parser.
///
/// Parsing never fails: names that carry no recognizable episode marker or
/// no show title come back as [`ParsedRelease::failed()`].
#[derive(Debug, Clone)]
pub struct ReleaseParser {
    config: ParserConfig,
    extractor: TitleExtractor,
    group_pattern: Regex,
}

static DEFAULT_PARSER: LazyLock<std::result::Result<ReleaseParser, regex::Error>> =
    LazyLock::new(|| ReleaseParser::compile(ParserConfig::default()));

/// Parses `name` with a shared default parser.
///
/// # Examples
/// ```
/// use kagami_core::{Quality, parse_file};
///
/// let release = parse_file("House.S07E13.720p.HDTV.X264-DIMENSION").unwrap();
/// assert!(release.success);
/// assert_eq!((release.season, release.episode), (7, 13));
/// assert_eq!(release.quality, Quality::Hdtv720p);
/// ```
pub fn parse_file(name: &str) -> Result<ParsedRelease> {
    match &*DEFAULT_PARSER {
        Ok(parser) => Ok(parser.parse_file(name)),
        Err(err) => Err(KagamiError::RegexError(err.clone())),
    }
}

impl ReleaseParser {
    /// Create a parser with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser from a validated configuration.
    pub fn with_config(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::compile(config)?)
    }

    fn compile(config: ParserConfig) -> std::result::Result<Self, regex::Error> {
        let normalizer = Normalizer::with_extra(&config.release_groups, &config.site_tags);
        Ok(Self {
            extractor: TitleExtractor::compile(normalizer)?,
            group_pattern: Regex::new(GROUP_PATTERN)?,
            config,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        self.extractor.normalizer()
    }

    pub fn matcher(&self) -> &ConventionMatcher {
        self.extractor.matcher()
    }

    /// Parse a bare file name.
    ///
    /// # Examples
    /// ```
    /// use kagami_core::parser::ReleaseParser;
    ///
    /// let parser = ReleaseParser::new().unwrap();
    /// let release = parser.parse_file("top_gear.16x01.real.720p_hdtv_x264-fov.mkv");
    ///
    /// assert!(release.success);
    /// assert_eq!(release.show, "top gear");
    /// assert_eq!((release.season, release.episode), (16, 1));
    /// assert_eq!(release.quality.to_string(), "720p HDTV");
    /// ```
    pub fn parse_file(&self, name: &str) -> ParsedRelease {
        self.parse_file_with(name, &ParseContext::default())
    }

    /// Parse a file name found under `directories` (closest first).
    pub fn parse_file_in<S: AsRef<str>>(&self, name: &str, directories: &[S]) -> ParsedRelease {
        let context = ParseContext::new()
            .with_directories(directories.iter().map(|d| d.as_ref().to_string()));
        self.parse_file_with(name, &context)
    }

    /// Parse a file path, using its ancestor directories as context.
    pub fn parse_path(&self, path: &Path) -> ParsedRelease {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return ParsedRelease::failed();
        };
        let directories = path
            .ancestors()
            .skip(1)
            .filter_map(|dir| dir.file_name()?.to_str())
            .map(str::to_string);
        self.parse_file_with(name, &ParseContext::new().with_directories(directories))
    }

    /// Parse `name` with caller context.
    pub fn parse_file_with(&self, name: &str, context: &ParseContext) -> ParsedRelease {
        let name = name.trim();
        if name.is_empty() {
            return ParsedRelease::failed();
        }
        let (stem, extension) = split_extension(name);
        let normalized = self.normalizer().analyze(stem);

        let known_show = context
            .known_show
            .as_ref()
            .filter(|_| self.config.absolute_numbering);
        let Some(convention) = self.matcher().match_convention(&normalized.text, known_show)
        else {
            debug!(%name, "no naming convention recognized");
            return ParsedRelease::failed();
        };

        let directories: &[String] = if self.config.directory_fallback {
            &context.directories
        } else {
            &[]
        };
        let titles = self
            .extractor
            .extract(stem, &normalized, &convention, directories);
        if titles.show.is_empty() {
            debug!(%name, marker = %convention.marker, "convention matched but no show title");
            return ParsedRelease::failed();
        }

        ParsedRelease {
            show: titles.show,
            title: titles.title,
            season: convention.season(),
            episode: convention.episode(),
            second_episode: convention.second_episode(),
            air_date: convention.air_date(),
            absolute: matches!(convention.kind, ConventionKind::Absolute { .. }),
            quality: classify_quality(name),
            group: self.release_group(stem, &normalized),
            extension,
            success: true,
        }
    }

    /// Finds the episode marker of a raw name.
    pub fn match_convention(&self, name: &str) -> Option<NamingConvention> {
        let normalized = self.normalizer().normalize(name);
        self.matcher().match_convention(&normalized, None)
    }

    /// A presentable show title with any episode marker and noise removed.
    ///
    /// ```
    /// use kagami_core::parser::ReleaseParser;
    ///
    /// let parser = ReleaseParser::new().unwrap();
    /// assert_eq!(parser.clean_title("House S07E13"), "House");
    /// ```
    pub fn clean_title(&self, text: &str) -> String {
        self.extractor.clean(text)
    }

    /// The trailing `-GROUP` of the name, or a known group opening it.
    fn release_group(&self, stem: &str, normalized: &Normalized) -> Option<String> {
        if let Some(group) = self
            .group_pattern
            .captures(stem)
            .and_then(|caps| caps.name("group"))
        {
            let text = group.as_str();
            let position = normalized
                .tokens
                .iter()
                .position(|token| token.raw == group.range());
            let is_noise = position.is_some_and(|i| {
                self.extractor.noise_len(&normalized.tokens, i) > 0
                    || (i > 0 && self.extractor.noise_len(&normalized.tokens, i - 1) > 1)
            });
            if !is_noise && !text.bytes().all(|b| b.is_ascii_digit()) {
                return Some(text.to_string());
            }
        }

        let first = stem
            .split(is_separator)
            .find(|part| !part.is_empty() && !self.normalizer().is_site_tag(part))?;
        self.normalizer()
            .is_release_group(first)
            .then(|| first.to_string())
    }
}

/// Splits a known media extension off `name`.
fn split_extension(name: &str) -> (&str, Option<String>) {
    if let Some((stem, extension)) = name.rsplit_once('.') {
        let extension = extension.to_lowercase();
        if !stem.is_empty() && CONTAINERS.contains(&extension.as_str()) {
            return (stem, Some(extension));
        }
    }
    (name, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::get_root;
    use crate::types::Quality;
    use chrono::NaiveDate;

    fn parser() -> ReleaseParser {
        ReleaseParser::new().unwrap()
    }

    #[test]
    fn house_720p_hdtv() {
        let release = parser().parse_file("House.S07E13.720p.HDTV.X264-DIMENSION");
        assert!(release.success);
        assert_eq!(release.show, "House");
        assert_eq!(release.season, 7);
        assert_eq!(release.episode, 13);
        assert_eq!(release.second_episode, None);
        assert_eq!(release.quality, Quality::Hdtv720p);
        assert_eq!(release.quality.description(), "720p HDTV");
        assert_eq!(release.group.as_deref(), Some("DIMENSION"));
        assert_eq!(release.extension, None);
    }

    #[test]
    fn group_right_after_marker_is_not_the_title() {
        let release = parser().parse_file("Show.S02E03-KILLERS");
        assert!(release.success);
        assert_eq!(release.show, "Show");
        assert_eq!((release.season, release.episode), (2, 3));
        assert_eq!(release.title, "");
        assert_eq!(release.group.as_deref(), Some("KILLERS"));
    }

    #[test]
    fn top_gear_numeric_form() {
        let release = parser().parse_file("top_gear.16x01.real.720p_hdtv_x264-fov.mkv");
        assert!(release.success);
        assert_eq!(release.show, "top gear");
        assert_eq!(release.title, "");
        assert_eq!((release.season, release.episode), (16, 1));
        assert_eq!(release.quality.description(), "720p HDTV");
        assert_eq!(release.group.as_deref(), Some("fov"));
        assert_eq!(release.extension.as_deref(), Some("mkv"));
    }

    #[test]
    fn leading_group_excluded_from_show() {
        let release = parser().parse_file("aaf-tosh.s03e07.720p.mkv");
        assert!(release.success);
        assert_eq!((release.season, release.episode), (3, 7));
        assert_eq!(release.show, "tosh");
        assert!(!release.show.to_lowercase().contains("aaf"));
        assert_eq!(release.group.as_deref(), Some("aaf"));
    }

    #[test]
    fn year_qualified_show_is_not_the_bare_show() {
        let release = parser().parse_file("V.2009.S02E07.HDTV.XviD-2HD");
        assert!(release.success);
        assert_eq!(release.show, "V (2009)");
        assert_ne!(get_root(&release.show), get_root("V"));
        assert_eq!(get_root(&release.show), get_root("V (2009)"));
    }

    #[test]
    fn names_without_marker_fail() {
        let parser = parser();
        for name in ["README.txt", "", "   ", "holiday.photos.2011.jpg", "Movie.2010.720p.BluRay"] {
            let release = parser.parse_file(name);
            assert!(!release.success, "{name:?} should not parse");
            assert_eq!(release, ParsedRelease::failed());
            assert_eq!((release.season, release.episode), (0, 0));
        }
    }

    #[test]
    fn marker_without_show_fails() {
        let release = parser().parse_file("S01E01.720p.HDTV.mkv");
        assert!(!release.success);
        assert!(release.show.is_empty());
    }

    #[test]
    fn double_episode() {
        let release = parser().parse_file("Show.Name.S01E01-E02.Pilot.720p.WEB-DL.mkv");
        assert!(release.success);
        assert_eq!(release.show, "Show Name");
        assert_eq!(release.title, "Pilot");
        assert_eq!(release.episode, 1);
        assert_eq!(release.second_episode, Some(2));
        assert_eq!(release.quality, Quality::WebDl720p);
        assert_eq!(release.group, None);
    }

    #[test]
    fn chained_multi_episode_marker() {
        let release = parser().parse_file("Show.S01E01E02E03.720p.HDTV");
        assert!(release.success);
        assert_eq!(release.show, "Show");
        assert_eq!(release.episode, 1);
        assert_eq!(release.second_episode, Some(3));
        assert_eq!(release.episodes(), 1..=3);
        assert_eq!(release.quality, Quality::Hdtv720p);
    }

    #[test]
    fn reversed_span_keeps_first_episode() {
        let release = parser().parse_file("Show.S01E05-E03.HDTV");
        assert!(release.success);
        assert_eq!(release.episode, 5);
        assert_eq!(release.second_episode, None);
    }

    #[test]
    fn date_based_release() {
        let release = parser().parse_file("The.Daily.Show.2011.07.12.Guest.Name.HDTV.XviD-FQM.avi");
        assert!(release.success);
        assert_eq!(release.show, "The Daily Show");
        assert_eq!(release.title, "Guest Name");
        assert_eq!(release.air_date, NaiveDate::from_ymd_opt(2011, 7, 12));
        assert_eq!((release.season, release.episode), (0, 0));
        assert_eq!(release.quality, Quality::Hdtv);
    }

    #[test]
    fn absolute_numbering_with_known_show() {
        let parser = parser();
        let context = ParseContext::new().with_known_show(get_root("One Piece"));

        let release = parser.parse_file_with("One.Piece.1084.720p.mkv", &context);
        assert!(release.success);
        assert_eq!(release.show, "One Piece");
        assert_eq!(release.episode, 1084);
        assert!(release.absolute);
        assert_eq!(release.episode_code().as_deref(), Some("E1084"));

        assert!(!parser.parse_file("One.Piece.1084.720p.mkv").success);

        let disabled = ReleaseParser::with_config(ParserConfig::new().with_absolute_numbering(false))
            .unwrap();
        assert!(!disabled.parse_file_with("One.Piece.1084.720p.mkv", &context).success);
    }

    #[test]
    fn directory_fallback() {
        let parser = parser();
        let release = parser.parse_file_in("S02E03.720p.HDTV.mkv", &["Season 2", "Top Gear"]);
        assert!(release.success);
        assert_eq!(release.show, "Top Gear");
        assert_eq!((release.season, release.episode), (2, 3));

        let release = parser.parse_path(Path::new("/media/tv/Top Gear/Season 2/S02E03.mkv"));
        assert_eq!(release.show, "Top Gear");

        let disabled =
            ReleaseParser::with_config(ParserConfig::new().with_directory_fallback(false)).unwrap();
        assert!(!disabled.parse_file_in("S02E03.mkv", &["Top Gear"]).success);
    }

    #[test]
    fn configured_groups_and_tags() {
        let config = ParserConfig::new()
            .with_release_groups(["KILLERS"])
            .with_site_tags(["mysite"]);
        let parser = ReleaseParser::with_config(config).unwrap();
        let release = parser.parse_file("[mysite] killers-Show.S01E01.HDTV");
        assert_eq!(release.show, "Show");
        assert_eq!(release.group.as_deref(), Some("killers"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ParserConfig::new().with_release_groups([""]);
        assert!(matches!(
            ReleaseParser::with_config(config),
            Err(KagamiError::InvalidConfig(_))
        ));
        let config = ParserConfig::new().with_site_tags(["my.site"]);
        assert!(config.validate().is_err());
        assert!(ParserConfig::default().validate().is_ok());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ParserConfig = serde_json::from_str(r#"{"release_groups": ["killers"]}"#).unwrap();
        assert_eq!(config.release_groups, ["killers"]);
        assert!(config.directory_fallback);
        assert!(config.absolute_numbering);
    }

    #[test]
    fn quality_tokens_are_not_groups() {
        let parser = parser();
        assert_eq!(parser.parse_file("Show.S01E01.720p.WEB-DL").group, None);
        assert_eq!(parser.parse_file("Show.S01E01-02").group, None);
        assert_eq!(
            parser.parse_file("Show.S01E01.720p.x264-KILLERS [rarbg]").group.as_deref(),
            Some("KILLERS")
        );
    }

    #[test]
    fn match_and_clean() {
        let parser = parser();
        let convention = parser.match_convention("Top_Gear.16x01").unwrap();
        assert_eq!(convention.marker, "16x01");
        assert_eq!(parser.clean_title("House S07E13"), "House");
        assert!(parser.match_convention("README").is_none());
    }

    #[test]
    fn free_function_uses_defaults() {
        let release = parse_file("aaf-tosh.s03e07.720p.mkv").unwrap();
        assert_eq!(release.show, "tosh");
    }
}
