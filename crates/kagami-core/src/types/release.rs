use std::fmt;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::quality::Quality;

/// The output of the release parser.
///
/// Check [`success`](Self::success) before trusting any other field: a failed
/// parse is always [`ParsedRelease::failed()`], with every field at its
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRelease {
    /// Show title as written in the name (or the directory it came from).
    pub show: String,

    /// Episode title, empty when the name carries none.
    pub title: String,

    /// Season number, `0` for date-based and absolute numbering.
    pub season: u32,

    /// Episode number, `0` for date-based numbering.
    pub episode: u32,

    /// Last episode of a double-episode file. Always greater than `episode`.
    pub second_episode: Option<u32>,

    /// Air date, for daily shows named by date instead of season/episode.
    pub air_date: Option<NaiveDate>,

    /// Episode is numbered from the start of the show, without a season.
    #[serde(default)]
    pub absolute: bool,

    pub quality: Quality,

    /// Release group, e.g. "DIMENSION".
    pub group: Option<String>,

    /// Lower-cased file extension, without the dot.
    pub extension: Option<String>,

    pub success: bool,
}

impl ParsedRelease {
    /// The result of a parse that recognized nothing.
    #[must_use]
    pub fn failed() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_double_episode(&self) -> bool {
        self.second_episode.is_some()
    }

    /// Episode numbers covered by this file, e.g. `5..=6` for a double episode.
    ///
    /// Empty for failed and date-based parses.
    #[must_use]
    pub fn episodes(&self) -> RangeInclusive<u32> {
        if !self.success || self.air_date.is_some() {
            return RangeInclusive::new(1, 0);
        }
        self.episode..=self.second_episode.unwrap_or(self.episode)
    }

    /// Short episode code: `S07E13`, `S01E01-E02`, `E1084` or `2011-07-12`.
    #[must_use]
    pub fn episode_code(&self) -> Option<String> {
        if !self.success {
            return None;
        }
        if let Some(air_date) = self.air_date {
            return Some(air_date.format("%Y-%m-%d").to_string());
        }
        if self.absolute {
            return Some(format!("E{:02}", self.episode));
        }
        let mut code = format!("S{:02}E{:02}", self.season, self.episode);
        if let Some(second) = self.second_episode {
            code.push_str(&format!("-E{second:02}"));
        }
        Some(code)
    }
}

impl fmt::Display for ParsedRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(code) = self.episode_code() else {
            return write!(f, "ParsedRelease(unrecognized)");
        };
        write!(f, "{} {code}", self.show)?;
        if !self.title.is_empty() {
            write!(f, " - {}", self.title)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn house() -> ParsedRelease {
        ParsedRelease {
            show: "House".into(),
            title: "Two Stories".into(),
            season: 7,
            episode: 13,
            quality: Quality::Hdtv720p,
            group: Some("DIMENSION".into()),
            success: true,
            ..ParsedRelease::default()
        }
    }

    #[test]
    fn failed_result_is_empty() {
        let result = ParsedRelease::failed();
        assert!(!result.success);
        assert!(result.show.is_empty());
        assert!(result.title.is_empty());
        assert_eq!(result.season, 0);
        assert_eq!(result.episode, 0);
        assert_eq!(result.quality, Quality::Unknown);
        assert_eq!(result.episode_code(), None);
        assert!(result.episodes().is_empty());
    }

    #[test]
    fn display_uses_episode_code() {
        assert_eq!(house().to_string(), "House S07E13 - Two Stories");

        let mut untitled = house();
        untitled.title.clear();
        assert_eq!(untitled.to_string(), "House S07E13");

        assert_eq!(ParsedRelease::failed().to_string(), "ParsedRelease(unrecognized)");
    }

    #[test]
    fn double_episode_covers_both_numbers() {
        let mut double = house();
        double.episode = 5;
        double.second_episode = Some(6);
        assert!(double.is_double_episode());
        assert_eq!(double.episodes().collect::<Vec<_>>(), vec![5, 6]);
        assert_eq!(double.episode_code().as_deref(), Some("S07E05-E06"));

        assert_eq!(house().episodes().collect::<Vec<_>>(), vec![13]);
    }

    #[test]
    fn dated_release_code() {
        let dated = ParsedRelease {
            show: "The Daily Show".into(),
            air_date: NaiveDate::from_ymd_opt(2011, 7, 12),
            success: true,
            ..ParsedRelease::default()
        };
        assert_eq!(dated.episode_code().as_deref(), Some("2011-07-12"));
        assert!(dated.episodes().is_empty());
    }

    #[test]
    fn absolute_code_matches_the_convention() {
        let absolute = ParsedRelease {
            show: "One Piece".into(),
            episode: 1084,
            absolute: true,
            success: true,
            ..ParsedRelease::default()
        };
        let code = absolute.episode_code();
        assert_eq!(code.as_deref(), Some("E1084"));
        assert_eq!(
            code,
            Some(crate::types::ConventionKind::Absolute { episode: 1084 }.to_string())
        );
        assert_eq!(absolute.to_string(), "One Piece E1084");

        // Season-zero specials keep their season.
        let special = ParsedRelease {
            season: 0,
            episode: 3,
            ..house()
        };
        assert_eq!(special.episode_code().as_deref(), Some("S00E03"));
    }

    #[test]
    fn parsed_release_serialization_roundtrip() {
        let mut result = house();
        result.air_date = NaiveDate::from_ymd_opt(2011, 2, 14);
        result.extension = Some("mkv".into());

        let json = serde_json::to_string_pretty(&result).unwrap();
        let back: ParsedRelease = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
