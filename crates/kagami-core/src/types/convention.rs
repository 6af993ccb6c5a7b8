use std::fmt;
use std::ops::Range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The episode numbering a release name was written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConventionKind {
    /// `S07E13`
    Standard { season: u32, episode: u32 },

    /// `S01E01-E02`, `S01E01E02`, `S01E01-02`
    ///
    /// `second_episode` is always greater than `episode`.
    DoubleEpisode {
        season: u32,
        episode: u32,
        second_episode: u32,
    },

    /// `16x01`, optionally spanning a second episode (`16x01-02`).
    Numeric {
        season: u32,
        episode: u32,
        second_episode: Option<u32>,
    },

    /// `2011.07.12`, `07.12.2011`
    DateBased { air_date: NaiveDate },

    /// A bare episode number following a known show title: `One Piece 1084`.
    Absolute { episode: u32 },
}

/// A recognized episode marker together with where it sits in the
/// normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamingConvention {
    pub kind: ConventionKind,
    /// Byte range of the marker inside the normalized name.
    pub span: Range<usize>,
    /// The marker text as it appears in the normalized name.
    pub marker: String,
}

impl NamingConvention {
    /// Season number, `0` for date-based and absolute numbering.
    #[must_use]
    pub fn season(&self) -> u32 {
        match self.kind {
            ConventionKind::Standard { season, .. }
            | ConventionKind::DoubleEpisode { season, .. }
            | ConventionKind::Numeric { season, .. } => season,
            ConventionKind::DateBased { .. } | ConventionKind::Absolute { .. } => 0,
        }
    }

    /// Episode number, `0` for date-based numbering.
    #[must_use]
    pub fn episode(&self) -> u32 {
        match self.kind {
            ConventionKind::Standard { episode, .. }
            | ConventionKind::DoubleEpisode { episode, .. }
            | ConventionKind::Numeric { episode, .. }
            | ConventionKind::Absolute { episode } => episode,
            ConventionKind::DateBased { .. } => 0,
        }
    }

    #[must_use]
    pub fn second_episode(&self) -> Option<u32> {
        match self.kind {
            ConventionKind::DoubleEpisode { second_episode, .. } => Some(second_episode),
            ConventionKind::Numeric { second_episode, .. } => second_episode,
            _ => None,
        }
    }

    #[must_use]
    pub fn air_date(&self) -> Option<NaiveDate> {
        match self.kind {
            ConventionKind::DateBased { air_date } => Some(air_date),
            _ => None,
        }
    }
}

impl fmt::Display for ConventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard { season, episode } => write!(f, "S{season:02}E{episode:02}"),
            Self::DoubleEpisode {
                season,
                episode,
                second_episode,
            } => write!(f, "S{season:02}E{episode:02}-E{second_episode:02}"),
            Self::Numeric {
                season,
                episode,
                second_episode: Some(second),
            } => write!(f, "{season}x{episode:02}-{second:02}"),
            Self::Numeric {
                season, episode, ..
            } => write!(f, "{season}x{episode:02}"),
            Self::DateBased { air_date } => write!(f, "{}", air_date.format("%Y-%m-%d")),
            Self::Absolute { episode } => write!(f, "E{episode:02}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convention(kind: ConventionKind) -> NamingConvention {
        NamingConvention {
            kind,
            span: 0..0,
            marker: String::new(),
        }
    }

    #[test]
    fn convention_display() {
        assert_eq!(
            ConventionKind::Standard {
                season: 7,
                episode: 13
            }
            .to_string(),
            "S07E13"
        );
        assert_eq!(
            ConventionKind::DoubleEpisode {
                season: 1,
                episode: 1,
                second_episode: 2
            }
            .to_string(),
            "S01E01-E02"
        );
        assert_eq!(
            ConventionKind::Numeric {
                season: 16,
                episode: 1,
                second_episode: None
            }
            .to_string(),
            "16x01"
        );
        let air_date = NaiveDate::from_ymd_opt(2011, 7, 12).unwrap();
        assert_eq!(ConventionKind::DateBased { air_date }.to_string(), "2011-07-12");
        assert_eq!(ConventionKind::Absolute { episode: 1084 }.to_string(), "E1084");
    }

    #[test]
    fn accessors_follow_the_kind() {
        let double = convention(ConventionKind::DoubleEpisode {
            season: 2,
            episode: 5,
            second_episode: 6,
        });
        assert_eq!(double.season(), 2);
        assert_eq!(double.episode(), 5);
        assert_eq!(double.second_episode(), Some(6));
        assert_eq!(double.air_date(), None);

        let air_date = NaiveDate::from_ymd_opt(2011, 7, 12).unwrap();
        let dated = convention(ConventionKind::DateBased { air_date });
        assert_eq!(dated.season(), 0);
        assert_eq!(dated.episode(), 0);
        assert_eq!(dated.air_date(), Some(air_date));

        let absolute = convention(ConventionKind::Absolute { episode: 1084 });
        assert_eq!(absolute.season(), 0);
        assert_eq!(absolute.episode(), 1084);
    }

    #[test]
    fn convention_serialization_roundtrip() {
        let original = NamingConvention {
            kind: ConventionKind::Numeric {
                season: 16,
                episode: 1,
                second_episode: Some(2),
            },
            span: 9..17,
            marker: "16x01-02".into(),
        };
        let json = serde_json::to_string(&original).unwrap();
        let back: NamingConvention = serde_json::from_str(&json).unwrap();
        assert_eq!(original, back);
    }
}
