use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KagamiError;

/// Release quality, ordered from lowest to highest rank.
///
/// Each value has exactly one canonical description (see [`QUALITY_TABLE`]),
/// which is also what [`Quality`]'s `Display` prints.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Quality {
    /// No quality token recognized.
    #[default]
    Unknown,
    /// "XviD"
    Xvid,
    /// "x264"
    X264,
    /// "HDTV"
    Hdtv,
    /// "HDTV x264"
    HdtvX264,
    /// "DVDRip"
    DvdRip,
    /// "WEB-DL"
    WebDl,
    /// "BDRip"
    BdRip,
    /// "720p HDTV"
    Hdtv720p,
    /// "720p WEB-DL"
    WebDl720p,
    /// "720p BluRay"
    BluRay720p,
    /// "1080i HDTV"
    Hdtv1080i,
    /// "1080p WEB-DL"
    WebDl1080p,
    /// "1080p BluRay"
    BluRay1080p,
    /// "2160p"
    Uhd2160p,
    /// "2160p WEB-DL"
    WebDl2160p,
    /// "2160p BluRay"
    BluRay2160p,
}

/// Precedence class of a quality entry.
///
/// The classifier tries every resolution entry before any source entry, and
/// every source entry before any codec entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityTier {
    Resolution,
    Source,
    Codec,
}

/// One row of the quality table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityEntry {
    pub quality: Quality,
    /// Canonical, human-readable description.
    pub description: &'static str,
    pub tier: QualityTier,
    /// Synonym groups. Every group must be present in the text; any synonym
    /// of a group satisfies it. Synonyms are matched as whole token runs, so
    /// `"web-dl"` also matches `WEB.DL` and `web_dl`.
    pub requires: &'static [&'static [&'static str]],
}

const RES_2160: &[&str] = &["2160p", "4k", "uhd"];
const RES_1080P: &[&str] = &["1080p"];
const RES_1080: &[&str] = &["1080p", "1080i"];
const RES_720: &[&str] = &["720p"];

const SRC_BLURAY: &[&str] = &["bluray", "blu-ray", "bdrip", "brrip", "bdremux", "bd"];
const SRC_WEB: &[&str] = &["web-dl", "webdl", "webrip", "web-rip"];
const SRC_DVD: &[&str] = &["dvdrip", "dvd", "dvdr", "dvd5", "dvd9", "dvdscr"];
const SRC_TV: &[&str] = &["hdtv", "pdtv", "sdtv", "dsr", "dsrip", "tvrip", "hdtvrip", "dvb"];

const CODEC_X264: &[&str] = &["x264", "h264", "h.264", "avc"];
const CODEC_XVID: &[&str] = &["xvid", "divx"];

/// The quality table in classification order: resolution tier, then source
/// tier, then codec tier, each from highest to lowest rank.
///
/// [`Quality::Unknown`] is not listed; it is what classification yields when
/// no row matches.
pub static QUALITY_TABLE: &[QualityEntry] = &[
    QualityEntry {
        quality: Quality::BluRay2160p,
        description: "2160p BluRay",
        tier: QualityTier::Resolution,
        requires: &[RES_2160, SRC_BLURAY],
    },
    QualityEntry {
        quality: Quality::WebDl2160p,
        description: "2160p WEB-DL",
        tier: QualityTier::Resolution,
        requires: &[RES_2160, SRC_WEB],
    },
    QualityEntry {
        quality: Quality::Uhd2160p,
        description: "2160p",
        tier: QualityTier::Resolution,
        requires: &[RES_2160],
    },
    QualityEntry {
        quality: Quality::BluRay1080p,
        description: "1080p BluRay",
        tier: QualityTier::Resolution,
        requires: &[RES_1080P, SRC_BLURAY],
    },
    QualityEntry {
        quality: Quality::WebDl1080p,
        description: "1080p WEB-DL",
        tier: QualityTier::Resolution,
        requires: &[RES_1080P, SRC_WEB],
    },
    QualityEntry {
        quality: Quality::Hdtv1080i,
        description: "1080i HDTV",
        tier: QualityTier::Resolution,
        requires: &[RES_1080],
    },
    QualityEntry {
        quality: Quality::BluRay720p,
        description: "720p BluRay",
        tier: QualityTier::Resolution,
        requires: &[RES_720, SRC_BLURAY],
    },
    QualityEntry {
        quality: Quality::WebDl720p,
        description: "720p WEB-DL",
        tier: QualityTier::Resolution,
        requires: &[RES_720, SRC_WEB],
    },
    QualityEntry {
        quality: Quality::Hdtv720p,
        description: "720p HDTV",
        tier: QualityTier::Resolution,
        requires: &[RES_720],
    },
    QualityEntry {
        quality: Quality::BdRip,
        description: "BDRip",
        tier: QualityTier::Source,
        requires: &[SRC_BLURAY],
    },
    QualityEntry {
        quality: Quality::WebDl,
        description: "WEB-DL",
        tier: QualityTier::Source,
        requires: &[SRC_WEB],
    },
    QualityEntry {
        quality: Quality::DvdRip,
        description: "DVDRip",
        tier: QualityTier::Source,
        requires: &[SRC_DVD],
    },
    QualityEntry {
        quality: Quality::HdtvX264,
        description: "HDTV x264",
        tier: QualityTier::Source,
        requires: &[SRC_TV, CODEC_X264],
    },
    QualityEntry {
        quality: Quality::Hdtv,
        description: "HDTV",
        tier: QualityTier::Source,
        requires: &[SRC_TV],
    },
    QualityEntry {
        quality: Quality::X264,
        description: "x264",
        tier: QualityTier::Codec,
        requires: &[CODEC_X264],
    },
    QualityEntry {
        quality: Quality::Xvid,
        description: "XviD",
        tier: QualityTier::Codec,
        requires: &[CODEC_XVID],
    },
];

const UNKNOWN_DESCRIPTION: &str = "Unknown";

impl Quality {
    /// Every quality value, lowest rank first.
    pub const ALL: [Quality; 17] = [
        Self::Unknown,
        Self::Xvid,
        Self::X264,
        Self::Hdtv,
        Self::HdtvX264,
        Self::DvdRip,
        Self::WebDl,
        Self::BdRip,
        Self::Hdtv720p,
        Self::WebDl720p,
        Self::BluRay720p,
        Self::Hdtv1080i,
        Self::WebDl1080p,
        Self::BluRay1080p,
        Self::Uhd2160p,
        Self::WebDl2160p,
        Self::BluRay2160p,
    ];

    /// Returns the table row for this quality, `None` for [`Quality::Unknown`].
    #[must_use]
    pub fn entry(self) -> Option<&'static QualityEntry> {
        QUALITY_TABLE.iter().find(|entry| entry.quality == self)
    }

    /// Returns the canonical description, e.g. `"720p HDTV"`.
    #[must_use]
    pub fn description(self) -> &'static str {
        self.entry()
            .map_or(UNKNOWN_DESCRIPTION, |entry| entry.description)
    }

    /// Returns the precedence tier, `None` for [`Quality::Unknown`].
    #[must_use]
    pub fn tier(self) -> Option<QualityTier> {
        self.entry().map(|entry| entry.tier)
    }

    /// Looks up a quality by its exact canonical description (case-insensitive).
    ///
    /// Unlike classification this does not scan for tokens: `"720p HDTV x264"`
    /// is not a canonical description and yields `None`.
    #[must_use]
    pub fn from_description(description: &str) -> Option<Self> {
        let description = description.trim();
        if description.eq_ignore_ascii_case(UNKNOWN_DESCRIPTION) {
            return Some(Self::Unknown);
        }
        QUALITY_TABLE
            .iter()
            .find(|entry| entry.description.eq_ignore_ascii_case(description))
            .map(|entry| entry.quality)
    }

    /// Returns `true` for every value except [`Quality::Unknown`].
    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for Quality {
    type Err = KagamiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_description(s).ok_or_else(|| KagamiError::UnknownQuality {
            description: s.to_string(),
        })
    }
}
