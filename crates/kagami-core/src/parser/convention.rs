//! # Episode Pattern Matcher
//!
//! Recognizes the episode marker of a normalized release name. Recognizers
//! run in [`Recognizer::PRIORITY`] order and the first hit wins. Every
//! pattern must be flanked by a separator or a string boundary, which keeps
//! years, resolutions and codec numbers from being read as episodes.

use chrono::NaiveDate;
use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::error::Result;
use crate::matching::get_root;
use crate::types::{ConventionKind, NamingConvention, ShowRoot};

/// One naming convention recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recognizer {
    /// `s07e13`, `s01e01-e02`, `s01e01e02`, `s01e01-02`
    SeasonEpisode,
    /// `16x01`, `16x01-02`
    Numeric,
    /// `2011 07 12`, `07 12 2011`
    AirDate,
    /// `one piece 1084`, only after a known show root
    Absolute,
}

impl Recognizer {
    /// The order recognizers are tried in.
    pub const PRIORITY: [Recognizer; 4] = [
        Self::SeasonEpisode,
        Self::Numeric,
        Self::AirDate,
        Self::Absolute,
    ];
}

const SEASON_EPISODE: &str = r"(?:^|[ -])(?P<marker>s(?P<season>\d{1,3})[ -]?e(?P<episode>\d{1,4})(?:(?:[ -]?e|-(?:s\d{1,3}e)?)(?P<second>\d{1,4}))*)(?:$|[ -])";
const NUMERIC: &str = r"(?:^|[ -])(?P<marker>(?P<season>\d{1,2})x(?P<episode>\d{2,3})(?:(?:-(?:\d{1,2}x)?|x)(?P<second>\d{2,3}))?)(?:$|[ -])";
const DATE_YEAR_FIRST: &str = r"(?:^|[ -])(?P<marker>(?P<year>(?:19|20)\d{2})(?P<sep1>[ -])(?P<a>\d{1,2})(?P<sep2>[ -])(?P<b>\d{1,2}))(?:$|[ -])";
const DATE_YEAR_LAST: &str = r"(?:^|[ -])(?P<marker>(?P<a>\d{1,2})(?P<sep1>[ -])(?P<b>\d{1,2})(?P<sep2>[ -])(?P<year>(?:19|20)\d{2}))(?:$|[ -])";

/// Compiled episode-marker patterns.
#[derive(Debug, Clone)]
pub struct ConventionMatcher {
    season_episode: Regex,
    numeric: Regex,
    date_year_first: Regex,
    date_year_last: Regex,
}

impl ConventionMatcher {
    /// Compile the marker patterns.
    pub fn new() -> Result<Self> {
        Ok(Self::compile()?)
    }

    pub(crate) fn compile() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            season_episode: Regex::new(SEASON_EPISODE)?,
            numeric: Regex::new(NUMERIC)?,
            date_year_first: Regex::new(DATE_YEAR_FIRST)?,
            date_year_last: Regex::new(DATE_YEAR_LAST)?,
        })
    }

    /// Finds the episode marker of a normalized name.
    ///
    /// `known_show` enables the absolute-number recognizer; without it a bare
    /// number is never read as an episode.
    ///
    /// # Examples
    /// ```
    /// use kagami_core::parser::ConventionMatcher;
    ///
    /// let matcher = ConventionMatcher::new().unwrap();
    /// let convention = matcher.match_convention("house s07e13 720p hdtv x264", None).unwrap();
    /// assert_eq!((convention.season(), convention.episode()), (7, 13));
    /// assert!(matcher.match_convention("readme", None).is_none());
    /// ```
    #[must_use]
    pub fn match_convention(
        &self,
        normalized: &str,
        known_show: Option<&ShowRoot>,
    ) -> Option<NamingConvention> {
        let found = Recognizer::PRIORITY
            .iter()
            .find_map(|&recognizer| self.recognize(recognizer, normalized, known_show));
        match &found {
            Some(convention) => trace!(%normalized, kind = %convention.kind, "naming convention recognized"),
            None => trace!(%normalized, "no naming convention recognized"),
        }
        found
    }

    /// Runs a single recognizer.
    #[must_use]
    pub fn recognize(
        &self,
        recognizer: Recognizer,
        normalized: &str,
        known_show: Option<&ShowRoot>,
    ) -> Option<NamingConvention> {
        match recognizer {
            Recognizer::SeasonEpisode => self.season_episode(normalized),
            Recognizer::Numeric => self.numeric(normalized),
            Recognizer::AirDate => self
                .air_date(&self.date_year_first, normalized)
                .or_else(|| self.air_date(&self.date_year_last, normalized)),
            Recognizer::Absolute => absolute(normalized, known_show?),
        }
    }

    fn season_episode(&self, text: &str) -> Option<NamingConvention> {
        let caps = self.season_episode.captures(text)?;
        let season = number(&caps, "season")?;
        let episode = number(&caps, "episode")?;
        let kind = match second_episode(&caps, episode) {
            Some(second_episode) => ConventionKind::DoubleEpisode {
                season,
                episode,
                second_episode,
            },
            None => ConventionKind::Standard { season, episode },
        };
        convention(&caps, kind)
    }

    fn numeric(&self, text: &str) -> Option<NamingConvention> {
        let caps = self.numeric.captures(text)?;
        let season = number(&caps, "season")?;
        let episode = number(&caps, "episode")?;
        let kind = ConventionKind::Numeric {
            season,
            episode,
            second_episode: second_episode(&caps, episode),
        };
        convention(&caps, kind)
    }

    fn air_date(&self, pattern: &Regex, text: &str) -> Option<NamingConvention> {
        pattern.captures_iter(text).find_map(|caps| {
            if caps.name("sep1")?.as_str() != caps.name("sep2")?.as_str() {
                return None;
            }
            let year = i32::try_from(number(&caps, "year")?).ok()?;
            let (mut month, mut day) = (number(&caps, "a")?, number(&caps, "b")?);
            if month > 12 && day <= 12 {
                std::mem::swap(&mut month, &mut day);
            }
            let Some(air_date) = NaiveDate::from_ymd_opt(year, month, day) else {
                debug!(marker = %caps.name("marker")?.as_str(), "date marker is not a calendar date");
                return None;
            };
            convention(&caps, ConventionKind::DateBased { air_date })
        })
    }
}

fn number(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().parse().ok()
}

/// The second number of a span, if it really is a later episode.
fn second_episode(caps: &Captures<'_>, episode: u32) -> Option<u32> {
    let second = number(caps, "second")?;
    if second <= episode {
        debug!(episode, second, "malformed episode span, keeping the first episode");
        return None;
    }
    Some(second)
}

fn convention(caps: &Captures<'_>, kind: ConventionKind) -> Option<NamingConvention> {
    let marker = caps.name("marker")?;
    Some(NamingConvention {
        kind,
        span: marker.range(),
        marker: marker.as_str().to_string(),
    })
}

/// A bare 2-4 digit number whose preceding tokens reduce to `known_show`.
fn absolute(text: &str, known_show: &ShowRoot) -> Option<NamingConvention> {
    if known_show.is_empty() {
        return None;
    }
    let mut start = 0;
    for token in text.split([' ', '-']) {
        let span = start..start + token.len();
        start = span.end + 1;

        if !(2..=4).contains(&token.len()) || !token.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        let Ok(episode) = token.parse::<u32>() else {
            continue;
        };
        if episode == 0 || (token.len() == 4 && (1900..=2099).contains(&episode)) {
            continue;
        }
        if get_root(&text[..span.start]) == *known_show {
            return Some(NamingConvention {
                kind: ConventionKind::Absolute { episode },
                marker: token.to_string(),
                span,
            });
        }
    }
    None
}
