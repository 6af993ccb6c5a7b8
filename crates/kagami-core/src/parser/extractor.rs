//! # Show-Title Extractor
//!
//! Splits a normalized name around its episode marker. Tokens before the
//! marker are the show title, tokens after it are the episode title. Both
//! are rendered from the original text so casing survives.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::convention::ConventionMatcher;
use super::normalizer::{
    CONTAINERS, FORMAT_TOKENS, Normalized, Normalizer, SCENE_TAGS, Separator, Token,
};
use crate::error::Result;
use crate::types::{NamingConvention, QUALITY_TABLE};

/// Quality synonyms split into their token runs, e.g. `web-dl` → `[web, dl]`.
static QUALITY_PHRASES: LazyLock<Vec<Vec<String>>> = LazyLock::new(|| {
    let mut phrases: Vec<Vec<String>> = QUALITY_TABLE
        .iter()
        .flat_map(|entry| entry.requires.iter().copied().flatten())
        .map(|synonym| super::classifier::words(synonym))
        .filter(|phrase| !phrase.is_empty())
        .collect();
    phrases.sort();
    phrases.dedup();
    phrases
});

const SEASON_FOLDER: &str = r"^(?:(?:season|series|s)[ -]?\d{1,3}|specials?|\d+)$";

/// Show and episode titles of a release name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTitles {
    pub show: String,
    pub title: String,
}

/// Extracts show and episode titles around a recognized marker.
#[derive(Debug, Clone)]
pub struct TitleExtractor {
    normalizer: Normalizer,
    matcher: ConventionMatcher,
    season_folder: Regex,
}

impl TitleExtractor {
    /// Create an extractor sharing `normalizer`'s noise tables.
    pub fn new(normalizer: Normalizer) -> Result<Self> {
        Ok(Self::compile(normalizer)?)
    }

    pub(crate) fn compile(normalizer: Normalizer) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            normalizer,
            matcher: ConventionMatcher::compile()?,
            season_folder: Regex::new(SEASON_FOLDER)?,
        })
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn matcher(&self) -> &ConventionMatcher {
        &self.matcher
    }

    /// Extracts the show and episode titles of `original`.
    ///
    /// `normalized` must be `original` analyzed by this extractor's
    /// normalizer. When no show title precedes the marker, `directories`
    /// (closest first) are tried in order; an empty `show` means extraction
    /// failed.
    pub fn extract<S: AsRef<str>>(
        &self,
        original: &str,
        normalized: &Normalized,
        convention: &NamingConvention,
        directories: &[S],
    ) -> ExtractedTitles {
        let Some(marker) = normalized.token_span(&convention.span) else {
            return ExtractedTitles::default();
        };
        let tokens = &normalized.tokens;

        let show_end = self.trim_noise(&tokens[..marker.start]);
        let mut show = render_show(original, &tokens[..show_end]);

        let mut rest = &tokens[marker.end..];
        // The final hyphen-delimited token of the whole name is the release
        // group, never part of the episode title, even right after the marker.
        if rest.last().is_some_and(|token| token.sep == Separator::Hyphen) {
            rest = &rest[..rest.len() - 1];
        }
        let cut = self.first_noise(rest);
        let title_end = self.trim_noise(&rest[..cut]);
        let title = render(original, &rest[..title_end]);

        if show.is_empty() {
            if let Some(found) = self.directory_title(directories) {
                show = found;
            } else {
                debug!(name = %original, "no show title in name or directories");
            }
        }
        ExtractedTitles { show, title }
    }

    /// A presentable show title: everything before the episode marker, or
    /// everything before the first noise token when there is no marker.
    ///
    /// `"House.S07E13.720p"` → `"House"`, `"Top.Gear.720p.HDTV"` → `"Top Gear"`.
    pub fn clean(&self, text: &str) -> String {
        let normalized = self.normalizer.analyze(text);
        let tokens = &normalized.tokens;
        let end = match self.matcher.match_convention(&normalized.text, None) {
            Some(convention) => normalized
                .token_span(&convention.span)
                .map_or(0, |span| span.start),
            None => self.first_noise(tokens),
        };
        let end = self.trim_noise(&tokens[..end]);
        let end = trim_season(tokens, end);
        let end = self.trim_noise(&tokens[..end]);
        render_show(text, &tokens[..end])
    }

    /// First usable show title among closest-first ancestor directories.
    fn directory_title<S: AsRef<str>>(&self, directories: &[S]) -> Option<String> {
        directories.iter().map(|d| d.as_ref()).find_map(|directory| {
            if self.is_season_folder(directory) {
                return None;
            }
            let show = self.clean(directory);
            if show.is_empty() {
                return None;
            }
            debug!(%directory, %show, "show title taken from directory");
            Some(show)
        })
    }

    /// `Season 3`, `S03`, `Series 2`, `Specials`, `04`
    pub fn is_season_folder(&self, directory: &str) -> bool {
        let normalized = self.normalizer.normalize(directory);
        self.season_folder.is_match(&normalized)
    }

    /// Number of tokens a noise run starting at `i` covers, or 0.
    ///
    /// Scene tags such as `real` or `proper` only count when noise or the
    /// end of the slice follows them.
    pub(crate) fn noise_len(&self, tokens: &[Token], i: usize) -> usize {
        let Some(token) = tokens.get(i) else {
            return 0;
        };
        let text = token.text.as_str();
        if CONTAINERS.contains(&text)
            || FORMAT_TOKENS.contains(&text)
            || self.normalizer.is_release_group(text)
        {
            return 1;
        }
        if let Some(len) = QUALITY_PHRASES
            .iter()
            .filter(|phrase| {
                tokens.len() - i >= phrase.len()
                    && tokens[i..i + phrase.len()]
                        .iter()
                        .zip(phrase.iter())
                        .all(|(token, word)| token.text == *word)
            })
            .map(Vec::len)
            .max()
        {
            return len;
        }
        if SCENE_TAGS.contains(&text) && (i + 1 == tokens.len() || self.noise_len(tokens, i + 1) > 0)
        {
            return 1;
        }
        0
    }

    /// Index of the first noise token, or `tokens.len()`.
    fn first_noise(&self, tokens: &[Token]) -> usize {
        (0..tokens.len())
            .find(|&i| self.noise_len(tokens, i) > 0)
            .unwrap_or(tokens.len())
    }

    /// End index after peeling noise off the tail of `tokens`.
    fn trim_noise(&self, tokens: &[Token]) -> usize {
        let mut end = tokens.len();
        'peel: while end > 0 {
            for len in 1..=end.min(3) {
                if self.noise_len(&tokens[..end], end - len) == len {
                    end -= len;
                    continue 'peel;
                }
            }
            // `x264-GROUP` where the group is not a known one.
            if end >= 2
                && tokens[end - 1].sep == Separator::Hyphen
                && self.noise_len(&tokens[..end - 1], end - 2) == 1
            {
                end -= 2;
                continue;
            }
            break;
        }
        end
    }
}

/// Original text of `tokens`, joined by their separators.
///
/// Dotted single letters keep their dots, so `S.H.I.E.L.D` survives.
fn render(original: &str, tokens: &[Token]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        let text = original.get(token.raw.clone()).unwrap_or(&token.text);
        if i > 0 {
            let previous = &tokens[i - 1];
            let gap = original.get(previous.raw.end..token.raw.start);
            if is_letter(&previous.text) && is_letter(&token.text) && gap == Some(".") {
                out.push('.');
            } else {
                out.push_str(token.sep.display());
            }
        }
        out.push_str(text);
    }
    out
}

/// Like [`render`], writing a trailing year as a qualifier: `V (2009)`.
fn render_show(original: &str, tokens: &[Token]) -> String {
    match tokens.split_last() {
        Some((last, init)) if !init.is_empty() && is_year(&last.text) => {
            format!("{} ({})", render(original, init), last.text)
        }
        _ => render(original, tokens),
    }
}

/// End index after peeling `s16` or `season 16` off the tail of `tokens[..end]`.
fn trim_season(tokens: &[Token], mut end: usize) -> usize {
    while end > 0 {
        let text = tokens[end - 1].text.as_str();
        if text
            .strip_prefix('s')
            .is_some_and(|n| (1..=3).contains(&n.len()) && is_number(n))
        {
            end -= 1;
        } else if end >= 2
            && is_number(text)
            && matches!(tokens[end - 2].text.as_str(), "season" | "series")
        {
            end -= 2;
        } else {
            break;
        }
    }
    end
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn is_letter(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(char::is_alphabetic) && chars.next().is_none()
}

fn is_year(text: &str) -> bool {
    text.len() == 4 && text.parse::<u16>().is_ok_and(|year| (1900..=2099).contains(&year))
}
