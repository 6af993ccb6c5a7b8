//! Quality classification over free text.

use crate::types::{QUALITY_TABLE, Quality};

/// Scans `text` for quality tokens and returns the first matching row of the
/// quality table.
///
/// Rows are tried as a cascade: all resolution rows, then source rows, then
/// codec rows, so `720p` beats `HDTV` even when both are present. Tokens are
/// compared case-insensitively and must be whole words.
///
/// # Examples
/// ```
/// use kagami_core::{Quality, classify_quality};
///
/// assert_eq!(classify_quality("House.S07E13.720p.HDTV.X264-DIMENSION"), Quality::Hdtv720p);
/// assert_eq!(classify_quality("Show.S01E01.WEB.DL.x264"), Quality::WebDl);
/// assert_eq!(classify_quality("holiday photos"), Quality::Unknown);
/// ```
#[must_use]
pub fn classify_quality(text: &str) -> Quality {
    let words = words(text);
    if words.is_empty() {
        return Quality::Unknown;
    }

    QUALITY_TABLE
        .iter()
        .find(|entry| {
            entry
                .requires
                .iter()
                .all(|group| group.iter().any(|synonym| contains_phrase(&words, synonym)))
        })
        .map_or(Quality::Unknown, |entry| entry.quality)
}

/// Canonical description of `quality`, the inverse of [`classify_quality`].
#[must_use]
pub fn describe_quality(quality: Quality) -> &'static str {
    quality.description()
}

/// Lower-cased alphanumeric words of `text`.
pub(crate) fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Returns `true` if the words of `phrase` appear as a contiguous run in
/// `words`.
fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let phrase: Vec<&str> = phrase
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    if phrase.is_empty() || phrase.len() > words.len() {
        return false;
    }
    words
        .windows(phrase.len())
        .any(|window| window.iter().zip(&phrase).all(|(word, part)| word == part))
}
