use std::borrow::Cow;

use super::root::{get_root, root_tokens};
use crate::types::ShowRoot;

/// Anything a show root can be taken from.
pub trait ToShowRoot {
    fn to_show_root(&self) -> Cow<'_, ShowRoot>;
}

impl ToShowRoot for ShowRoot {
    fn to_show_root(&self) -> Cow<'_, ShowRoot> {
        Cow::Borrowed(self)
    }
}

impl ToShowRoot for str {
    fn to_show_root(&self) -> Cow<'_, ShowRoot> {
        Cow::Owned(get_root(self))
    }
}

impl ToShowRoot for String {
    fn to_show_root(&self) -> Cow<'_, ShowRoot> {
        self.as_str().to_show_root()
    }
}

/// Decides whether `candidate` names the show whose root is `reference`.
///
/// Roots match when they are equal, when one is a single-token acronym of a
/// root with three or more tokens (`himym`), or when the shorter one has at
/// least two tokens and opens the longer one (truncated directory names).
/// An empty root matches only another empty root.
///
/// # Examples
/// ```
/// use kagami_core::matching::{get_root, is_match};
///
/// assert!(is_match("house md", &get_root("House, M.D.")));
/// assert!(is_match("HIMYM", &get_root("How I Met Your Mother")));
/// assert!(!is_match("V", &get_root("V (2009)")));
/// ```
#[must_use]
pub fn is_match<C>(candidate: &C, reference: &ShowRoot) -> bool
where
    C: ToShowRoot + ?Sized,
{
    roots_match(&candidate.to_show_root(), reference)
}

fn roots_match(a: &ShowRoot, b: &ShowRoot) -> bool {
    if a == b {
        return true;
    }
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if is_acronym(a, b) || is_acronym(b, a) {
        return true;
    }
    let (short, long) = if a.len() < b.len() { (a, b) } else { (b, a) };
    short.len() >= 2 && short.len() < long.len() && long.starts_with(short)
}

fn is_acronym(acronym: &ShowRoot, full: &ShowRoot) -> bool {
    acronym.len() == 1 && full.len() >= 3 && acronym.tokens()[0] == full.initials()
}

/// Returns `true` if `root`'s tokens appear contiguously in `text`.
///
/// A cheap pre-filter for full paths and window titles, where the show name
/// is surrounded by other text.
#[must_use]
pub fn appears_in(text: &str, root: &ShowRoot) -> bool {
    if root.is_empty() {
        return false;
    }
    let tokens = root_tokens(text);
    tokens
        .windows(root.len())
        .any(|window| window == root.tokens())
}

/// Drops every candidate that matches one of the `known` roots.
///
/// Empty known roots are ignored, so punctuation-only candidates survive.
pub fn filter_known<I, S>(candidates: I, known: &[ShowRoot]) -> Vec<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .filter(|candidate| {
            let root = get_root(candidate.as_ref());
            !known
                .iter()
                .filter(|show| !show.is_empty())
                .any(|show| roots_match(&root, show))
        })
        .collect()
}

/// Keeps the first name of every group of matching names.
pub fn dedup_shows<I, S>(names: I) -> Vec<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<ShowRoot> = Vec::new();
    let mut kept = Vec::new();
    for name in names {
        let root = get_root(name.as_ref());
        if root.is_empty() || seen.iter().any(|other| roots_match(&root, other)) {
            continue;
        }
        seen.push(root);
        kept.push(name);
    }
    kept
}
