use crate::types::ShowRoot;

const ARTICLES: &[&str] = &["the", "a", "an"];

/// Canonical root of a show title.
///
/// Lower-cases, drops apostrophes and punctuation, reads `&` as `and`,
/// merges dotted acronyms (`M.D.` → `md`) and strips a leading article.
/// A year qualifier stays as the last token so `V (2009)` and `V` differ.
///
/// # Examples
/// ```
/// use kagami_core::matching::get_root;
///
/// assert_eq!(get_root("The Office").to_string(), "office");
/// assert_eq!(get_root("House, M.D.").to_string(), "house md");
/// assert_eq!(get_root("V (2009)").to_string(), "v 2009");
/// ```
#[must_use]
pub fn get_root(title: &str) -> ShowRoot {
    let mut tokens = root_tokens(title);
    if tokens.len() > 1 && ARTICLES.contains(&tokens[0].as_str()) {
        tokens.remove(0);
    }
    ShowRoot::from_tokens(tokens)
}

/// Root tokens without article stripping; used to search longer texts.
pub(crate) fn root_tokens(text: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\'' | '\u{2019}' | '\u{2018}' | '`' | '\u{02bc}' => {}
            '&' => cleaned.push_str(" and "),
            c if c.is_alphanumeric() => cleaned.extend(c.to_lowercase()),
            _ => cleaned.push(' '),
        }
    }

    let mut tokens = Vec::new();
    let mut letters = Vec::new();
    for word in cleaned.split_whitespace() {
        let mut chars = word.chars();
        let single_letter =
            chars.next().is_some_and(char::is_alphabetic) && chars.next().is_none();
        if single_letter {
            letters.push(word);
            continue;
        }
        flush_letters(&mut tokens, &mut letters);
        tokens.push(word.to_string());
    }
    flush_letters(&mut tokens, &mut letters);
    tokens
}

/// A run of two or more single letters is one acronym token.
fn flush_letters(tokens: &mut Vec<String>, letters: &mut Vec<&str>) {
    match letters.len() {
        0 => {}
        1 => tokens.push(letters[0].to_string()),
        _ => tokens.push(letters.concat()),
    }
    letters.clear();
}
