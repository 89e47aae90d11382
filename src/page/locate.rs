//! Span location
//!
//! Finds an externally supplied phrase inside a reconciled page. The
//! normalized policy folds case and whitespace before comparing, and
//! normalization can change string length, so the search runs against an
//! index-preserving form: every byte pushed to the normalized string
//! records the flat-text char offset it came from, and a hit translates
//! exactly back to original offsets.

use super::reconcile::ReconciledPage;

/// Character range in a page's flat text matching an external phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub char_start: usize,
    pub char_end: usize,
}

impl MatchSpan {
    pub fn is_empty(&self) -> bool {
        self.char_start >= self.char_end
    }
}

/// How the locator compares the phrase against the page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Case-sensitive substring of the flat text as-is.
    Exact,
    /// Case-folded, whitespace-collapsed comparison.
    #[default]
    Normalized,
}

/// Locator options.
#[derive(Debug, Clone, Default)]
pub struct LocateOptions {
    pub policy: MatchPolicy,
    /// Strip clause-index tokens (a single letter followed by a period,
    /// or a bare period) before comparing. A heuristic for documents
    /// that intersperse clause numbering with prose; off by default.
    pub strip_index_markers: bool,
}

/// Find the first occurrence of `phrase` in the page's flat text.
///
/// Returns `None` both for an empty/blank phrase (malformed input is a
/// no-op) and for a phrase that does not occur (a valid outcome, not an
/// error). Ties break to the lowest start offset.
pub fn locate(page: &ReconciledPage, phrase: &str, options: &LocateOptions) -> Option<MatchSpan> {
    if phrase.trim().is_empty() || page.flat_text.is_empty() {
        return None;
    }

    match options.policy {
        MatchPolicy::Exact => locate_exact(page, phrase),
        MatchPolicy::Normalized => locate_normalized(page, phrase, options.strip_index_markers),
    }
}

fn locate_exact(page: &ReconciledPage, phrase: &str) -> Option<MatchSpan> {
    let byte_start = page.flat_text.find(phrase)?;
    let char_start = page.flat_text[..byte_start].chars().count();
    Some(MatchSpan {
        char_start,
        char_end: char_start + phrase.chars().count(),
    })
}

fn locate_normalized(page: &ReconciledPage, phrase: &str, strip_markers: bool) -> Option<MatchSpan> {
    let haystack = NormalizedText::build(&page.flat_text, strip_markers);
    let needle = NormalizedText::build(phrase, strip_markers);
    if needle.text.is_empty() {
        return None;
    }

    let start = haystack.text.find(&needle.text)?;
    let end = start + needle.text.len();
    Some(MatchSpan {
        char_start: haystack.origin[start],
        char_end: haystack.origin[end - 1] + 1,
    })
}

/// Normalized comparison form plus, per normalized byte, the char offset
/// of the source character it was derived from.
struct NormalizedText {
    text: String,
    origin: Vec<usize>,
}

impl NormalizedText {
    fn build(source: &str, strip_markers: bool) -> Self {
        // Tokenize on whitespace, lowercasing per char and keeping the
        // source char offset of every folded char.
        let mut tokens: Vec<Vec<(char, usize)>> = Vec::new();
        let mut current: Vec<(char, usize)> = Vec::new();
        for (offset, ch) in source.chars().enumerate() {
            if ch.is_whitespace() {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            } else {
                for folded in ch.to_lowercase() {
                    current.push((folded, offset));
                }
            }
        }
        if !current.is_empty() {
            tokens.push(current);
        }

        if strip_markers {
            tokens.retain(|token| !is_index_marker(token));
        }

        // Join with single spaces. A separator maps to the following
        // token's first char so a hit can never start or end on a
        // position with no source anchor.
        let mut text = String::new();
        let mut origin = Vec::new();
        for token in &tokens {
            if !text.is_empty() {
                text.push(' ');
                origin.push(token[0].1);
            }
            for &(ch, offset) in token {
                let before = text.len();
                text.push(ch);
                origin.extend(std::iter::repeat(offset).take(text.len() - before));
            }
        }

        Self { text, origin }
    }
}

fn is_index_marker(token: &[(char, usize)]) -> bool {
    match token {
        [(letter, _), ('.', _)] => letter.is_alphabetic(),
        [('.', _)] => true,
        _ => false,
    }
}
