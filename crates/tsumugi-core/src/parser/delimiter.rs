//! # Join-Phrase Scanner
//!
//! Finds the delimiters that separate artists inside a credit string.
//!
//! The grammar, matched case-insensitively, with every alternative absorbing
//! the whitespace run directly before and after it:
//!
//! ```text
//! cv-open     := "(CV" ["." | ":" | "：" | " "]
//! cv-close    := ")" \s* ["," | "，" | "、" | "・"]
//! conjunction := \s ("featuring" | "feat" | "ft" | "vs") ("." | \s)
//! separator   := "," | "，" | "、" | "&" | "・"
//! ```
//!
//! Matches are leftmost and non-overlapping; at a given start the first
//! alternative above that matches wins. `\s` is the ECMAScript whitespace
//! class: it includes U+FEFF and excludes U+0085.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Opening of a character voice credit, matched case-insensitively.
const CV_OPEN: &str = "(cv";

/// Optional glyph directly after the CV opener.
const CV_OPEN_SUFFIXES: &[char] = &['.', ':', '：', ' '];

/// Optional separator glyph after a closing paren.
const CV_CLOSE_SUFFIXES: &[char] = &[',', '，', '、', '・'];

/// Conjunction words, longest first so "featuring" beats "feat".
const CONJUNCTIONS: &[&str] = &["featuring", "feat", "ft", "vs"];

/// Bare separator glyphs.
const SEPARATORS: &[char] = &[',', '，', '、', '&', '・'];

/// Characters matched by `\s`.
const WHITESPACE: &[char] = &[
    '\t', '\n', '\u{b}', '\u{c}', '\r', ' ', '\u{a0}', '\u{1680}', '\u{2000}', '\u{2001}',
    '\u{2002}', '\u{2003}', '\u{2004}', '\u{2005}', '\u{2006}', '\u{2007}', '\u{2008}',
    '\u{2009}', '\u{200a}', '\u{2028}', '\u{2029}', '\u{202f}', '\u{205f}', '\u{3000}',
    '\u{feff}',
];

/// Which grammar rule produced a delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelimiterKind {
    /// `(CV.`, `(CV:`, `(cv ` and friends.
    CvOpen,
    /// `)` optionally followed by a separator glyph.
    CvClose,
    /// ` feat. `, ` ft `, ` vs. `, ` featuring `.
    Conjunction,
    /// `,`, `，`, `、`, `&`, `・`.
    Separator,
}

/// A delimiter match inside a credit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter {
    /// Rule that matched.
    pub kind: DelimiterKind,
    /// Byte offset of the first matched byte, surrounding whitespace included.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
}

impl Delimiter {
    /// Byte range of the match.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The matched text, i.e. the join phrase.
    ///
    /// `input` must be the string the delimiter was scanned from.
    #[must_use]
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.span()]
    }
}

/// Scans `input` for every join-phrase delimiter, left to right.
///
/// # Examples
/// ```
/// use tsumugi_core::parser::delimiter::{scan_delimiters, DelimiterKind};
///
/// let input = "A feat. B";
/// let found = scan_delimiters(input);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].kind, DelimiterKind::Conjunction);
/// assert_eq!(found[0].text(input), " feat. ");
/// ```
#[must_use]
pub fn scan_delimiters(input: &str) -> Vec<Delimiter> {
    let mut found = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let body = skip_whitespace(input, pos);
        match match_body(input, pos, body) {
            Some((kind, body_end)) => {
                let end = skip_whitespace(input, body_end);
                found.push(Delimiter {
                    kind,
                    start: pos,
                    end,
                });
                pos = end;
            }
            // Every start inside the same whitespace run sees the same body,
            // so the whole run can be skipped at once.
            None if body > pos => pos = body,
            None => pos = next_boundary(input, pos),
        }
    }

    found
}

/// Tries every rule at `body`, the first non-whitespace offset at or after
/// `run_start`. Returns the rule and the offset just past its body.
fn match_body(input: &str, run_start: usize, body: usize) -> Option<(DelimiterKind, usize)> {
    let rest = &input[body..];
    let first = rest.chars().next()?;

    if starts_with_ignore_ascii_case(rest, CV_OPEN) {
        let mut end = body + CV_OPEN.len();
        if let Some(c) = input[end..].chars().next().filter(|c| CV_OPEN_SUFFIXES.contains(c)) {
            end += c.len_utf8();
        }
        return Some((DelimiterKind::CvOpen, end));
    }

    if first == ')' {
        let after = skip_whitespace(input, body + 1);
        let end = match input[after..].chars().next() {
            Some(c) if CV_CLOSE_SUFFIXES.contains(&c) => after + c.len_utf8(),
            _ => body + 1,
        };
        return Some((DelimiterKind::CvClose, end));
    }

    // A conjunction needs at least one whitespace character in front of it.
    if body > run_start {
        for word in CONJUNCTIONS {
            if !starts_with_ignore_ascii_case(rest, word) {
                continue;
            }
            let after = body + word.len();
            if let Some(c) = input[after..]
                .chars()
                .next()
                .filter(|c| *c == '.' || is_whitespace(*c))
            {
                return Some((DelimiterKind::Conjunction, after + c.len_utf8()));
            }
        }
    }

    if SEPARATORS.contains(&first) {
        return Some((DelimiterKind::Separator, body + first.len_utf8()));
    }

    None
}

fn starts_with_ignore_ascii_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Offset of the first non-whitespace character at or after `from`.
fn skip_whitespace(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|(_, c)| !is_whitespace(*c))
        .map_or(input.len(), |(idx, _)| from + idx)
}

fn is_whitespace(c: char) -> bool {
    WHITESPACE.contains(&c)
}

fn next_boundary(input: &str, from: usize) -> usize {
    from + input[from..].chars().next().map_or(1, char::len_utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        scan_delimiters(input)
            .iter()
            .map(|d| d.text(input))
            .collect()
    }

    fn kinds(input: &str) -> Vec<DelimiterKind> {
        scan_delimiters(input).iter().map(|d| d.kind).collect()
    }

    #[test]
    fn scan_cv_credits() {
        assert_eq!(texts("A(CV.B), C(CV.D)"), vec!["(CV.", "), ", "(CV.", ")"]);
        assert_eq!(
            kinds("A(CV.B), C(CV.D)"),
            vec![
                DelimiterKind::CvOpen,
                DelimiterKind::CvClose,
                DelimiterKind::CvOpen,
                DelimiterKind::CvClose,
            ]
        );
    }

    #[test]
    fn scan_cv_opener_variants() {
        assert_eq!(texts("A (CV: B)"), vec![" (CV: ", ")"]);
        assert_eq!(texts("A（x）(CV：B)"), vec!["(CV：", ")"]);
        assert_eq!(texts("A (cv B)"), vec![" (cv ", ")"]);
        assert_eq!(texts("A(CVB)"), vec!["(CV", ")"]);
    }

    #[test]
    fn scan_cv_close_with_separator() {
        assert_eq!(texts("A(CV.B)・C"), vec!["(CV.", ")・"]);
        assert_eq!(texts("A(CV.B) 、 C"), vec!["(CV.", ") 、 "]);
        assert_eq!(texts("A(CV.B) C"), vec!["(CV.", ") "]);
    }

    #[test]
    fn scan_conjunctions() {
        assert_eq!(texts("A vs. B feat. C"), vec![" vs. ", " feat. "]);
        assert_eq!(texts("A featuring B"), vec![" featuring "]);
        assert_eq!(texts("A FT. B"), vec![" FT. "]);
        assert_eq!(texts("A ft B"), vec![" ft "]);
        assert_eq!(texts("A feat.B"), vec![" feat."]);
    }

    #[test]
    fn conjunction_requires_boundaries() {
        // No whitespace before the word.
        assert!(texts("Aft. B").is_empty());
        // Word continues past the conjunction.
        assert!(texts("A feature B").is_empty());
        assert!(texts("A vsB").is_empty());
        // Whitespace consumed by a preceding separator does not count.
        assert_eq!(texts("A, feat. B"), vec![", "]);
    }

    #[test]
    fn scan_separators() {
        assert_eq!(texts("A, B & C"), vec![", ", " & "]);
        assert_eq!(texts("A、B・C，D"), vec!["、", "・", "，"]);
        assert_eq!(texts("A,,B"), vec![",", ","]);
    }

    #[test]
    fn scan_absorbs_whitespace_runs() {
        let input = "A   &   B";
        let found = scan_delimiters(input);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span(), 1..8);
        assert_eq!(texts("A\u{3000}feat.\u{3000}B"), vec!["\u{3000}feat.\u{3000}"]);
    }

    #[test]
    fn byte_order_mark_counts_as_whitespace() {
        assert_eq!(texts("A\u{feff}&\u{feff}B"), vec!["\u{feff}&\u{feff}"]);
        assert_eq!(texts("A\u{feff}feat.\u{feff}B"), vec!["\u{feff}feat.\u{feff}"]);
    }

    #[test]
    fn next_line_is_not_whitespace() {
        assert_eq!(texts("A\u{85}&\u{85}B"), vec!["&"]);
        assert!(scan_delimiters("A\u{85}feat. B").is_empty());
    }

    #[test]
    fn scan_without_delimiters() {
        assert!(scan_delimiters("").is_empty());
        assert!(scan_delimiters("Plain Artist Name").is_empty());
        assert!(scan_delimiters("   ").is_empty());
    }

    #[test]
    fn spans_are_contiguous_with_gaps_between() {
        let input = "A(CV.B), C feat. D & E";
        let found = scan_delimiters(input);
        for pair in found.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert!(found.iter().all(|d| d.start < d.end));
    }
}
