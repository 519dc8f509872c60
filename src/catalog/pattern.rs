//! SQL `ILIKE` patterns: `%` matches any run, `_` one character, `\` escapes.

use std::fmt;

/// A case-insensitive `LIKE` pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern(String);

/// Escape the `LIKE` control characters of a literal.
pub fn escape_like(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    Literal(char),
    AnyOne,
    AnyRun,
}

impl LikePattern {
    /// Pattern from raw `LIKE` syntax.
    pub fn raw(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// `%literal%` with the literal escaped.
    pub fn contains(literal: &str) -> Self {
        Self::raw(format!("%{}%", escape_like(literal)))
    }

    fn pieces(&self) -> Vec<Piece> {
        let mut pieces = Vec::new();
        let mut chars = self.0.chars();
        while let Some(c) = chars.next() {
            let piece = match c {
                '\\' => Piece::Literal(chars.next().unwrap_or('\\')),
                '%' => Piece::AnyRun,
                '_' => Piece::AnyOne,
                c => Piece::Literal(c),
            };
            pieces.push(piece);
        }
        pieces
    }

    /// Case-insensitive match of the whole `text`.
    pub fn matches(&self, text: &str) -> bool {
        let pieces: Vec<Piece> = self
            .pieces()
            .into_iter()
            .map(|p| match p {
                Piece::Literal(c) => Piece::Literal(fold(c)),
                other => other,
            })
            .collect();
        let text: Vec<char> = text.chars().map(fold).collect();
        glob_match(&pieces, &text)
    }
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Iterative wildcard match with single-star backtracking.
fn glob_match(pattern: &[Piece], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(Piece::AnyRun) => {
                star = Some((p, t));
                p += 1;
            }
            Some(Piece::AnyOne) => {
                p += 1;
                t += 1;
            }
            Some(Piece::Literal(c)) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    star = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|piece| *piece == Piece::AnyRun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("din 933", "din 933")]
    #[case("100%", r"100\%")]
    #[case("a_b", r"a\_b")]
    #[case(r"c:\x", r"c:\\x")]
    fn test_escape(#[case] input: &str, #[case] expected: &str) {
        check!(escape_like(input) == expected);
    }

    #[rstest]
    #[case("%din 933%", "Болт DIN 933 M8", true)]
    #[case("%цинк%", "Гайка ЦИНК", true)]
    #[case("%цинк%", "Гайка", false)]
    #[case("m_", "M8", true)]
    #[case("m_", "M10", false)]
    #[case("%", "", true)]
    #[case("", "", true)]
    #[case("", "x", false)]
    #[case("a%b%c", "aXXbYYc", true)]
    #[case("a%b%c", "aXXbYY", false)]
    fn test_raw_matches(#[case] pattern: &str, #[case] text: &str, #[case] expected: bool) {
        check!(LikePattern::raw(pattern).matches(text) == expected);
    }

    #[test]
    fn test_escaped_wildcards_are_literal() {
        let pattern = LikePattern::contains("5_0%");
        check!(pattern.matches("Винт 5_0% скидка"));
        check!(!pattern.matches("Винт 5x0 скидка"));
        check!(!pattern.matches("Винт 5_0 скидка"));
    }
}
