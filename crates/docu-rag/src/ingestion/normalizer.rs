//! Cleanup of extracted PDF text
//!
//! PDF extraction preserves the visual line structure of the page:
//! words get hyphenated across line breaks and every wrapped line ends
//! in a newline. Normalization undoes both so chunking sees continuous
//! prose, while keeping real paragraph breaks (blank lines) intact.
//! DOCX paragraphs arrive clean and never pass through here.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a word split across a line break by a hyphen
static HYPHEN_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)-\n(\w+)").unwrap());

/// Normalize one page of extracted PDF text.
///
/// Trims the page, rejoins hyphenated line-break splits, then collapses
/// soft line breaks into spaces. Idempotent: normalizing an already
/// normalized page returns it unchanged.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let dehyphenated = HYPHEN_BREAK.replace_all(trimmed, "$1$2");
    collapse_soft_breaks(&dehyphenated)
}

/// Replace every newline that is not part of a paragraph break with a
/// single space. A newline belongs to a paragraph break when another
/// newline sits next to it, with only horizontal whitespace in between.
fn collapse_soft_breaks(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == '\n' && !part_of_paragraph_break(&chars, i) {
            out.push(' ');
        } else {
            out.push(c);
        }
    }

    out
}

fn part_of_paragraph_break(chars: &[char], i: usize) -> bool {
    // Look backward, skipping horizontal whitespace
    let mut j = i;
    while j > 0 {
        j -= 1;
        match chars[j] {
            '\n' => return true,
            c if c.is_whitespace() => {}
            _ => break,
        }
    }

    // Look forward, skipping horizontal whitespace
    let mut j = i + 1;
    while j < chars.len() {
        match chars[j] {
            '\n' => return true,
            c if c.is_whitespace() => j += 1,
            _ => break,
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dehyphenation() {
        assert_eq!(normalize("informa-\ntion"), "information");
    }

    #[test]
    fn test_soft_break_collapse() {
        assert_eq!(normalize("the quick\nbrown fox"), "the quick brown fox");
    }

    #[test]
    fn test_paragraph_break_preserved() {
        assert_eq!(
            normalize("first paragraph\n\nsecond paragraph"),
            "first paragraph\n\nsecond paragraph"
        );
    }

    #[test]
    fn test_blank_line_with_spaces_is_a_paragraph_break() {
        assert_eq!(normalize("alpha\n \nbeta"), "alpha\n \nbeta");
    }

    #[test]
    fn test_leading_and_trailing_whitespace_trimmed() {
        assert_eq!(normalize("  body text \n"), "body text");
    }

    #[test]
    fn test_mixed_page() {
        let raw = "A sen-\ntence wrapped\nacross lines.\n\nNext paragraph\nalso wrapped.";
        assert_eq!(
            normalize(raw),
            "A sentence wrapped across lines.\n\nNext paragraph also wrapped."
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "informa-\ntion",
            "the quick\nbrown fox",
            "first\n\nsecond",
            "alpha\n \nbeta",
            "a\n\n\nb",
            "plain text with no breaks",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_hyphen_without_break_untouched() {
        assert_eq!(normalize("well-known fact"), "well-known fact");
    }
}
