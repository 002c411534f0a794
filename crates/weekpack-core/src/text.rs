//! Word wrapping and elision against a [`TextMeasure`]

use crate::font::TextMeasure;

/// Marker appended to elided text
pub const ELLIPSIS: &str = "...";

/// Wrap `text` into lines no wider than `max_width`.
///
/// Breaks on whitespace; a single word wider than the line is split by
/// characters. Explicit newlines start a new line. Never drops content.
#[must_use]
pub fn wrap_text(text: &str, max_width: f64, size: f64, measure: &impl TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if measure.text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if measure.text_width(word, size) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = split_word(word, max_width, size, measure);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Split an over-long word into pieces that each fit (at least one char each)
fn split_word(word: &str, max_width: f64, size: f64, measure: &impl TextMeasure) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if current.chars().count() > 1 && measure.text_width(&current, size) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Shorten `text` to fit `max_width`, ending in [`ELLIPSIS`] when cut.
#[must_use]
pub fn elide(text: &str, max_width: f64, size: f64, measure: &impl TextMeasure) -> String {
    if measure.text_width(text, size) <= max_width {
        return text.to_string();
    }
    let mut kept: Vec<char> = text.chars().collect();
    while !kept.is_empty() {
        kept.pop();
        let candidate = format!("{}{ELLIPSIS}", kept.iter().collect::<String>().trim_end());
        if measure.text_width(&candidate, size) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

/// Keep at most `max_lines` lines; if any were dropped, the last kept line
/// is elided so the cut is visible.
#[must_use]
pub fn fit_lines(
    mut lines: Vec<String>,
    max_lines: usize,
    max_width: f64,
    size: f64,
    measure: &impl TextMeasure,
) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines.max(1));
    if let Some(last) = lines.last_mut() {
        let marked = format!("{last}{ELLIPSIS}");
        *last = elide(&marked, max_width, size, measure);
        if !last.ends_with(ELLIPSIS) {
            last.push_str(ELLIPSIS);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is `size` points wide
    struct Mono;

    impl TextMeasure for Mono {
        fn text_width(&self, text: &str, size: f64) -> f64 {
            text.chars().count() as f64 * size
        }
    }

    #[test]
    fn test_wrap_on_words() {
        let lines = wrap_text("Coffee with Nora at the corner", 12.0, 1.0, &Mono);
        assert_eq!(lines, vec!["Coffee with", "Nora at the", "corner"]);
    }

    #[test]
    fn test_wrap_keeps_everything() {
        let text = "alpha beta gamma delta epsilon";
        let lines = wrap_text(text, 11.0, 1.0, &Mono);
        assert_eq!(lines.join(" "), text);
        assert!(lines.iter().all(|l| l.chars().count() <= 11));
    }

    #[test]
    fn test_wrap_splits_long_word() {
        let lines = wrap_text("abcdefghij", 4.0, 1.0, &Mono);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_respects_newlines() {
        let lines = wrap_text("one\ntwo", 100.0, 1.0, &Mono);
        assert_eq!(lines, vec!["one", "two"]);
        assert!(wrap_text("   ", 10.0, 1.0, &Mono).is_empty());
    }

    #[test]
    fn test_elide() {
        assert_eq!(elide("short", 10.0, 1.0, &Mono), "short");
        assert_eq!(elide("Quarterly planning", 10.0, 1.0, &Mono), "Quarter...");
        assert_eq!(elide("abc", 2.0, 1.0, &Mono), ELLIPSIS);
    }

    #[test]
    fn test_fit_lines_marks_cut() {
        let lines = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        let fitted = fit_lines(lines.clone(), 2, 20.0, 1.0, &Mono);
        assert_eq!(fitted, vec!["first".to_string(), "second...".to_string()]);
        assert_eq!(fit_lines(lines.clone(), 3, 20.0, 1.0, &Mono), lines);
    }

    #[test]
    fn test_fit_lines_zero_keeps_one_marked_line() {
        let lines = vec!["first".to_string(), "second".to_string()];
        let fitted = fit_lines(lines, 0, 20.0, 1.0, &Mono);
        assert_eq!(fitted, vec!["first...".to_string()]);
    }
}
