//! Live word count and over-limit warning attached to a text area.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::model::count_words;

/// Counter state for one bounded text area.
///
/// The count is advisory while typing; the submit-time check is what blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCounter {
    limit: usize,
    count: usize,
    warning: String,
    warning_visible: bool,
}

impl WordCounter {
    /// Creates a counter for `limit` and immediately counts `text`.
    pub fn attach(limit: usize, text: &str) -> Self {
        let mut counter = Self {
            limit,
            count: 0,
            warning: default_warning(limit),
            warning_visible: false,
        };
        counter.update(text);
        counter
    }

    /// Recounts after an edit and toggles the warning.
    pub fn update(&mut self, text: &str) {
        self.count = count_words(text);
        self.warning_visible = self.is_over();
        if self.warning_visible && self.warning.is_empty() {
            self.warning = default_warning(self.limit);
        }
    }

    /// Replaces the warning text with a submit-time message.
    pub fn set_warning(&mut self, text: String) {
        self.warning = text;
        self.warning_visible = self.is_over();
    }

    /// Clears the warning text.
    pub fn clear_warning(&mut self) {
        self.warning.clear();
        self.warning_visible = false;
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` when the count exceeds the limit.
    pub fn is_over(&self) -> bool {
        self.count > self.limit
    }

    /// Returns the counter text, e.g. `Words: 12 / 150`.
    pub fn counter_text(&self) -> String {
        format!("Words: {} / {}", self.count, self.limit)
    }

    pub fn warning_text(&self) -> &str {
        &self.warning
    }

    pub fn is_warning_visible(&self) -> bool {
        self.warning_visible
    }

    /// Lines to render under the text area: the counter, then the warning if shown.
    pub fn lines(&self) -> Vec<Line<'_>> {
        let mut lines = vec![Line::from(Span::styled(
            self.counter_text(),
            Style::default().fg(Color::Gray),
        ))];
        if self.warning_visible && !self.warning.is_empty() {
            lines.push(Line::from(Span::styled(
                self.warning.as_str(),
                Style::default().fg(Color::Red),
            )));
        }
        lines
    }
}

fn default_warning(limit: usize) -> String {
    format!("Max {limit} words allowed. Please shorten your text.")
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn attach_counts_initial_text() {
        let counter = WordCounter::attach(150, "three little words");
        assert_eq!(counter.count(), 3);
        assert_eq!(counter.counter_text(), "Words: 3 / 150");
        assert!(!counter.is_warning_visible());
    }

    #[test]
    fn attach_to_empty_text() {
        let counter = WordCounter::attach(50, "");
        assert_eq!(counter.counter_text(), "Words: 0 / 50");
    }

    #[test]
    fn at_limit_no_warning() {
        let counter = WordCounter::attach(3, "a b c");
        assert!(!counter.is_warning_visible());
    }

    #[test]
    fn over_limit_shows_default_warning() {
        let counter = WordCounter::attach(3, "a b c d");
        assert!(counter.is_warning_visible());
        assert_eq!(
            counter.warning_text(),
            "Max 3 words allowed. Please shorten your text."
        );
    }

    #[test]
    fn update_hides_warning_when_back_under() {
        let mut counter = WordCounter::attach(3, "a b c d");
        counter.update("a b");
        assert!(!counter.is_warning_visible());
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn set_warning_replaces_text() {
        let mut counter = WordCounter::attach(3, "a b c d");
        counter.set_warning("This essay has 4 words (limit: 3).".into());
        assert_eq!(counter.warning_text(), "This essay has 4 words (limit: 3).");
        assert!(counter.is_warning_visible());
    }

    #[test]
    fn cleared_warning_restored_when_over_again() {
        let mut counter = WordCounter::attach(3, "a");
        counter.clear_warning();
        assert_eq!(counter.warning_text(), "");
        counter.update("a b c d");
        assert!(counter.is_warning_visible());
        assert_eq!(
            counter.warning_text(),
            "Max 3 words allowed. Please shorten your text."
        );
    }

    #[test]
    fn lines_include_warning_only_when_visible() {
        assert_eq!(WordCounter::attach(3, "a").lines().len(), 1);
        assert_eq!(WordCounter::attach(3, "a b c d").lines().len(), 2);
    }

    #[quickcheck]
    fn warning_visible_iff_over_limit(words: u8, limit: u8) -> bool {
        let text = vec!["w"; usize::from(words)].join(" ");
        let counter = WordCounter::attach(usize::from(limit), &text);
        counter.counter_text() == format!("Words: {words} / {limit}")
            && counter.is_warning_visible() == (words > limit)
    }
}
