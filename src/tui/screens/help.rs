//! Help overlay: scrollable keybinding reference.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::action::Action;

static NAVIGATION_KEYS: &[(&str, &str)] = &[
    ("PgDn / Ctrl+N", "next step"),
    ("PgUp / Ctrl+P", "previous step"),
    ("Tab / Shift-Tab", "next / prev field"),
    ("Enter", "next field; new line in text areas"),
];

static EDITING_KEYS: &[(&str, &str)] = &[
    ("\u{2190} / \u{2192}", "change a choice"),
    ("Backspace", "delete; clears a choice"),
    ("\u{2191} / \u{2193}", "scroll the review"),
];

static ACTIVITY_KEYS: &[(&str, &str)] = &[
    ("Ctrl+A", "add activity (up to 5)"),
    ("Ctrl+D", "remove focused activity"),
];

static GLOBAL_KEYS: &[(&str, &str)] = &[
    ("Ctrl+S", "submit (from the Review step)"),
    ("F1", "toggle help"),
    ("Esc / Enter", "dismiss alert"),
    ("Ctrl+Q / Ctrl+C", "quit"),
];

/// State for the help overlay.
#[derive(Debug, Clone, Default)]
pub struct HelpState {
    scroll: u16,
}

impl HelpState {
    /// Creates a new [`HelpState`] scrolled to the top.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current scroll offset.
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Resets the scroll position to the top.
    pub fn reset(&mut self) {
        self.scroll = 0;
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                Action::None
            }
            KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                Action::None
            }
            KeyCode::Esc | KeyCode::F(1) => Action::ToggleHelp,
            _ => Action::None,
        }
    }
}

fn build_section(title: &'static str, keys: &[(&'static str, &'static str)]) -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Yellow);
    let dim_style = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(title, header_style)),
    ];
    for (key, desc) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<20}"), key_style),
            Span::styled(*desc, dim_style),
        ]));
    }
    lines
}

fn help_content() -> Vec<Line<'static>> {
    let mut lines = build_section("Navigation", NAVIGATION_KEYS);
    lines.extend(build_section("Editing", EDITING_KEYS));
    lines.extend(build_section("Activities", ACTIVITY_KEYS));
    lines.extend(build_section("General", GLOBAL_KEYS));
    lines
}

/// Renders the help overlay on top of the current step.
#[mutants::skip]
pub fn draw_help(state: &HelpState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let [content_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let content_lines = help_content();
    let total = content_lines.len() as u16;
    let height = content_area.height;
    let capped_scroll = state.scroll().min(total.saturating_sub(height));

    let paragraph = Paragraph::new(content_lines).scroll((capped_scroll, 0));
    frame.render_widget(paragraph, content_area);

    let footer =
        Paragraph::new("↑/↓: scroll  F1/Esc: close").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    mod handle_key {
        use super::*;

        #[test]
        fn up_decrements_scroll() {
            let mut state = HelpState::new();
            state.scroll = 5;
            let action = state.handle_key(press(KeyCode::Up));
            assert_eq!(action, Action::None);
            assert_eq!(state.scroll(), 4);
        }

        #[test]
        fn up_at_zero_saturates() {
            let mut state = HelpState::new();
            state.handle_key(press(KeyCode::Up));
            assert_eq!(state.scroll(), 0);
        }

        #[test]
        fn down_increments_scroll() {
            let mut state = HelpState::new();
            let action = state.handle_key(press(KeyCode::Down));
            assert_eq!(action, Action::None);
            assert_eq!(state.scroll(), 1);
        }

        #[test]
        fn esc_and_f1_close() {
            let mut state = HelpState::new();
            assert_eq!(state.handle_key(press(KeyCode::Esc)), Action::ToggleHelp);
            assert_eq!(state.handle_key(press(KeyCode::F(1))), Action::ToggleHelp);
        }

        #[test]
        fn other_keys_ignored() {
            let mut state = HelpState::new();
            assert_eq!(state.handle_key(press(KeyCode::Char('x'))), Action::None);
            assert_eq!(state.scroll(), 0);
        }
    }

    #[test]
    fn reset_sets_scroll_to_zero() {
        let mut state = HelpState::new();
        state.handle_key(press(KeyCode::Down));
        state.handle_key(press(KeyCode::Down));
        state.reset();
        assert_eq!(state.scroll(), 0);
    }

    #[test]
    fn content_lists_every_section() {
        let text: String = help_content()
            .into_iter()
            .flat_map(|l| l.spans.into_iter())
            .map(|s| s.content.into_owned())
            .collect();
        for section in ["Navigation", "Editing", "Activities", "General"] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(text.contains("Ctrl+S"));
    }

    mod rendering {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        use super::*;

        fn render_help(state: &HelpState, width: u16, height: u16) -> String {
            let backend = TestBackend::new(width, height);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| draw_help(state, frame, frame.area()))
                .unwrap();
            let buf = terminal.backend().buffer();
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        #[test]
        fn title_and_footer() {
            let output = render_help(&HelpState::new(), 80, 30);
            assert!(output.contains("Help"));
            assert!(output.contains("F1/Esc: close"));
        }

        #[test]
        fn scrolled_past_first_section() {
            let mut state = HelpState::new();
            state.scroll = 6;
            let output = render_help(&state, 80, 12);
            assert!(!output.contains("Navigation"));
            assert!(output.contains("Editing"));
        }
    }
}
