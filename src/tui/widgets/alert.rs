//! Modal alert popup.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Renders `message` in a centered box over whatever is already drawn.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_alert(message: &str, frame: &mut Frame, area: Rect) {
    let width = (message.chars().count() as u16 + 6).clamp(30, area.width.max(30));
    let [row] = Layout::vertical([Constraint::Length(6)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    let block = Block::default()
        .title(" Alert ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let lines = vec![
        Line::from(message),
        Line::from(""),
        Line::from("Enter: OK").style(Style::default().fg(Color::DarkGray)),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}
