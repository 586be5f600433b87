//! Status bar widget: step progress on the left, autosave state on the right.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::steps::StepController;

/// Data passed to the status bar widget; decoupled from the form itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBarContext {
    /// Step titles in order.
    pub steps: Vec<&'static str>,
    /// Which step is showing.
    pub progress: StepController,
    /// Text of the autosave or submission indicator; empty when idle.
    pub status: String,
}

/// Builds the progress indicator: reached steps are highlighted, the active one underlined.
pub fn progress_line(ctx: &StatusBarContext) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, title) in ctx.steps.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }
        let style = if ctx.progress.is_active(i) {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else if ctx.progress.is_reached(i) {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{}. {title}", i + 1), style));
    }
    Line::from(spans)
}

/// Renders the one-line status bar.
#[mutants::skip]
pub fn draw_status_bar(ctx: &StatusBarContext, frame: &mut Frame, area: Rect) {
    let status_width = ctx.status.chars().count() as u16;
    let [progress_area, status_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(status_width)]).areas(area);

    frame.render_widget(Paragraph::new(progress_line(ctx)), progress_area);
    if !ctx.status.is_empty() {
        let status = Paragraph::new(Span::styled(
            ctx.status.clone(),
            Style::default().fg(Color::Green),
        ))
        .alignment(Alignment::Right);
        frame.render_widget(status, status_area);
    }
}
