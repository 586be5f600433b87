//! Application screen: the multi-step form, one panel per step.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::draft::Prefill;
use crate::model::schema::{STEPS, StepContent};
use crate::model::{FormData, Review};
use crate::tui::action::Action;
use crate::tui::screens::activities::{ActivityList, draw_activities};
use crate::tui::steps::StepController;
use crate::tui::widgets::form::{Form, FormField, draw_form};

/// Where a field lives: its step, its activity block (if repeated), and its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLocation {
    pub step: usize,
    pub block: Option<usize>,
    pub index: usize,
}

/// Contents of one step.
#[derive(Debug, Clone)]
pub enum Panel {
    Fields(Form),
    Activities(ActivityList),
    Review { review: Option<Review>, scroll: u16 },
}

/// The whole form: every panel's widgets plus which one is showing.
///
/// The widgets are the single source of truth for field values; snapshots are
/// taken with [`ApplicationForm::form_data`].
#[derive(Debug, Clone)]
pub struct ApplicationForm {
    steps: StepController,
    panels: Vec<Panel>,
}

impl Default for ApplicationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationForm {
    /// Creates an empty form on the first step with one empty activity block.
    pub fn new() -> Self {
        let panels = STEPS
            .iter()
            .map(|step| match step.content {
                StepContent::Fields(specs) => Panel::Fields(Form::from_specs(specs)),
                StepContent::Activities => Panel::Activities(ActivityList::new()),
                StepContent::Review => Panel::Review {
                    review: None,
                    scroll: 0,
                },
            })
            .collect();
        Self {
            steps: StepController::new(STEPS.len()),
            panels,
        }
    }

    /// Creates a form restored from a prior draft.
    pub fn with_prefill(prefill: &Prefill) -> Self {
        let mut form = Self::new();
        form.apply_prefill(prefill);
        form
    }

    /// Copies draft values into the widgets. Unknown field names are skipped.
    pub fn apply_prefill(&mut self, prefill: &Prefill) {
        for (name, value) in &prefill.fields {
            if !self.set_field(name, value.as_str()) {
                tracing::warn!(field = %name, "ignoring unknown pre-fill field");
            }
        }
        if let Some(list) = self.activities_mut() {
            list.replace_with(&prefill.activities);
        }
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('n') => {
                    self.next_step();
                    Action::None
                }
                KeyCode::Char('p') => {
                    self.prev_step();
                    Action::None
                }
                KeyCode::Char('s') => Action::Submit,
                KeyCode::Char('a') => self.add_activity(),
                KeyCode::Char('d') => self.remove_activity(),
                KeyCode::Char('q') | KeyCode::Char('c') => Action::Quit,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::F(1) => Action::ToggleHelp,
            KeyCode::PageDown => {
                self.next_step();
                Action::None
            }
            KeyCode::PageUp => {
                self.prev_step();
                Action::None
            }
            KeyCode::Tab => {
                self.focus_next();
                Action::None
            }
            KeyCode::BackTab => {
                self.focus_prev();
                Action::None
            }
            KeyCode::Up => {
                self.scroll_review(false);
                Action::None
            }
            KeyCode::Down => {
                self.scroll_review(true);
                Action::None
            }
            KeyCode::Left => self.edit(|form| form.cycle_choice(false)),
            KeyCode::Right => self.edit(|form| form.cycle_choice(true)),
            KeyCode::Backspace => self.edit(Form::delete_char),
            KeyCode::Enter => {
                if self.focused_field().is_some_and(FormField::is_multiline) {
                    self.edit(|form| form.insert_char('\n'))
                } else {
                    self.focus_next();
                    Action::None
                }
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) => {
                self.edit(|form| form.insert_char(ch))
            }
            _ => Action::None,
        }
    }

    /// Returns the step controller.
    pub fn steps(&self) -> &StepController {
        &self.steps
    }

    /// Returns the titles of every step, in order.
    pub fn step_titles(&self) -> Vec<&'static str> {
        STEPS.iter().map(|s| s.title).collect()
    }

    /// Returns the panel for the active step.
    pub fn current_panel(&self) -> Option<&Panel> {
        self.panels.get(self.steps.current())
    }

    /// Shows step `index`; arriving at the last step rebuilds the review.
    pub fn show_step(&mut self, index: usize) {
        self.steps.show(index);
        if self.steps.on_last() {
            self.render_review();
        }
    }

    /// Advances one step. Returns `false` on the last step.
    pub fn next_step(&mut self) -> bool {
        let moved = self.steps.next();
        if moved && self.steps.on_last() {
            self.render_review();
        }
        moved
    }

    /// Goes back one step. Returns `false` on the first step.
    pub fn prev_step(&mut self) -> bool {
        self.steps.prev()
    }

    /// Snapshot of every field in document order, activity fields once per block.
    pub fn form_data(&self) -> FormData {
        let mut data = FormData::new();
        for panel in &self.panels {
            match panel {
                Panel::Fields(form) => {
                    for field in form.fields() {
                        data.push(field.name.clone(), field.value.clone());
                    }
                }
                Panel::Activities(list) => list.push_form_data(&mut data),
                Panel::Review { .. } => {}
            }
        }
        data
    }

    /// Returns the last rendered review, if the last step has been shown.
    pub fn review(&self) -> Option<&Review> {
        self.panels.iter().find_map(|p| match p {
            Panel::Review { review, .. } => review.as_ref(),
            _ => None,
        })
    }

    pub fn activities(&self) -> Option<&ActivityList> {
        self.panels.iter().find_map(|p| match p {
            Panel::Activities(list) => Some(list),
            _ => None,
        })
    }

    pub fn activities_mut(&mut self) -> Option<&mut ActivityList> {
        self.panels.iter_mut().find_map(|p| match p {
            Panel::Activities(list) => Some(list),
            _ => None,
        })
    }

    /// Looks up a non-repeated field by name.
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.panels.iter().find_map(|p| match p {
            Panel::Fields(form) => form.field(name),
            _ => None,
        })
    }

    /// Sets a non-repeated field by name. Returns `false` if there is no such field.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        for panel in &mut self.panels {
            if let Panel::Fields(form) = panel
                && let Some(index) = form.index_of(name)
            {
                form.set_value(index, value);
                return true;
            }
        }
        false
    }

    /// Every field with its location, in document order.
    pub fn fields(&self) -> Vec<(FieldLocation, &FormField)> {
        let mut out = Vec::new();
        for (step, panel) in self.panels.iter().enumerate() {
            match panel {
                Panel::Fields(form) => {
                    out.extend(form.fields().iter().enumerate().map(move |(index, f)| {
                        let loc = FieldLocation {
                            step,
                            block: None,
                            index,
                        };
                        (loc, f)
                    }));
                }
                Panel::Activities(list) => {
                    for (block, b) in list.blocks().iter().enumerate() {
                        out.extend(b.form().fields().iter().enumerate().map(
                            move |(index, f)| {
                                let loc = FieldLocation {
                                    step,
                                    block: Some(block),
                                    index,
                                };
                                (loc, f)
                            },
                        ));
                    }
                }
                Panel::Review { .. } => {}
            }
        }
        out
    }

    /// Every field with its location, in document order, for in-place updates.
    pub fn fields_mut(&mut self) -> Vec<(FieldLocation, &mut FormField)> {
        let mut out = Vec::new();
        for (step, panel) in self.panels.iter_mut().enumerate() {
            match panel {
                Panel::Fields(form) => {
                    out.extend(form.fields_mut().iter_mut().enumerate().map(
                        move |(index, f)| {
                            let loc = FieldLocation {
                                step,
                                block: None,
                                index,
                            };
                            (loc, f)
                        },
                    ));
                }
                Panel::Activities(list) => {
                    for (block, b) in list.blocks_mut().iter_mut().enumerate() {
                        out.extend(b.form_mut().fields_mut().iter_mut().enumerate().map(
                            move |(index, f)| {
                                let loc = FieldLocation {
                                    step,
                                    block: Some(block),
                                    index,
                                };
                                (loc, f)
                            },
                        ));
                    }
                }
                Panel::Review { .. } => {}
            }
        }
        out
    }

    /// Shows the field's step and gives it focus.
    pub fn focus_location(&mut self, loc: FieldLocation) {
        self.show_step(loc.step);
        match (self.panels.get_mut(loc.step), loc.block) {
            (Some(Panel::Fields(form)), None) => form.set_focus(loc.index),
            (Some(Panel::Activities(list)), Some(block)) => list.set_focus(block, loc.index),
            _ => {}
        }
    }

    /// Location of the focused field on the active step.
    pub fn focused_location(&self) -> Option<FieldLocation> {
        let step = self.steps.current();
        match self.panels.get(step)? {
            Panel::Fields(form) => Some(FieldLocation {
                step,
                block: None,
                index: form.focus(),
            }),
            Panel::Activities(list) => {
                let (block, index) = list.focus();
                Some(FieldLocation {
                    step,
                    block: Some(block),
                    index,
                })
            }
            Panel::Review { .. } => None,
        }
    }

    /// The focused field on the active step.
    pub fn focused_field(&self) -> Option<&FormField> {
        match self.current_panel()? {
            Panel::Fields(form) => form.focused_field(),
            Panel::Activities(list) => list.focused_form()?.focused_field(),
            Panel::Review { .. } => None,
        }
    }

    fn focused_form_mut(&mut self) -> Option<&mut Form> {
        match self.panels.get_mut(self.steps.current())? {
            Panel::Fields(form) => Some(form),
            Panel::Activities(list) => list.focused_form_mut(),
            Panel::Review { .. } => None,
        }
    }

    fn edit(&mut self, f: impl FnOnce(&mut Form) -> bool) -> Action {
        if self.focused_form_mut().is_some_and(f) {
            Action::Edited
        } else {
            Action::None
        }
    }

    fn focus_next(&mut self) {
        match self.panels.get_mut(self.steps.current()) {
            Some(Panel::Fields(form)) => form.focus_next(),
            Some(Panel::Activities(list)) => list.focus_next(),
            _ => {}
        }
    }

    fn focus_prev(&mut self) {
        match self.panels.get_mut(self.steps.current()) {
            Some(Panel::Fields(form)) => form.focus_prev(),
            Some(Panel::Activities(list)) => list.focus_prev(),
            _ => {}
        }
    }

    fn add_activity(&mut self) -> Action {
        let step = self.steps.current();
        let Some(Panel::Activities(list)) = self.panels.get_mut(step) else {
            return Action::None;
        };
        match list.add() {
            Ok(_) => Action::Edited,
            Err(e) => Action::Alert(e.to_string()),
        }
    }

    fn remove_activity(&mut self) -> Action {
        let step = self.steps.current();
        let Some(Panel::Activities(list)) = self.panels.get_mut(step) else {
            return Action::None;
        };
        match list.remove_focused() {
            Ok(()) => Action::Edited,
            Err(e) => Action::Alert(e.to_string()),
        }
    }

    fn scroll_review(&mut self, down: bool) {
        let step = self.steps.current();
        if let Some(Panel::Review { scroll, .. }) = self.panels.get_mut(step) {
            *scroll = if down {
                scroll.saturating_add(1)
            } else {
                scroll.saturating_sub(1)
            };
        }
    }

    fn render_review(&mut self) {
        let data = self.form_data();
        for panel in &mut self.panels {
            if let Panel::Review { review, scroll } = panel {
                *review = Some(Review::from_form_data(&data));
                *scroll = 0;
            }
        }
    }
}

/// Renders the active step inside a titled frame with a key hint footer.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_application(form: &ApplicationForm, frame: &mut Frame, area: Rect) {
    let steps = form.steps();
    let title = STEPS.get(steps.current()).map_or("", |s| s.title);
    let block = Block::default()
        .title(format!(
            " Step {} of {}: {title} ",
            steps.current() + 1,
            steps.len()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [content, footer] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let hint = match form.current_panel() {
        Some(Panel::Fields(f)) => {
            draw_form(f, true, frame, content);
            "Tab: next field  PgDn/PgUp: next/prev step  Ctrl+S: submit  F1: help"
        }
        Some(Panel::Activities(list)) => {
            draw_activities(list, frame, content);
            "Ctrl+A: add activity  Ctrl+D: remove activity  PgDn/PgUp: step  F1: help"
        }
        Some(Panel::Review { review, scroll }) => {
            draw_review(review.as_ref(), *scroll, frame, content);
            "\u{2191}/\u{2193}: scroll  PgUp: back  Ctrl+S: submit  F1: help"
        }
        None => "",
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        footer,
    );
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn draw_review(review: Option<&Review>, scroll: u16, frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = match review {
        Some(r) => r.lines().into_iter().map(Line::from).collect(),
        None => Vec::new(),
    };
    let max_scroll = (lines.len() as u16).saturating_sub(area.height);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, area);
}
