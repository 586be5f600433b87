//! Reusable form widget for the application's text, choice, and text area fields.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::word_counter::WordCounter;
use crate::model::{FieldKind, FieldSpec};

/// Text lines shown inside a text area box.
const TEXT_AREA_LINES: u16 = 5;

/// A single field within a [`Form`].
#[derive(Debug, Clone)]
pub struct FormField {
    /// Submission key.
    pub name: String,
    /// Display label shown as the field's title.
    pub label: String,
    pub kind: FieldKind,
    /// Current text value.
    pub value: String,
    /// Constraint error message, if any.
    pub error: Option<String>,
    /// Whether the field must be non-blank on submit.
    pub required: bool,
    /// Set by the submit check when a required field is blank.
    pub missing: bool,
    /// Live word counter for bounded text areas.
    pub counter: Option<WordCounter>,
}

impl FormField {
    /// Creates a field from its definition, attaching a word counter when it has a limit.
    pub fn from_spec(spec: &FieldSpec) -> Self {
        Self {
            name: spec.name.to_string(),
            label: spec.label.to_string(),
            kind: spec.kind,
            value: String::new(),
            error: None,
            required: spec.required,
            missing: false,
            counter: spec.word_limit().map(|limit| WordCounter::attach(limit, "")),
        }
    }

    /// Replaces the value and recounts words.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.refresh_counter();
    }

    /// Returns `true` for multi-line fields.
    pub fn is_multiline(&self) -> bool {
        matches!(self.kind, FieldKind::TextArea { .. })
    }

    /// Returns `true` if the value is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn refresh_counter(&mut self) {
        if let Some(counter) = self.counter.as_mut() {
            counter.update(&self.value);
        }
    }

    /// Rows this field occupies when drawn.
    fn height(&self) -> u16 {
        let body = if self.is_multiline() {
            TEXT_AREA_LINES + 2
        } else {
            3
        };
        let counter = self
            .counter
            .as_ref()
            .map_or(0, |c| c.lines().len() as u16);
        body + counter
    }
}

/// A multi-field form with focus management.
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<FormField>,
    focus: usize,
}

impl Form {
    /// Creates a new form with the given fields. Focus starts on the first field.
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    /// Creates a form from field definitions.
    pub fn from_specs(specs: &[FieldSpec]) -> Self {
        Self::new(specs.iter().map(FormField::from_spec).collect())
    }

    /// Returns the index of the currently focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Moves focus to `index`; out-of-range indices are ignored.
    pub fn set_focus(&mut self, index: usize) {
        if index < self.fields.len() {
            self.focus = index;
        }
    }

    /// Moves focus to the next field, wrapping around.
    pub fn focus_next(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + 1) % self.fields.len();
    }

    /// Moves focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Returns the focused field.
    pub fn focused_field(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    /// Types a character into the focused field. Returns `true` if the value changed.
    ///
    /// On a choice field the character selects the first option starting with it.
    pub fn insert_char(&mut self, ch: char) -> bool {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return false;
        };
        match field.kind {
            FieldKind::Choice(options) => {
                let wanted = ch.to_lowercase().next().unwrap_or(ch);
                let found = options.iter().find(|option| {
                    option
                        .chars()
                        .next()
                        .and_then(|c| c.to_lowercase().next())
                        == Some(wanted)
                });
                match found {
                    Some(option) if field.value != *option => {
                        field.set_value(*option);
                        true
                    }
                    _ => false,
                }
            }
            _ => {
                field.value.push(ch);
                field.refresh_counter();
                true
            }
        }
    }

    /// Deletes the last character of the focused field, or clears a choice.
    /// Returns `true` if the value changed.
    pub fn delete_char(&mut self) -> bool {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return false;
        };
        if field.value.is_empty() {
            return false;
        }
        match field.kind {
            FieldKind::Choice(_) => field.value.clear(),
            _ => {
                field.value.pop();
            }
        }
        field.refresh_counter();
        true
    }

    /// Steps a focused choice field through its options, wrapping around.
    /// Returns `true` if the value changed.
    pub fn cycle_choice(&mut self, forward: bool) -> bool {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return false;
        };
        let FieldKind::Choice(options) = field.kind else {
            return false;
        };
        if options.is_empty() {
            return false;
        }
        let next = match options.iter().position(|o| *o == field.value) {
            Some(i) if forward => (i + 1) % options.len(),
            Some(i) => (i + options.len() - 1) % options.len(),
            None if forward => 0,
            None => options.len() - 1,
        };
        field.set_value(options[next]);
        true
    }

    /// Sets the value of the field at `index`.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.set_value(value);
        }
    }

    /// Returns the value of the field at `index`, or an empty string if out of bounds.
    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    /// Returns the index of the field named `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns the field named `name`.
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns a reference to the fields.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Returns a mutable reference to the fields.
    pub fn fields_mut(&mut self) -> &mut [FormField] {
        &mut self.fields
    }

    /// Rows needed to draw every field without scrolling.
    pub fn height(&self) -> u16 {
        self.fields.iter().map(FormField::height).sum()
    }
}

/// Renders a form within the given area, scrolled so the focused field is visible.
///
/// `active` is `false` when another form on the same panel owns the cursor.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(form: &Form, active: bool, frame: &mut Frame, area: Rect) {
    let heights: Vec<u16> = form.fields.iter().map(FormField::height).collect();

    let mut start = 0;
    while start < form.focus
        && heights[start..=form.focus].iter().sum::<u16>() > area.height
    {
        start += 1;
    }

    let mut y = area.y;
    for (i, field) in form.fields.iter().enumerate().skip(start) {
        let height = heights[i];
        if y + height > area.y + area.height {
            break;
        }
        let row = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        draw_field(field, active && i == form.focus, frame, row);
        y += height;
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn draw_field(field: &FormField, is_focused: bool, frame: &mut Frame, area: Rect) {
    let border_color = if field.missing || field.error.is_some() {
        Color::Red
    } else if is_focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let label = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.clone()
    };

    let block = Block::default()
        .title(label)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let cursor = Span::styled(
        "\u{2588}",
        Style::default().add_modifier(Modifier::SLOW_BLINK),
    );
    let text: Vec<Line> = match field.kind {
        FieldKind::Choice(_) => {
            let shown = if field.value.is_empty() {
                Span::styled("< select >", Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(field.value.as_str())
            };
            let hint = if is_focused { "  \u{25c2} \u{25b8}" } else { "" };
            vec![Line::from(vec![shown, Span::raw(hint)])]
        }
        _ => {
            let mut lines: Vec<Line> = field.value.split('\n').map(Line::from).collect();
            if is_focused && let Some(last) = lines.last_mut() {
                last.spans.push(cursor);
            }
            lines
        }
    };

    let body_height = if field.is_multiline() {
        TEXT_AREA_LINES + 2
    } else {
        3
    };
    let body = Rect {
        height: body_height.min(area.height),
        ..area
    };
    let visible = body_height.saturating_sub(2);
    let scroll = (text.len() as u16).saturating_sub(visible);
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, body);

    if let Some(ref err) = field.error {
        let error_line = Paragraph::new(Span::styled(err, Style::default().fg(Color::Red)));
        // Overlaps the bottom border of the field box.
        let err_area = Rect {
            x: body.x + 2,
            y: body.y + body.height.saturating_sub(1),
            width: body.width.saturating_sub(4),
            height: 1,
        };
        frame.render_widget(error_line, err_area);
    }

    if let Some(counter) = &field.counter {
        let counter_area = Rect {
            x: area.x + 1,
            y: body.y + body.height,
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(body.height),
        };
        frame.render_widget(Paragraph::new(counter.lines()), counter_area);
    }
}
