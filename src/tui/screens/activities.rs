//! Activity list manager: the repeatable activity sub-forms.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};

use crate::model::schema::{ACTIVITY_FIELDS, MAX_ACTIVITIES};
use crate::model::{ActivityEntry, FormData};
use crate::tui::widgets::form::{Form, draw_form};

/// Identifies one activity block for its lifetime, independent of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivityHandle(u64);

/// Refusals from the add and remove controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    #[error("You can only add up to {} activities.", MAX_ACTIVITIES)]
    CapReached,
    #[error("At least one activity is required.")]
    LastBlock,
}

/// One activity sub-form: type, position, organization, description.
#[derive(Debug, Clone)]
pub struct ActivityBlock {
    handle: ActivityHandle,
    form: Form,
}

impl ActivityBlock {
    pub fn handle(&self) -> ActivityHandle {
        self.handle
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Returns the block's current values.
    pub fn entry(&self) -> ActivityEntry {
        let f = &self.form;
        ActivityEntry::new(f.value(0), f.value(1), f.value(2), f.value(3))
    }
}

/// The ordered activity blocks (1 to [`MAX_ACTIVITIES`]) and the focused field among them.
#[derive(Debug, Clone)]
pub struct ActivityList {
    blocks: Vec<ActivityBlock>,
    next_id: u64,
    focus_block: usize,
}

impl Default for ActivityList {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityList {
    /// Creates a list holding one empty block.
    pub fn new() -> Self {
        let mut list = Self {
            blocks: Vec::new(),
            next_id: 0,
            focus_block: 0,
        };
        list.create_block(&ActivityEntry::default());
        list
    }

    /// Appends a block pre-filled from `entry`, with its own description word
    /// counter, and returns its handle. Does not check the cap.
    pub fn create_block(&mut self, entry: &ActivityEntry) -> ActivityHandle {
        let handle = ActivityHandle(self.next_id);
        self.next_id += 1;
        let mut form = Form::from_specs(ACTIVITY_FIELDS);
        for (i, value) in entry.values().into_iter().enumerate() {
            form.set_value(i, value);
        }
        self.blocks.push(ActivityBlock { handle, form });
        handle
    }

    /// Appends an empty block and focuses it.
    pub fn add(&mut self) -> Result<ActivityHandle, ActivityError> {
        if self.blocks.len() >= MAX_ACTIVITIES {
            return Err(ActivityError::CapReached);
        }
        let handle = self.create_block(&ActivityEntry::default());
        self.set_focus(self.blocks.len() - 1, 0);
        Ok(handle)
    }

    /// Removes exactly the block identified by `handle`. Unknown handles are ignored.
    pub fn remove(&mut self, handle: ActivityHandle) -> Result<(), ActivityError> {
        let Some(index) = self.blocks.iter().position(|b| b.handle == handle) else {
            return Ok(());
        };
        if self.blocks.len() == 1 {
            return Err(ActivityError::LastBlock);
        }
        self.blocks.remove(index);
        if self.focus_block > index || self.focus_block >= self.blocks.len() {
            self.focus_block = self.focus_block.saturating_sub(1);
        }
        Ok(())
    }

    /// Removes the block that holds the focus.
    pub fn remove_focused(&mut self) -> Result<(), ActivityError> {
        match self.blocks.get(self.focus_block) {
            Some(block) => self.remove(block.handle),
            None => Ok(()),
        }
    }

    /// Replaces every block with one per entry. An empty slice keeps the current blocks.
    ///
    /// Entries beyond [`MAX_ACTIVITIES`] are dropped.
    pub fn replace_with(&mut self, entries: &[ActivityEntry]) {
        if entries.is_empty() {
            return;
        }
        if entries.len() > MAX_ACTIVITIES {
            tracing::warn!(
                supplied = entries.len(),
                kept = MAX_ACTIVITIES,
                "too many pre-filled activities"
            );
        }
        self.blocks.clear();
        for entry in entries.iter().take(MAX_ACTIVITIES) {
            self.create_block(entry);
        }
        self.set_focus(0, 0);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[ActivityBlock] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [ActivityBlock] {
        &mut self.blocks
    }

    /// Returns the block with `handle`.
    pub fn block(&self, handle: ActivityHandle) -> Option<&ActivityBlock> {
        self.blocks.iter().find(|b| b.handle == handle)
    }

    /// Returns `(block index, field index)` of the focused field.
    pub fn focus(&self) -> (usize, usize) {
        let field = self
            .blocks
            .get(self.focus_block)
            .map_or(0, |b| b.form.focus());
        (self.focus_block, field)
    }

    /// Focuses `field` of block `block`; out-of-range positions are ignored.
    pub fn set_focus(&mut self, block: usize, field: usize) {
        if let Some(b) = self.blocks.get_mut(block) {
            b.form.set_focus(field);
            self.focus_block = block;
        }
    }

    /// Moves to the next field, continuing into the next block and wrapping at the end.
    pub fn focus_next(&mut self) {
        let (block, field) = self.focus();
        if field + 1 < ACTIVITY_FIELDS.len() {
            self.set_focus(block, field + 1);
        } else {
            self.set_focus((block + 1) % self.blocks.len().max(1), 0);
        }
    }

    /// Moves to the previous field, continuing into the previous block and wrapping.
    pub fn focus_prev(&mut self) {
        let (block, field) = self.focus();
        if field > 0 {
            self.set_focus(block, field - 1);
        } else {
            let count = self.blocks.len().max(1);
            self.set_focus((block + count - 1) % count, ACTIVITY_FIELDS.len() - 1);
        }
    }

    /// Returns the form of the focused block.
    pub fn focused_form_mut(&mut self) -> Option<&mut Form> {
        self.blocks.get_mut(self.focus_block).map(|b| &mut b.form)
    }

    /// Returns the form of the focused block.
    pub fn focused_form(&self) -> Option<&Form> {
        self.blocks.get(self.focus_block).map(|b| &b.form)
    }

    /// Appends the four repeated fields of every block, in block order.
    pub fn push_form_data(&self, data: &mut FormData) {
        for block in &self.blocks {
            for field in block.form.fields() {
                data.push(field.name.clone(), field.value.clone());
            }
        }
    }
}

/// Renders the blocks, starting from the focused one.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_activities(list: &ActivityList, frame: &mut Frame, area: Rect) {
    let (focus_block, _) = list.focus();
    let mut y = area.y;
    let bottom = area.y + area.height;
    for (i, block) in list.blocks().iter().enumerate().skip(focus_block) {
        let remaining = bottom.saturating_sub(y);
        if remaining < 5 {
            break;
        }
        let height = (block.form().height() + 2).min(remaining);
        let rect = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        let is_focused = i == focus_block;
        let frame_block = Block::default()
            .title(format!(" Activity {} of {} ", i + 1, list.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if is_focused {
                Color::Cyan
            } else {
                Color::DarkGray
            }));
        let inner = frame_block.inner(rect);
        frame.render_widget(frame_block, rect);
        draw_form(block.form(), is_focused, frame, inner);
        y += height;
    }
}
