//! Step controller: which panel of the form is showing.

/// Tracks the active step out of a fixed number of steps.
///
/// Invariant: `current < len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepController {
    current: usize,
    len: usize,
}

impl StepController {
    /// Creates a controller showing the first of `len` steps.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "a form needs at least one step");
        Self { current: 0, len }
    }

    /// Returns the active step index.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a controller owns at least one step.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the index of the last step.
    pub fn last(&self) -> usize {
        self.len - 1
    }

    /// Returns `true` if the last step is showing.
    pub fn on_last(&self) -> bool {
        self.current == self.last()
    }

    /// Returns `true` if step `index` is the active one.
    pub fn is_active(&self, index: usize) -> bool {
        index == self.current
    }

    /// Returns `true` if the progress indicator marks step `index` as reached.
    pub fn is_reached(&self, index: usize) -> bool {
        index <= self.current
    }

    /// Shows step `index`, clamped to the last step.
    pub fn show(&mut self, index: usize) {
        self.current = index.min(self.last());
    }

    /// Advances one step. Returns `false` (and does nothing) on the last step.
    pub fn next(&mut self) -> bool {
        if self.on_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Goes back one step. Returns `false` (and does nothing) on the first step.
    pub fn prev(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }
}
