use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use super::SaveEvent;

/// Default time a status message stays visible before reverting to idle.
pub const STATUS_DISPLAY: Duration = Duration::from_secs(5);

/// What the autosave indicator currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveStatus {
    Idle,
    Saving,
    Saved(DateTime<Local>),
    /// The server was reached but refused the draft.
    Failed,
    /// The request never completed.
    NetworkError,
}

impl AutosaveStatus {
    /// Returns the indicator text; empty when idle.
    pub fn text(&self) -> String {
        match self {
            Self::Idle => String::new(),
            Self::Saving => "Saving...".to_string(),
            Self::Saved(at) => format!("Last saved at {}", at.format("%H:%M")),
            Self::Failed => "Unable to save draft.".to_string(),
            Self::NetworkError => "Network error. Changes may not be saved.".to_string(),
        }
    }
}

/// The shared autosave indicator with its auto-clear deadline.
#[derive(Debug, Clone)]
pub struct StatusLine {
    status: AutosaveStatus,
    clear_at: Option<Instant>,
    display_for: Duration,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(STATUS_DISPLAY)
    }
}

impl StatusLine {
    /// Creates an idle indicator whose messages last `display_for`.
    pub fn new(display_for: Duration) -> Self {
        Self {
            status: AutosaveStatus::Idle,
            clear_at: None,
            display_for,
        }
    }

    /// Returns the current status.
    pub fn status(&self) -> AutosaveStatus {
        self.status
    }

    /// Applies an autosave event received at `now`. Later events overwrite earlier ones.
    pub fn apply(&mut self, event: SaveEvent, now: Instant) {
        let (status, clears) = match event {
            SaveEvent::Started => (AutosaveStatus::Saving, false),
            SaveEvent::Saved(at) => (AutosaveStatus::Saved(at), true),
            SaveEvent::Rejected => (AutosaveStatus::Failed, true),
            SaveEvent::NetworkError => (AutosaveStatus::NetworkError, true),
        };
        self.status = status;
        self.clear_at = clears.then(|| now + self.display_for);
    }

    /// Reverts to idle once the display duration has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.clear_at.is_some_and(|deadline| now >= deadline) {
            self.status = AutosaveStatus::Idle;
            self.clear_at = None;
        }
    }

    /// Returns the indicator text.
    pub fn text(&self) -> String {
        self.status.text()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ten_past_nine() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 9, 10, 0).unwrap()
    }

    #[test]
    fn starts_idle_and_blank() {
        let line = StatusLine::default();
        assert_eq!(line.status(), AutosaveStatus::Idle);
        assert_eq!(line.text(), "");
    }

    #[test]
    fn saving_text() {
        let mut line = StatusLine::default();
        line.apply(SaveEvent::Started, Instant::now());
        assert_eq!(line.text(), "Saving...");
    }

    #[test]
    fn saving_does_not_clear_on_its_own() {
        let mut line = StatusLine::default();
        let now = Instant::now();
        line.apply(SaveEvent::Started, now);
        line.tick(now + Duration::from_secs(60));
        assert_eq!(line.status(), AutosaveStatus::Saving);
    }

    #[test]
    fn saved_shows_local_time() {
        let mut line = StatusLine::default();
        line.apply(SaveEvent::Saved(ten_past_nine()), Instant::now());
        assert_eq!(line.text(), "Last saved at 09:10");
    }

    #[test]
    fn failure_texts() {
        let mut line = StatusLine::default();
        line.apply(SaveEvent::Rejected, Instant::now());
        assert_eq!(line.text(), "Unable to save draft.");
        line.apply(SaveEvent::NetworkError, Instant::now());
        assert_eq!(line.text(), "Network error. Changes may not be saved.");
    }

    #[test]
    fn clears_after_display_duration() {
        let mut line = StatusLine::new(Duration::from_secs(5));
        let now = Instant::now();
        line.apply(SaveEvent::NetworkError, now);
        line.tick(now + Duration::from_millis(4999));
        assert_eq!(line.status(), AutosaveStatus::NetworkError);
        line.tick(now + Duration::from_secs(5));
        assert_eq!(line.status(), AutosaveStatus::Idle);
    }

    #[test]
    fn new_save_cancels_pending_clear() {
        let mut line = StatusLine::new(Duration::from_secs(5));
        let now = Instant::now();
        line.apply(SaveEvent::Saved(ten_past_nine()), now);
        line.apply(SaveEvent::Started, now + Duration::from_secs(4));
        line.tick(now + Duration::from_secs(6));
        assert_eq!(line.status(), AutosaveStatus::Saving);
    }

    #[test]
    fn last_write_wins() {
        let mut line = StatusLine::default();
        let now = Instant::now();
        line.apply(SaveEvent::Saved(ten_past_nine()), now);
        line.apply(SaveEvent::Rejected, now);
        assert_eq!(line.status(), AutosaveStatus::Failed);
    }
}
