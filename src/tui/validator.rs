//! Submit-time checks over the whole form.
//!
//! Runs the checks in a fixed order and stops at the first that blocks:
//! required fields, the grade report upload, the last-step gate, word limits
//! (recounted but reported last), then field constraints.

use crate::model::check_constraint;
use crate::model::schema::GRADE_REPORT;
use crate::tui::screens::application::ApplicationForm;

pub const MISSING_REQUIRED: &str = "Please complete all required fields highlighted in red.";
pub const MISSING_GRADE_REPORT: &str = "Please upload your most recent grade report.";
pub const INVALID_FIELD: &str = "Please fill out all required fields.";
pub const OVER_WORD_LIMIT: &str = "Please fix fields that exceed word limits before submitting.";

/// Outcome of [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every check passed; the form may be sent.
    Proceed,
    /// Submission stops here, with the alert to show (`None` aborts silently).
    Blocked(Option<&'static str>),
}

/// Validates the form for submission, updating missing markers, word-limit
/// warnings and constraint errors in place.
pub fn validate(form: &mut ApplicationForm) -> Verdict {
    let mut any_missing = false;
    for (_, field) in form.fields_mut() {
        field.missing = field.required && field.is_blank();
        any_missing |= field.missing;
    }
    if any_missing {
        tracing::info!("submit blocked: required fields missing");
        return Verdict::Blocked(Some(MISSING_REQUIRED));
    }

    if form.field(GRADE_REPORT).is_none_or(|f| f.is_blank()) {
        tracing::info!("submit blocked: no grade report");
        return Verdict::Blocked(Some(MISSING_GRADE_REPORT));
    }

    if !form.steps().on_last() {
        return Verdict::Blocked(None);
    }

    let mut over_limit = false;
    for (loc, field) in form.fields_mut() {
        let Some(counter) = field.counter.as_mut() else {
            continue;
        };
        counter.update(&field.value);
        if counter.is_over() {
            let what = if loc.block.is_some() {
                "activity description"
            } else {
                "essay"
            };
            counter.set_warning(format!(
                "This {what} has {} words (limit: {}).",
                counter.count(),
                counter.limit()
            ));
            over_limit = true;
        } else {
            counter.clear_warning();
        }
    }

    let mut first_invalid = None;
    for (loc, field) in form.fields_mut() {
        field.error = None;
        if first_invalid.is_some() {
            continue;
        }
        if let Err(e) = check_constraint(field.kind, &field.value) {
            tracing::info!(field = %field.name, error = %e, "submit blocked: invalid field");
            field.error = Some(e.to_string());
            first_invalid = Some(loc);
        }
    }
    if let Some(loc) = first_invalid {
        form.focus_location(loc);
        return Verdict::Blocked(Some(INVALID_FIELD));
    }

    if over_limit {
        tracing::info!("submit blocked: word limits exceeded");
        return Verdict::Blocked(Some(OVER_WORD_LIMIT));
    }

    Verdict::Proceed
}
