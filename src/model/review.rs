//! Read-only summary of the form shown on the final step.

use super::form_data::FormData;
use super::schema::{
    ACTIVITY_DESC, ACTIVITY_ORG, ACTIVITY_POSITION, ACTIVITY_TYPE, is_upload, label_for,
};

const GROUPS: &[(&str, &[&str])] = &[
    (
        "Student Info",
        &[
            "student_name",
            "student_gender",
            "student_gender_other",
            "dob",
            "email",
            "phone",
            "grade",
        ],
    ),
    ("Parent Info", &["parent_name", "parent_contact"]),
    (
        "School Info",
        &["school_name", "school_location", "school_contact"],
    ),
    (
        "Teacher Info",
        &["teacher_name", "teacher_contact", "teacher_email"],
    ),
];

const ESSAYS: (&str, &[&str]) = ("Essays", &["essay1", "essay2", "essay3", "optional_info"]);

const ACTIVITY_KEYS: [&str; 4] = [ACTIVITY_TYPE, ACTIVITY_POSITION, ACTIVITY_ORG, ACTIVITY_DESC];

const ACTIVITY_LABELS: [&str; 4] = ["Type", "Position", "Organization", "Description"];

/// One labeled line of the review, or a nested group of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewItem {
    Entry { label: String, value: String },
    Group { title: String, entries: Vec<(String, String)> },
}

/// A titled block of the review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSection {
    pub title: String,
    pub items: Vec<ReviewItem>,
}

/// The grouped summary rendered on arrival at the review step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Review {
    sections: Vec<ReviewSection>,
}

impl Review {
    /// Builds the grouped summary from a form snapshot.
    ///
    /// Blank values are skipped and uploads are never shown. Keys not claimed by
    /// a named group land in "Additional Info" under their label.
    pub fn from_form_data(data: &FormData) -> Self {
        let mut sections = Vec::new();

        for (title, keys) in GROUPS {
            push_group(&mut sections, title, keys, data);
        }

        let claimed = |key: &str| {
            GROUPS.iter().any(|(_, keys)| keys.contains(&key))
                || ESSAYS.1.contains(&key)
                || ACTIVITY_KEYS.contains(&key)
                || is_upload(key)
        };
        let mut extra: Vec<&str> = Vec::new();
        for (key, _) in data.entries() {
            if !claimed(key.as_str()) && !extra.contains(&key.as_str()) {
                extra.push(key.as_str());
            }
        }
        push_group(&mut sections, "Additional Info", &extra, data);

        push_group(&mut sections, ESSAYS.0, ESSAYS.1, data);

        let columns: Vec<Vec<&str>> = ACTIVITY_KEYS.iter().map(|k| data.get_all(k)).collect();
        let count = columns[0].len();
        if count > 0 {
            let items = (0..count)
                .map(|i| ReviewItem::Group {
                    title: format!("Activity {}", i + 1),
                    entries: ACTIVITY_LABELS
                        .iter()
                        .zip(&columns)
                        .map(|(label, column)| {
                            let value = column.get(i).copied().unwrap_or_default();
                            (label.to_string(), value.to_string())
                        })
                        .collect(),
                })
                .collect();
            sections.push(ReviewSection {
                title: "Activities".to_string(),
                items,
            });
        }

        Self { sections }
    }

    /// Returns the sections in display order.
    pub fn sections(&self) -> &[ReviewSection] {
        &self.sections
    }

    /// Flattens the review into indented display lines, one blank line between sections.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.push(section.title.clone());
            for item in &section.items {
                match item {
                    ReviewItem::Entry { label, value } => push_entry(&mut lines, 2, label, value),
                    ReviewItem::Group { title, entries } => {
                        lines.push(format!("  {title}"));
                        for (label, value) in entries {
                            push_entry(&mut lines, 4, label, value);
                        }
                    }
                }
            }
        }
        lines
    }
}

fn push_group(sections: &mut Vec<ReviewSection>, title: &str, keys: &[&str], data: &FormData) {
    let items: Vec<ReviewItem> = keys
        .iter()
        .filter_map(|key| {
            let value = data.get(key)?;
            (!value.trim().is_empty()).then(|| ReviewItem::Entry {
                label: label_for(key),
                value: value.to_string(),
            })
        })
        .collect();
    if !items.is_empty() {
        sections.push(ReviewSection {
            title: title.to_string(),
            items,
        });
    }
}

/// Continuation lines of multi-line values are indented under the label.
fn push_entry(lines: &mut Vec<String>, indent: usize, label: &str, value: &str) {
    let pad = " ".repeat(indent);
    let mut value_lines = value.lines();
    let first = value_lines.next().unwrap_or_default();
    lines.push(format!("{pad}{label}: {first}"));
    for rest in value_lines {
        lines.push(format!("{pad}  {rest}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(review: &Review) -> Vec<&str> {
        review.sections().iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn empty_form_renders_nothing() {
        let review = Review::from_form_data(&FormData::new());
        assert!(review.sections().is_empty());
        assert!(review.lines().is_empty());
    }

    #[test]
    fn blank_values_are_skipped() {
        let mut data = FormData::new();
        data.push("student_name", "Ada");
        data.push("phone", "   ");
        let review = Review::from_form_data(&data);
        assert_eq!(review.lines(), vec!["Student Info", "  Student Name: Ada"]);
    }

    #[test]
    fn uploads_are_excluded() {
        let mut data = FormData::new();
        data.push("grade_report", "/tmp/grades.pdf");
        data.push("upload", "/tmp/extra.pdf");
        let review = Review::from_form_data(&data);
        assert!(review.sections().is_empty());
    }

    #[test]
    fn unknown_keys_are_humanized_under_additional_info() {
        let mut data = FormData::new();
        data.push("favorite_food", "Injera");
        data.push("subjects", "Math");
        let review = Review::from_form_data(&data);
        assert_eq!(titles(&review), vec!["Additional Info"]);
        assert_eq!(
            review.lines(),
            vec![
                "Additional Info",
                "  Favorite food: Injera",
                "  Favorite Subjects: Math"
            ]
        );
    }

    #[test]
    fn activities_pair_positionally() {
        let mut data = FormData::new();
        for (t, p, o, d) in [("Chess", "Captain", "Club", "Games"), ("Band", "Drummer", "School", "Music")] {
            data.push(ACTIVITY_TYPE, t);
            data.push(ACTIVITY_POSITION, p);
            data.push(ACTIVITY_ORG, o);
            data.push(ACTIVITY_DESC, d);
        }
        let review = Review::from_form_data(&data);
        let activities = &review.sections()[0];
        assert_eq!(activities.title, "Activities");
        assert_eq!(activities.items.len(), 2);
        match &activities.items[1] {
            ReviewItem::Group { title, entries } => {
                assert_eq!(title, "Activity 2");
                assert_eq!(entries[0], ("Type".to_string(), "Band".to_string()));
                assert_eq!(entries[2], ("Organization".to_string(), "School".to_string()));
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn short_activity_columns_render_empty() {
        let mut data = FormData::new();
        data.push(ACTIVITY_TYPE, "Chess");
        data.push(ACTIVITY_TYPE, "Band");
        data.push(ACTIVITY_POSITION, "Captain");
        let review = Review::from_form_data(&data);
        match &review.sections()[0].items[1] {
            ReviewItem::Group { entries, .. } => {
                assert_eq!(entries[1], ("Position".to_string(), String::new()));
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn grouped_rendering() {
        let mut data = FormData::new();
        data.push("student_name", "Ada Lovelace");
        data.push("email", "ada@example.org");
        data.push("parent_name", "Anne");
        data.push("school_name", "Hill School");
        data.push("teacher_email", "t@example.org");
        data.push("accommodation_required", "No");
        data.push("grade_report", "/tmp/grades.pdf");
        data.push("essay1", "First line\nSecond line");
        data.push(ACTIVITY_TYPE, "Chess");
        data.push(ACTIVITY_POSITION, "Captain");
        data.push(ACTIVITY_ORG, "Chess Club");
        data.push(ACTIVITY_DESC, "Weekly games");
        let review = Review::from_form_data(&data);
        insta::assert_snapshot!(review.lines().join("\n"), @r"
        Student Info
          Student Name: Ada Lovelace
          Email: ada@example.org

        Parent Info
          Parent Name: Anne

        School Info
          School Name: Hill School

        Teacher Info
          Teacher Email: t@example.org

        Additional Info
          Accommodation Required: No

        Essays
          Essay 1: First line
            Second line

        Activities
          Activity 1
            Type: Chess
            Position: Captain
            Organization: Chess Club
            Description: Weekly games
        ");
    }
}
