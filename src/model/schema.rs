//! Static layout of the application form: steps, fields, and limits.

/// Maximum number of activity blocks that may exist at once.
pub const MAX_ACTIVITIES: usize = 5;

/// Word limit applied to every activity description.
pub const ACTIVITY_DESC_LIMIT: usize = 50;

/// Name of the required grade report upload.
pub const GRADE_REPORT: &str = "grade_report";

/// Name of the optional supporting upload.
pub const OPTIONAL_UPLOAD: &str = "upload";

/// Repeated field names used by every activity block.
pub const ACTIVITY_TYPE: &str = "activity_type[]";
pub const ACTIVITY_POSITION: &str = "activity_position[]";
pub const ACTIVITY_ORG: &str = "activity_org[]";
pub const ACTIVITY_DESC: &str = "activity_desc[]";

const GENDERS: &[&str] = &["Female", "Male", "Other"];
const GRADES: &[&str] = &["8", "9", "10", "11", "12"];
const YES_NO: &[&str] = &["Yes", "No"];

/// The input type of a field, mirroring the constraint it is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text with an optional maximum length in characters.
    Text { max_len: Option<usize> },
    /// Single-line text that must look like an email address.
    Email,
    /// A calendar date written as `YYYY-MM-DD`.
    Date,
    /// One value out of a fixed option list.
    Choice(&'static [&'static str]),
    /// Multi-line text with an optional word limit.
    TextArea { word_limit: Option<usize> },
    /// Path to a file on disk.
    File,
}

/// Definition of a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Submission key.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub kind: FieldKind,
    /// Whether the field must be non-blank on submit.
    pub required: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            name,
            label,
            kind,
            required,
        }
    }

    const fn text(name: &'static str, label: &'static str, required: bool) -> Self {
        Self::new(name, label, FieldKind::Text { max_len: None }, required)
    }

    /// Returns the word limit of a bounded text area.
    pub fn word_limit(&self) -> Option<usize> {
        match self.kind {
            FieldKind::TextArea { word_limit } => word_limit,
            _ => None,
        }
    }

    /// Returns `true` for file upload fields.
    pub fn is_upload(&self) -> bool {
        self.kind == FieldKind::File
    }
}

/// What a step panel contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepContent {
    Fields(&'static [FieldSpec]),
    Activities,
    Review,
}

/// One panel of the multi-step form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSpec {
    pub title: &'static str,
    pub content: StepContent,
}

const STUDENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("student_name", "Student Name", true),
    FieldSpec::new("student_gender", "Gender", FieldKind::Choice(GENDERS), true),
    FieldSpec::text("student_gender_other", "Gender (Other)", false),
    FieldSpec::new("dob", "Date of Birth", FieldKind::Date, true),
    FieldSpec::new("email", "Email", FieldKind::Email, true),
    FieldSpec::text("phone", "Phone", true),
    FieldSpec::new("grade", "Grade", FieldKind::Choice(GRADES), true),
];

const PARENT_SCHOOL_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("parent_name", "Parent Name", true),
    FieldSpec::text("parent_contact", "Parent Contact", true),
    FieldSpec::text("school_name", "School Name", true),
    FieldSpec::text("school_location", "School Location", true),
    FieldSpec::text("school_contact", "School Contact", true),
];

const TEACHER_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("teacher_name", "Teacher Name", true),
    FieldSpec::text("teacher_contact", "Teacher Contact", true),
    FieldSpec::new("teacher_email", "Teacher Email", FieldKind::Email, true),
    FieldSpec::text("subjects", "Favorite Subjects", true),
    FieldSpec::text("interests", "Interests", true),
    FieldSpec::new(
        "accommodation_required",
        "Accommodation Required",
        FieldKind::Choice(YES_NO),
        true,
    ),
    FieldSpec::text("accommodation_comment", "Accommodation Details", false),
    // Checked by the dedicated upload rule rather than the required scan.
    FieldSpec::new(GRADE_REPORT, "Grade Report (file path)", FieldKind::File, false),
];

const ESSAY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "essay1",
        "Essay 1",
        FieldKind::TextArea {
            word_limit: Some(150),
        },
        true,
    ),
    FieldSpec::new(
        "essay2",
        "Essay 2",
        FieldKind::TextArea {
            word_limit: Some(200),
        },
        true,
    ),
    FieldSpec::new(
        "essay3",
        "Essay 3",
        FieldKind::TextArea {
            word_limit: Some(150),
        },
        true,
    ),
    FieldSpec::new(
        "optional_info",
        "Optional Info",
        FieldKind::TextArea { word_limit: None },
        false,
    ),
    FieldSpec::new(OPTIONAL_UPLOAD, "Supporting Upload (file path)", FieldKind::File, false),
];

/// The four fields of one activity block.
pub const ACTIVITY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text(ACTIVITY_TYPE, "Activity Name", true),
    FieldSpec::new(
        ACTIVITY_POSITION,
        "Position",
        FieldKind::Text { max_len: Some(50) },
        true,
    ),
    FieldSpec::new(
        ACTIVITY_ORG,
        "Organization",
        FieldKind::Text { max_len: Some(100) },
        true,
    ),
    FieldSpec::new(
        ACTIVITY_DESC,
        "Description",
        FieldKind::TextArea {
            word_limit: Some(ACTIVITY_DESC_LIMIT),
        },
        true,
    ),
];

/// The ordered step sequence. The last step is always the review.
pub static STEPS: &[StepSpec] = &[
    StepSpec {
        title: "Student",
        content: StepContent::Fields(STUDENT_FIELDS),
    },
    StepSpec {
        title: "Parent & School",
        content: StepContent::Fields(PARENT_SCHOOL_FIELDS),
    },
    StepSpec {
        title: "Teacher & Academics",
        content: StepContent::Fields(TEACHER_FIELDS),
    },
    StepSpec {
        title: "Activities",
        content: StepContent::Activities,
    },
    StepSpec {
        title: "Essays",
        content: StepContent::Fields(ESSAY_FIELDS),
    },
    StepSpec {
        title: "Review",
        content: StepContent::Review,
    },
];

/// Iterates every non-repeated field in document order.
pub fn static_fields() -> impl Iterator<Item = &'static FieldSpec> {
    STEPS.iter().flat_map(|step| -> &'static [FieldSpec] {
        match step.content {
            StepContent::Fields(fields) => fields,
            _ => &[],
        }
    })
}

/// Looks up a field definition by submission key.
pub fn find_field(name: &str) -> Option<&'static FieldSpec> {
    static_fields()
        .chain(ACTIVITY_FIELDS.iter())
        .find(|f| f.name == name)
}

/// Returns `true` if `name` is one of the upload fields.
pub fn is_upload(name: &str) -> bool {
    find_field(name).is_some_and(FieldSpec::is_upload)
}

/// Returns the display label for a key, humanizing unknown keys.
pub fn label_for(name: &str) -> String {
    match find_field(name) {
        Some(spec) => spec.label.to_string(),
        None => humanize(name),
    }
}

/// Turns a raw key such as `favorite_food` into `Favorite food`.
pub fn humanize(name: &str) -> String {
    let spaced = name.trim_end_matches("[]").replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
