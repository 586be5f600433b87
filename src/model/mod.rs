mod activity;
mod form_data;
mod review;
pub mod schema;
mod validation;
mod words;

pub use activity::ActivityEntry;
pub use form_data::{FormData, clean_input};
pub use review::{Review, ReviewItem, ReviewSection};
pub use schema::{FieldKind, FieldSpec, StepContent, StepSpec};
pub use validation::{
    ValidationError, check_constraint, validate_choice, validate_date, validate_email,
    validate_file, validate_max_len,
};
pub use words::count_words;
