use serde::{Deserialize, Serialize};

/// Initial values for one activity block, as supplied by a restored draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityEntry {
    pub activity_type: String,
    pub activity_position: String,
    pub activity_org: String,
    pub activity_desc: String,
}

impl ActivityEntry {
    /// Creates an entry from its four values.
    pub fn new(
        activity_type: impl Into<String>,
        activity_position: impl Into<String>,
        activity_org: impl Into<String>,
        activity_desc: impl Into<String>,
    ) -> Self {
        Self {
            activity_type: activity_type.into(),
            activity_position: activity_position.into(),
            activity_org: activity_org.into(),
            activity_desc: activity_desc.into(),
        }
    }

    /// Returns the values in field order: type, position, org, description.
    pub fn values(&self) -> [&str; 4] {
        [
            &self.activity_type,
            &self.activity_position,
            &self.activity_org,
            &self.activity_desc,
        ]
    }
}
