use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::PrefillError;
use crate::model::ActivityEntry;

/// Values restored from a prior save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    /// Prior values of the non-repeated fields, keyed by field name.
    pub fields: BTreeMap<String, String>,
    /// Prior activity entries; when non-empty they replace the default block.
    pub activities: Vec<ActivityEntry>,
}

/// On-disk shapes: a bare activity list, or an object with both parts.
///
/// `List` is tried first; a derived struct would also accept a JSON array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPrefill {
    List(Vec<ActivityEntry>),
    Full {
        #[serde(default)]
        fields: BTreeMap<String, String>,
        #[serde(default)]
        activities: Vec<ActivityEntry>,
    },
}

impl Prefill {
    /// Parses a draft document.
    pub fn from_json(json: &str) -> Result<Self, PrefillError> {
        let stored: StoredPrefill = serde_json::from_str(json)?;
        Ok(match stored {
            StoredPrefill::List(activities) => Self {
                fields: BTreeMap::new(),
                activities,
            },
            StoredPrefill::Full { fields, activities } => Self { fields, activities },
        })
    }
}

/// Reads and parses the draft at `path`.
pub fn load_prefill(path: &Path) -> Result<Prefill, PrefillError> {
    let json = fs::read_to_string(path).map_err(|source| PrefillError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let prefill = Prefill::from_json(&json)?;
    tracing::info!(
        path = %path.display(),
        fields = prefill.fields.len(),
        activities = prefill.activities.len(),
        "loaded draft"
    );
    Ok(prefill)
}
