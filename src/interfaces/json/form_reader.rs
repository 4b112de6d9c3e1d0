use crate::error::Result;
use crate::infrastructure::in_memory::InMemoryForm;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;

/// A checkout form described as JSON.
///
/// ```json
/// {
///   "required": ["shipping_name", "shipping_line1"],
///   "values": { "shipping_name": "Ada", "shipping_line1": "1 Main St" },
///   "checked": ["save_shipping"]
/// }
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FormDocument {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub values: HashMap<String, String>,
    #[serde(default)]
    pub checked: HashSet<String>,
}

impl FormDocument {
    /// Parses a document from any `Read` source (e.g., File, Stdin).
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    pub fn into_form(self) -> InMemoryForm {
        InMemoryForm::with_values(self.required, self.values, self.checked)
    }
}
