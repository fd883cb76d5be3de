use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Select,
    Checkbox,
    Textarea,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: i32,
    pub field_name: String,
    pub field_type: FieldType,
    pub label: String,
    pub required: bool,
    /// JSON-encoded `[{ "value": .., "label": .. }]` list for select fields.
    pub options: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFormField {
    pub field_name: String,
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    pub options: Option<String>,
    #[serde(default)]
    pub order: i32,
}
