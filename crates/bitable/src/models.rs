//! Wire models for the Bitable open API.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One row of a Bitable table. Field values keep their raw JSON shape;
/// the source encodes the same logical scalar as a plain value, an
/// array, a `{text}` object, or a `{type, value}` formula wrapper
/// depending on the field type.
#[derive(Debug, Clone, Deserialize)]
pub struct BitableRecord {
    pub record_id: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

/// Field definition as returned by the field-schema endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TableField {
    pub field_name: String,
    /// Numeric field type; `3` is single-select.
    #[serde(rename = "type")]
    pub field_type: i64,
    #[serde(default)]
    pub ui_type: Option<String>,
    #[serde(default)]
    pub property: Option<FieldProperty>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldProperty {
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

/// One declared option of a select-typed field. The source has emitted
/// the option code under several keys over time; all are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldOption {
    pub name: String,
    #[serde(default)]
    pub option_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl TableField {
    const TYPE_SINGLE_SELECT: i64 = 3;

    /// Whether this field carries a local option list worth indexing.
    pub fn is_select(&self) -> bool {
        self.field_type == Self::TYPE_SINGLE_SELECT
            || matches!(
                self.ui_type.as_deref(),
                Some("SingleSelect") | Some("MultiSelect")
            )
    }
}

// ============================================================================
// Response envelopes
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordsPage {
    #[serde(default)]
    pub items: Vec<BitableRecord>,
    #[serde(default)]
    pub page_token: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldsPage {
    #[serde(default)]
    pub items: Vec<TableField>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub tenant_access_token: Option<String>,
    /// Token lifetime in seconds.
    #[serde(default)]
    pub expire: i64,
}
