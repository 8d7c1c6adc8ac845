//! Option-code resolution for categorical fields.
//!
//! Select-typed fields arrive as opaque option codes (`optvE8Axra`)
//! that have to be mapped back to their display labels. The primary
//! path is the per-table field schema fetched at the start of each
//! sync; a static hand-maintained table covers codes that the schema
//! endpoint does not expose, which happens when the categorical field
//! is defined through a cross-table reference instead of a local
//! option list. Resolution never fails: an unresolved code passes
//! through as its raw value.

use lazy_static::lazy_static;
use std::collections::HashMap;

use fundsync_bitable::TableField;

lazy_static! {
    /// Hand-maintained code→label fallback for cross-table reference
    /// fields. Extended whenever a new unresolvable code shows up in
    /// the source; labels were confirmed against the sheet UI.
    static ref STATIC_OPTION_LABELS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        // Strategy codes
        m.insert("opteZ8clPp", "指增");
        m.insert("optAf8gJwT", "指增");
        m.insert("optvE8Axra", "中性");
        m.insert("optztNchXY", "可转债");
        m.insert("optA6mwCSf", "量选");
        m.insert("optN5SM1ew", "T0");
        m.insert("optMJZQ4p5", "混合");
        m.insert("optpdOvS5N", "CTA");
        m.insert("optcXUA9c6", "套利");
        m.insert("optHhPUvUQ", "择时对冲");
        m.insert("optC7xvukD", "期权");
        // Manager codes
        m.insert("optJU6D40q", "张鹏");
        m.insert("optjyy9D9f", "彭思宇");
        // Status codes
        m.insert("optFl1SLci", "已赎回");
        m
    };
}

/// Code→label resolver for one table, built from its field schema.
#[derive(Debug, Default, Clone)]
pub struct OptionResolver {
    /// field name → (code or label → label)
    by_field: HashMap<String, HashMap<String, String>>,
}

impl OptionResolver {
    /// Builds a resolver from a fetched field schema. Every code-key
    /// shape the source has emitted (`name`, `option_id`, `id`) is
    /// indexed, so a label already in plain text resolves to itself.
    pub fn from_fields(fields: &[TableField]) -> Self {
        let mut by_field: HashMap<String, HashMap<String, String>> = HashMap::new();

        for field in fields {
            if !field.is_select() {
                continue;
            }
            let Some(property) = &field.property else {
                continue;
            };

            let mut mapping = HashMap::new();
            for option in &property.options {
                mapping.insert(option.name.clone(), option.name.clone());
                if let Some(option_id) = &option.option_id {
                    mapping.insert(option_id.clone(), option.name.clone());
                }
                if let Some(id) = &option.id {
                    mapping.insert(id.clone(), option.name.clone());
                }
            }
            by_field.insert(field.field_name.clone(), mapping);
        }

        Self { by_field }
    }

    /// Resolves an extracted value for a field to its display label.
    /// Falls back to the static table, then to the raw value.
    pub fn resolve(&self, field_name: &str, raw: &str) -> String {
        if let Some(mapping) = self.by_field.get(field_name) {
            if let Some(label) = mapping.get(raw) {
                return label.clone();
            }
        }
        if let Some(label) = STATIC_OPTION_LABELS.get(raw) {
            return (*label).to_string();
        }
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_field(json: &str) -> TableField {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn resolves_codes_from_schema() {
        let fields = vec![schema_field(
            r#"{"field_name": "策略", "type": 3, "property": {"options": [
                {"name": "宏观", "option_id": "optDh4mMyW"},
                {"name": "债券", "id": "optFj6oOaY"}
            ]}}"#,
        )];
        let resolver = OptionResolver::from_fields(&fields);

        assert_eq!(resolver.resolve("策略", "optDh4mMyW"), "宏观");
        assert_eq!(resolver.resolve("策略", "optFj6oOaY"), "债券");
        // Labels in plain text resolve to themselves.
        assert_eq!(resolver.resolve("策略", "宏观"), "宏观");
    }

    #[test]
    fn falls_back_to_static_table_then_raw() {
        let resolver = OptionResolver::default();

        assert_eq!(resolver.resolve("策略", "optvE8Axra"), "中性");
        assert_eq!(resolver.resolve("状态", "optFl1SLci"), "已赎回");
        // Unknown code passes through untouched.
        assert_eq!(resolver.resolve("策略", "optDoesNotExist"), "optDoesNotExist");
    }

    #[test]
    fn ignores_non_select_fields() {
        let fields = vec![schema_field(r#"{"field_name": "成本", "type": 2}"#)];
        let resolver = OptionResolver::from_fields(&fields);
        assert_eq!(resolver.resolve("成本", "42"), "42");
    }
}
