//! Declarative field mappings for the configured source tables.
//!
//! Each source table carries its own ordered list of bindings from an
//! external field key to a canonical fund field plus the decoder to
//! apply. The lists are validated once at configuration load, so a
//! typo in a key or a decoder that cannot produce the target field is
//! caught before any record is touched.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Role of a configured source table in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// The primary NAV extract table; feeds the history store and the
    /// metric recompute in addition to the registry.
    Primary,
    /// P&L overview table; contributes concentration and P&L columns.
    PnlOverview,
    /// Fund-of-funds holdings table.
    Fof,
}

impl TableKind {
    /// Source-table tag persisted on fund rows.
    pub fn source_tag(&self) -> &'static str {
        match self {
            TableKind::Primary | TableKind::PnlOverview => "main",
            TableKind::Fof => "fof",
        }
    }
}

/// Canonical fund fields a source column can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundField {
    Name,
    Strategy,
    Manager,
    Status,
    LatestNavDate,
    EstablishmentDate,
    CumulativeReturn,
    YearlyReturn,
    WeeklyReturn,
    DailyReturn,
    DailyPnl,
    WeeklyPnl,
    YearlyPnl,
    Concentration,
    Cost,
    Scale,
    TotalAssets,
    DailyCapitalUsage,
}

/// How to decode the raw field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoder {
    /// Plain text extraction.
    Text,
    /// Text extraction followed by option-code resolution.
    Label,
    /// Numeric value (rates, ratios).
    Number,
    /// Monetary amount.
    Currency,
    /// Calendar date.
    Date,
}

/// The value class a decoder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueClass {
    Text,
    Numeric,
    Date,
}

impl Decoder {
    fn class(&self) -> ValueClass {
        match self {
            Decoder::Text | Decoder::Label => ValueClass::Text,
            Decoder::Number | Decoder::Currency => ValueClass::Numeric,
            Decoder::Date => ValueClass::Date,
        }
    }
}

impl FundField {
    fn class(&self) -> ValueClass {
        match self {
            FundField::Name | FundField::Strategy | FundField::Manager | FundField::Status => {
                ValueClass::Text
            }
            FundField::LatestNavDate | FundField::EstablishmentDate => ValueClass::Date,
            _ => ValueClass::Numeric,
        }
    }
}

/// One external column bound to a canonical field.
///
/// Several bindings may target the same canonical field (alternative
/// column names across sheet revisions); during conversion the first
/// binding whose key is present on the record wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldBinding {
    pub external_key: String,
    pub field: FundField,
    pub decoder: Decoder,
}

impl FieldBinding {
    pub fn new(external_key: &str, field: FundField, decoder: Decoder) -> Self {
        Self {
            external_key: external_key.to_string(),
            field,
            decoder,
        }
    }
}

/// Configuration for one source table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub table_id: String,
    pub kind: TableKind,
    pub bindings: Vec<FieldBinding>,
    /// Fill-in when the table has no strategy column (FOF holdings).
    #[serde(default)]
    pub default_strategy: Option<String>,
    /// Fill-in when the table has no manager column.
    #[serde(default)]
    pub default_manager: Option<String>,
}

impl TableConfig {
    /// Validates the binding list: non-empty unique keys, a `Name`
    /// binding present, and every decoder compatible with the class of
    /// its target field.
    pub fn validate(&self) -> Result<()> {
        if self.table_id.trim().is_empty() {
            return Err(Error::InvalidMapping("table_id is empty".to_string()));
        }
        if self.bindings.is_empty() {
            return Err(Error::InvalidMapping(format!(
                "table {} has no field bindings",
                self.table_id
            )));
        }

        let mut seen_keys = std::collections::HashSet::new();
        let mut has_name = false;
        for binding in &self.bindings {
            let key = binding.external_key.trim();
            if key.is_empty() {
                return Err(Error::InvalidMapping(format!(
                    "table {} has a binding with an empty external key",
                    self.table_id
                )));
            }
            if !seen_keys.insert(key) {
                return Err(Error::InvalidMapping(format!(
                    "table {} binds external key '{}' more than once",
                    self.table_id, key
                )));
            }
            if binding.decoder.class() != binding.field.class() {
                return Err(Error::InvalidMapping(format!(
                    "table {}: decoder {:?} cannot produce field {:?}",
                    self.table_id, binding.decoder, binding.field
                )));
            }
            if binding.field == FundField::Name {
                has_name = true;
            }
        }

        if !has_name {
            return Err(Error::InvalidMapping(format!(
                "table {} has no binding for the fund name",
                self.table_id
            )));
        }

        Ok(())
    }

    /// Mapping for the primary NAV extract table.
    pub fn primary(table_id: &str) -> Self {
        use Decoder::*;
        use FundField::*;
        Self {
            table_id: table_id.to_string(),
            kind: TableKind::Primary,
            bindings: vec![
                FieldBinding::new("基金名称", Name, Text),
                FieldBinding::new("策略", Strategy, Label),
                FieldBinding::new("投资经理", Manager, Label),
                FieldBinding::new("状态", Status, Label),
                FieldBinding::new("净值日期", LatestNavDate, Date),
                FieldBinding::new("本年收益率", YearlyReturn, Number),
                FieldBinding::new("本周收益率", WeeklyReturn, Number),
                FieldBinding::new("集中度", Concentration, Number),
                FieldBinding::new("投资成本", Cost, Currency),
                FieldBinding::new("成本", Cost, Currency),
                FieldBinding::new("资产净值", TotalAssets, Currency),
            ],
            default_strategy: None,
            default_manager: None,
        }
    }

    /// Mapping for the P&L overview table. Only the columns this table
    /// is authoritative for are bound; in particular the daily P&L
    /// comes from here, not from the primary table's formula column.
    pub fn pnl_overview(table_id: &str) -> Self {
        use Decoder::*;
        use FundField::*;
        Self {
            table_id: table_id.to_string(),
            kind: TableKind::PnlOverview,
            bindings: vec![
                FieldBinding::new("基金名称", Name, Text),
                FieldBinding::new("集中度", Concentration, Number),
                FieldBinding::new("日均资金占用", DailyCapitalUsage, Currency),
                FieldBinding::new("本周收益", WeeklyPnl, Currency),
                FieldBinding::new("本年收益", YearlyPnl, Currency),
                FieldBinding::new("本日盈亏", DailyPnl, Currency),
            ],
            default_strategy: None,
            default_manager: None,
        }
    }

    /// Mapping for a FOF holdings table.
    pub fn fof(table_id: &str, manager: &str) -> Self {
        use Decoder::*;
        use FundField::*;
        Self {
            table_id: table_id.to_string(),
            kind: TableKind::Fof,
            bindings: vec![
                FieldBinding::new("基金名称", Name, Text),
                FieldBinding::new("净值日期", LatestNavDate, Date),
                FieldBinding::new("资产净值", TotalAssets, Currency),
                FieldBinding::new("成本", Cost, Currency),
                FieldBinding::new("持有份额", Scale, Currency),
            ],
            default_strategy: Some("FOF".to_string()),
            default_manager: Some(manager.to_string()),
        }
    }
}

/// Full configuration of one sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub app_token: String,
    pub tables: Vec<TableConfig>,
}

impl SyncConfig {
    /// Validates every table mapping. Called by the orchestrator
    /// before any network or database work.
    pub fn validate(&self) -> Result<()> {
        if self.app_token.trim().is_empty() {
            return Err(Error::InvalidMapping("app_token is empty".to_string()));
        }
        if self.tables.is_empty() {
            return Err(Error::InvalidMapping(
                "no source tables configured".to_string(),
            ));
        }

        let mut at_most_one_primary = 0;
        for table in &self.tables {
            table.validate()?;
            if table.kind == TableKind::Primary {
                at_most_one_primary += 1;
            }
        }
        if at_most_one_primary > 1 {
            return Err(Error::InvalidMapping(
                "more than one primary table configured".to_string(),
            ));
        }

        Ok(())
    }
}
