//! Conversion of raw source records into normalized fund drafts.

use std::collections::HashSet;

use fundsync_bitable::BitableRecord;

use super::model::{FundDraft, FundStatus};
use crate::decode::{extract_text, parse_currency, parse_date, parse_number, UNKNOWN_LABEL};
use crate::errors::{Result, ValidationError};
use crate::mapping::{Decoder, FundField, TableConfig};
use crate::options::OptionResolver;

/// Converts one record according to the table's field bindings.
///
/// Bindings are applied in declared order; when several bindings
/// target the same canonical field, the first one whose key is present
/// on the record wins. Fields absent from the record stay `None` on
/// the draft, so the later partial update leaves their stored values
/// alone.
///
/// Fails only when the record has no resolvable fund name; every other
/// malformed value degrades per the decoder contracts.
pub fn convert_record(
    record: &BitableRecord,
    table: &TableConfig,
    resolver: &OptionResolver,
) -> Result<FundDraft> {
    let mut draft = FundDraft {
        record_id: record.record_id.clone(),
        source_table: table.kind.source_tag().to_string(),
        ..Default::default()
    };

    let mut assigned: HashSet<FundField> = HashSet::new();

    for binding in &table.bindings {
        let Some(raw) = record.fields.get(&binding.external_key) else {
            continue;
        };
        if !assigned.insert(binding.field) {
            continue;
        }

        match binding.decoder {
            Decoder::Text | Decoder::Label => {
                let mut text = extract_text(raw);
                if binding.decoder == Decoder::Label {
                    text = resolver.resolve(&binding.external_key, &text);
                }
                apply_text(&mut draft, binding.field, text);
            }
            Decoder::Number => apply_numeric(&mut draft, binding.field, parse_number(raw)),
            Decoder::Currency => apply_numeric(&mut draft, binding.field, parse_currency(raw)),
            Decoder::Date => {
                if let Some(date) = parse_date(raw) {
                    match binding.field {
                        FundField::LatestNavDate => draft.latest_nav_date = Some(date),
                        FundField::EstablishmentDate => draft.establishment_date = Some(date),
                        _ => {}
                    }
                }
            }
        }
    }

    if let Some(default_strategy) = &table.default_strategy {
        draft.strategy.get_or_insert_with(|| default_strategy.clone());
    }
    if let Some(default_manager) = &table.default_manager {
        draft.manager.get_or_insert_with(|| default_manager.clone());
    }

    if draft.name.trim().is_empty() || draft.name == UNKNOWN_LABEL {
        return Err(ValidationError::MissingField("name".to_string()).into());
    }

    Ok(draft)
}

fn apply_text(draft: &mut FundDraft, field: FundField, text: String) {
    match field {
        FundField::Name => draft.name = text,
        FundField::Strategy => draft.strategy = Some(text),
        FundField::Manager => draft.manager = Some(text),
        // An unmapped status label stays None so the stored value (or
        // the insert default) survives.
        FundField::Status => draft.status = FundStatus::from_label(&text),
        _ => {}
    }
}

fn apply_numeric(draft: &mut FundDraft, field: FundField, value: f64) {
    let slot = match field {
        FundField::CumulativeReturn => &mut draft.cumulative_return,
        FundField::YearlyReturn => &mut draft.yearly_return,
        FundField::WeeklyReturn => &mut draft.weekly_return,
        FundField::DailyReturn => &mut draft.daily_return,
        FundField::DailyPnl => &mut draft.daily_pnl,
        FundField::WeeklyPnl => &mut draft.weekly_pnl,
        FundField::YearlyPnl => &mut draft.yearly_pnl,
        FundField::Concentration => &mut draft.concentration,
        FundField::Cost => &mut draft.cost,
        FundField::Scale => &mut draft.scale,
        FundField::TotalAssets => &mut draft.total_assets,
        FundField::DailyCapitalUsage => &mut draft.daily_capital_usage,
        _ => return,
    };
    *slot = Some(value);
}
