//! Value normalizer for heterogeneously-encoded Bitable field values.
//!
//! The source encodes the same logical scalar in several shapes: a
//! plain JSON value, an array wrapping it, a `{text}` rich-text
//! object, or a `{type, value}` formula-result wrapper. The decoders
//! in this module unwrap all of them and never fail; unresolvable
//! input degrades to a documented default instead.

mod date;
mod value;

pub use date::{parse_date, parse_date_or_today};
pub use value::{extract_text, parse_currency, parse_number, UNKNOWN_LABEL};
