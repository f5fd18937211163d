use crate::config::LotTable;
use chargeslip_domain::services::quantity::quantity_from_amount;
use chargeslip_domain::value_objects::instrument::InstrumentCategory;
use chargeslip_domain::value_objects::snapshot::{FormFields, InputMode};
use chargeslip_domain::value_objects::trade_input::TradeInput;

/// Parses the longest leading decimal number in `raw`; anything else is 0.
///
/// `"12abc"` reads as 12, `"abc"`, `""`, `"NaN"` and `"inf"` as 0.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut last_valid = 0;
    while end < bytes.len() {
        let b = bytes[end];
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
                last_valid = end + 1;
            }
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => {
                seen_exp = true;
                if matches!(bytes.get(end + 1), Some(b'+') | Some(b'-')) {
                    end += 1;
                }
            }
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return 0.0;
    }
    trimmed[..last_valid]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Quantity that will be fed to the engine for these fields.
///
/// In amount mode the quantity is derived from the amount and buy price; a
/// zero buy price keeps whatever was typed in the quantity field.
pub fn effective_quantity(fields: &FormFields) -> f64 {
    let typed = coerce_number(&fields.quantity);
    match fields.input_mode {
        InputMode::Quantity => typed,
        InputMode::Amount => quantity_from_amount(
            coerce_number(&fields.amount),
            coerce_number(&fields.buy_price),
            typed,
        ),
    }
}

pub fn to_trade_input(
    category: InstrumentCategory,
    fields: &FormFields,
    lots: &LotTable,
) -> TradeInput {
    let mut input = TradeInput::new(
        coerce_number(&fields.buy_price),
        coerce_number(&fields.sell_price),
        effective_quantity(fields),
    );
    if category.uses_venue() {
        input = input.with_venue(fields.venue);
    }
    if category.takes_strike() {
        input = input.with_strike(coerce_number(&fields.strike_price));
    }
    if category.uses_commodity() {
        input = input.with_lot_multiplier(lots.lot_multiplier(fields.commodity));
    }
    input
}
