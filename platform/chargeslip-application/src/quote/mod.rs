use crate::config::Config;
use crate::form::to_trade_input;
use crate::formatting::{format_money, MoneyFormat};
use chargeslip_domain::services::charges::calculate;
use chargeslip_domain::value_objects::charges::{ChargeBreakdown, ChargeKind};
use chargeslip_domain::value_objects::instrument::InstrumentCategory;
use chargeslip_domain::value_objects::snapshot::FormFields;
use chargeslip_domain::value_objects::trade_input::TradeInput;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRow {
    pub kind: ChargeKind,
    pub key: &'static str,
    pub label: &'static str,
    pub amount: f64,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub category: InstrumentCategory,
    pub input: TradeInput,
    pub breakdown: ChargeBreakdown,
    pub rows: Vec<QuoteRow>,
}

impl Quote {
    pub fn row(&self, kind: ChargeKind) -> Option<&QuoteRow> {
        self.rows.iter().find(|r| r.kind == kind)
    }
}

pub fn quote(category: InstrumentCategory, fields: &FormFields, config: &Config) -> Quote {
    let input = to_trade_input(category, fields, &config.lot_table());
    quote_input(category, input, &MoneyFormat::from(&config.display))
}

pub fn quote_input(category: InstrumentCategory, input: TradeInput, format: &MoneyFormat) -> Quote {
    let breakdown = calculate(category, &input);
    metrics::counter!("chargeslip.quote.calls_total", "category" => category.key()).increment(1);
    tracing::debug!(
        category = %category,
        turnover = breakdown.turnover,
        total = breakdown.total,
        pnl = breakdown.pnl,
        "quote computed"
    );

    let rows = breakdown
        .entries()
        .into_iter()
        .map(|(kind, amount)| QuoteRow {
            kind,
            key: kind.key(),
            label: kind.label(),
            amount,
            display: format_money(amount, format),
        })
        .collect();

    Quote {
        category,
        input,
        breakdown,
        rows,
    }
}

/// Quotes every category for the same form fields.
pub fn quote_all(fields: &FormFields, config: &Config) -> Vec<Quote> {
    InstrumentCategory::ALL
        .into_iter()
        .map(|category| quote(category, fields, config))
        .collect()
}
