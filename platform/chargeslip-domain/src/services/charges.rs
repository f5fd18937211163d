use crate::services::schedule::{
    BrokerageRule, ChargeBase, ChargeSchedule, GstBase, LotSizing, TaxKind, GST_RATE,
    SEBI_RATE_PCT,
};
use crate::value_objects::charges::ChargeBreakdown;
use crate::value_objects::instrument::InstrumentCategory;
use crate::value_objects::trade_input::TradeInput;

/// Computes the charge breakdown for one trade. Pure; never fails.
pub fn calculate(category: InstrumentCategory, input: &TradeInput) -> ChargeBreakdown {
    evaluate(ChargeSchedule::for_category(category), input)
}

pub fn evaluate(schedule: &ChargeSchedule, input: &TradeInput) -> ChargeBreakdown {
    let (buy_value, sell_value) = match effective_multiplier(schedule.lot, input) {
        None => (
            input.buy_price * input.quantity,
            input.sell_price * input.quantity,
        ),
        Some(multiplier) => (
            input.buy_price * input.quantity * multiplier,
            input.sell_price * input.quantity * multiplier,
        ),
    };
    let turnover = buy_value + sell_value;

    let brokerage = match schedule.brokerage {
        BrokerageRule::Free => 0.0,
        BrokerageRule::Capped {
            rate_pct,
            cap,
            floor_at_zero,
        } => {
            let raw = percent_of(turnover, rate_pct);
            if floor_at_zero {
                cap.min(raw.max(0.0))
            } else {
                cap.min(raw)
            }
        }
    };

    let tax = schedule.transaction_tax.map(|tax| {
        let base = match tax.base {
            ChargeBase::SellValue => sell_value,
            ChargeBase::Turnover => turnover,
        };
        (tax.kind, percent_of(base, tax.rate_pct))
    });
    let stt = tax.and_then(|(kind, v)| (kind == TaxKind::Stt).then_some(v));
    let ctt = tax.and_then(|(kind, v)| (kind == TaxKind::Ctt).then_some(v));

    let exchange_charge = percent_of(turnover, schedule.exchange.rate_pct(input.venue));

    let gst = match schedule.gst_base {
        GstBase::BrokerageAndExchange => (brokerage + exchange_charge) * GST_RATE,
        GstBase::ExchangeOnly => exchange_charge * GST_RATE,
    };

    let sebi = percent_of(turnover, SEBI_RATE_PCT);
    let stamp = schedule
        .stamp_buy_pct
        .map(|rate_pct| percent_of(buy_value, rate_pct));

    // Summation order is fixed; reordering changes the low bits.
    let mut total = brokerage;
    if let Some(v) = stt {
        total += v;
    }
    total += exchange_charge;
    total += gst;
    if let Some(v) = ctt {
        total += v;
    }
    total += sebi;
    if let Some(v) = stamp {
        total += v;
    }

    let pnl = (sell_value - buy_value) - total;

    ChargeBreakdown {
        buy_value,
        sell_value,
        turnover,
        brokerage,
        stt,
        ctt,
        exchange_charge,
        gst,
        sebi,
        stamp,
        total,
        pnl,
    }
}

fn effective_multiplier(lot: LotSizing, input: &TradeInput) -> Option<f64> {
    match lot {
        LotSizing::Unit => None,
        LotSizing::Fixed(size) => Some(f64::from(size)),
        LotSizing::FromInput => Some(f64::from(input.lot_multiplier.max(1))),
    }
}

fn percent_of(base: f64, rate_pct: f64) -> f64 {
    (base * rate_pct) / 100.0
}
