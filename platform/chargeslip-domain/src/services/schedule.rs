//! Static charge schedules, one per instrument category.
//!
//! Rates are percentages and are applied as `(base * rate) / 100`. The
//! literals mirror the published schedule exactly so that results are
//! reproducible to the bit.

use crate::value_objects::instrument::InstrumentCategory;
use crate::value_objects::venue::Venue;

pub const BROKERAGE_CAP: f64 = 40.0;
pub const GST_RATE: f64 = 0.18;
pub const SEBI_RATE_PCT: f64 = 0.0001;
pub const CURRENCY_LOT_MULTIPLIER: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrokerageRule {
    Free,
    /// `min(cap, turnover * rate / 100)`, optionally floored at zero.
    Capped {
        rate_pct: f64,
        cap: f64,
        floor_at_zero: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxKind {
    Stt,
    Ctt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeBase {
    SellValue,
    Turnover,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionTax {
    pub kind: TaxKind,
    pub base: ChargeBase,
    pub rate_pct: f64,
}

/// Exchange transaction charge on turnover, per venue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRule {
    pub nse_pct: f64,
    pub bse_pct: f64,
}

impl ExchangeRule {
    const fn flat(rate_pct: f64) -> Self {
        Self {
            nse_pct: rate_pct,
            bse_pct: rate_pct,
        }
    }

    pub fn rate_pct(&self, venue: Venue) -> f64 {
        match venue {
            Venue::Nse => self.nse_pct,
            Venue::Bse => self.bse_pct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GstBase {
    BrokerageAndExchange,
    ExchangeOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotSizing {
    /// Price times quantity.
    Unit,
    /// Fixed contract size regardless of input.
    Fixed(u32),
    /// Contract size supplied with the input (commodity lots).
    FromInput,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeSchedule {
    pub category: InstrumentCategory,
    pub lot: LotSizing,
    pub brokerage: BrokerageRule,
    pub transaction_tax: Option<TransactionTax>,
    pub exchange: ExchangeRule,
    pub gst_base: GstBase,
    pub stamp_buy_pct: Option<f64>,
}

const fn equity_brokerage() -> BrokerageRule {
    BrokerageRule::Capped {
        rate_pct: 0.03,
        cap: BROKERAGE_CAP,
        floor_at_zero: true,
    }
}

const fn derivative_brokerage() -> BrokerageRule {
    BrokerageRule::Capped {
        rate_pct: 0.03,
        cap: BROKERAGE_CAP,
        floor_at_zero: false,
    }
}

const EQUITY_CASH_EXCHANGE: ExchangeRule = ExchangeRule {
    nse_pct: 0.00325,
    bse_pct: 0.00375,
};

static SCHEDULES: [ChargeSchedule; 8] = [
    ChargeSchedule {
        category: InstrumentCategory::IntradayEquity,
        lot: LotSizing::Unit,
        brokerage: equity_brokerage(),
        transaction_tax: Some(TransactionTax {
            kind: TaxKind::Stt,
            base: ChargeBase::SellValue,
            rate_pct: 0.025,
        }),
        exchange: EQUITY_CASH_EXCHANGE,
        gst_base: GstBase::BrokerageAndExchange,
        stamp_buy_pct: Some(0.003),
    },
    ChargeSchedule {
        category: InstrumentCategory::DeliveryEquity,
        lot: LotSizing::Unit,
        brokerage: BrokerageRule::Free,
        transaction_tax: Some(TransactionTax {
            kind: TaxKind::Stt,
            base: ChargeBase::SellValue,
            rate_pct: 0.1,
        }),
        exchange: EQUITY_CASH_EXCHANGE,
        gst_base: GstBase::ExchangeOnly,
        stamp_buy_pct: Some(0.015),
    },
    ChargeSchedule {
        category: InstrumentCategory::EquityFutures,
        lot: LotSizing::Unit,
        brokerage: equity_brokerage(),
        transaction_tax: Some(TransactionTax {
            kind: TaxKind::Stt,
            base: ChargeBase::SellValue,
            rate_pct: 0.01,
        }),
        exchange: ExchangeRule::flat(0.0019),
        gst_base: GstBase::BrokerageAndExchange,
        stamp_buy_pct: Some(0.002),
    },
    ChargeSchedule {
        category: InstrumentCategory::EquityOptions,
        lot: LotSizing::Unit,
        brokerage: equity_brokerage(),
        transaction_tax: Some(TransactionTax {
            kind: TaxKind::Stt,
            base: ChargeBase::SellValue,
            rate_pct: 0.05,
        }),
        exchange: ExchangeRule::flat(0.035),
        gst_base: GstBase::BrokerageAndExchange,
        stamp_buy_pct: Some(0.003),
    },
    ChargeSchedule {
        category: InstrumentCategory::CurrencyFutures,
        lot: LotSizing::Fixed(CURRENCY_LOT_MULTIPLIER),
        brokerage: derivative_brokerage(),
        transaction_tax: None,
        exchange: ExchangeRule::flat(0.0004),
        gst_base: GstBase::BrokerageAndExchange,
        stamp_buy_pct: None,
    },
    ChargeSchedule {
        category: InstrumentCategory::CurrencyOptions,
        lot: LotSizing::Fixed(CURRENCY_LOT_MULTIPLIER),
        brokerage: derivative_brokerage(),
        transaction_tax: None,
        exchange: ExchangeRule::flat(0.0035),
        gst_base: GstBase::BrokerageAndExchange,
        stamp_buy_pct: None,
    },
    ChargeSchedule {
        category: InstrumentCategory::CommodityFutures,
        lot: LotSizing::FromInput,
        brokerage: derivative_brokerage(),
        transaction_tax: Some(TransactionTax {
            kind: TaxKind::Ctt,
            base: ChargeBase::Turnover,
            rate_pct: 0.01,
        }),
        exchange: ExchangeRule::flat(0.0021),
        gst_base: GstBase::BrokerageAndExchange,
        stamp_buy_pct: Some(0.002),
    },
    ChargeSchedule {
        category: InstrumentCategory::CommodityOptions,
        lot: LotSizing::FromInput,
        brokerage: derivative_brokerage(),
        transaction_tax: Some(TransactionTax {
            kind: TaxKind::Ctt,
            base: ChargeBase::SellValue,
            rate_pct: 0.01,
        }),
        exchange: ExchangeRule::flat(0.042),
        gst_base: GstBase::BrokerageAndExchange,
        stamp_buy_pct: Some(0.003),
    },
];

impl ChargeSchedule {
    pub fn for_category(category: InstrumentCategory) -> &'static ChargeSchedule {
        let idx = match category {
            InstrumentCategory::IntradayEquity => 0,
            InstrumentCategory::DeliveryEquity => 1,
            InstrumentCategory::EquityFutures => 2,
            InstrumentCategory::EquityOptions => 3,
            InstrumentCategory::CurrencyFutures => 4,
            InstrumentCategory::CurrencyOptions => 5,
            InstrumentCategory::CommodityFutures => 6,
            InstrumentCategory::CommodityOptions => 7,
        };
        &SCHEDULES[idx]
    }

    pub fn all() -> &'static [ChargeSchedule] {
        &SCHEDULES
    }
}

#[cfg(test)]
mod tests {
    use super::{BrokerageRule, ChargeBase, ChargeSchedule, GstBase, LotSizing, TaxKind};
    use crate::value_objects::instrument::{InstrumentCategory, Segment};

    #[test]
    fn lookup_returns_the_matching_schedule() {
        for category in InstrumentCategory::ALL {
            assert_eq!(ChargeSchedule::for_category(category).category, category);
        }
    }

    #[test]
    fn floor_clamp_only_on_equity_brokerage() {
        for schedule in ChargeSchedule::all() {
            match schedule.brokerage {
                BrokerageRule::Free => {
                    assert_eq!(schedule.category, InstrumentCategory::DeliveryEquity)
                }
                BrokerageRule::Capped { floor_at_zero, .. } => {
                    assert_eq!(floor_at_zero, schedule.category.segment() == Segment::Equity);
                }
            }
        }
    }

    #[test]
    fn only_delivery_excludes_brokerage_from_gst() {
        for schedule in ChargeSchedule::all() {
            let exchange_only = schedule.gst_base == GstBase::ExchangeOnly;
            assert_eq!(
                exchange_only,
                schedule.category == InstrumentCategory::DeliveryEquity
            );
        }
    }

    #[test]
    fn segment_determines_tax_kind_and_lot_sizing() {
        for schedule in ChargeSchedule::all() {
            match schedule.category.segment() {
                Segment::Equity => {
                    assert_eq!(schedule.lot, LotSizing::Unit);
                    assert_eq!(schedule.transaction_tax.map(|t| t.kind), Some(TaxKind::Stt));
                }
                Segment::Currency => {
                    assert_eq!(schedule.lot, LotSizing::Fixed(1000));
                    assert!(schedule.transaction_tax.is_none());
                    assert!(schedule.stamp_buy_pct.is_none());
                }
                Segment::Commodity => {
                    assert_eq!(schedule.lot, LotSizing::FromInput);
                    assert_eq!(schedule.transaction_tax.map(|t| t.kind), Some(TaxKind::Ctt));
                }
            }
        }
    }

    #[test]
    fn transaction_tax_is_on_sell_side_except_commodity_futures() {
        for schedule in ChargeSchedule::all() {
            let Some(tax) = schedule.transaction_tax else {
                continue;
            };
            let expected = if schedule.category == InstrumentCategory::CommodityFutures {
                ChargeBase::Turnover
            } else {
                ChargeBase::SellValue
            };
            assert_eq!(tax.base, expected, "{}", schedule.category);
        }
    }
}
