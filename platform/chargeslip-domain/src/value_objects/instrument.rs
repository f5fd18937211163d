use serde::{Deserialize, Serialize};

/// Market segment a category is listed under. The UI groups categories by
/// segment into main tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Equity,
    Currency,
    Commodity,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Equity, Segment::Currency, Segment::Commodity];

    pub fn label(self) -> &'static str {
        match self {
            Segment::Equity => "Equity",
            Segment::Currency => "Currency",
            Segment::Commodity => "Commodity",
        }
    }

    pub fn categories(self) -> &'static [InstrumentCategory] {
        match self {
            Segment::Equity => &[
                InstrumentCategory::IntradayEquity,
                InstrumentCategory::DeliveryEquity,
                InstrumentCategory::EquityFutures,
                InstrumentCategory::EquityOptions,
            ],
            Segment::Currency => &[
                InstrumentCategory::CurrencyFutures,
                InstrumentCategory::CurrencyOptions,
            ],
            Segment::Commodity => &[
                InstrumentCategory::CommodityFutures,
                InstrumentCategory::CommodityOptions,
            ],
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentCategory {
    #[default]
    IntradayEquity,
    DeliveryEquity,
    EquityFutures,
    EquityOptions,
    CurrencyFutures,
    CurrencyOptions,
    CommodityFutures,
    CommodityOptions,
}

impl InstrumentCategory {
    pub const ALL: [InstrumentCategory; 8] = [
        InstrumentCategory::IntradayEquity,
        InstrumentCategory::DeliveryEquity,
        InstrumentCategory::EquityFutures,
        InstrumentCategory::EquityOptions,
        InstrumentCategory::CurrencyFutures,
        InstrumentCategory::CurrencyOptions,
        InstrumentCategory::CommodityFutures,
        InstrumentCategory::CommodityOptions,
    ];

    /// Position in [`InstrumentCategory::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        let normalized = value.trim().to_lowercase().replace(['-', ' '], "_");
        let category = match normalized.as_str() {
            "intraday_equity" | "intraday" | "intra" => Self::IntradayEquity,
            "delivery_equity" | "delivery" | "del" => Self::DeliveryEquity,
            "equity_futures" | "futures" | "fut" => Self::EquityFutures,
            "equity_options" | "options" | "opt" => Self::EquityOptions,
            "currency_futures" | "curr_fut" => Self::CurrencyFutures,
            "currency_options" | "curr_opt" => Self::CurrencyOptions,
            "commodity_futures" | "comm_fut" => Self::CommodityFutures,
            "commodity_options" | "comm_opt" => Self::CommodityOptions,
            _ => return Err(format!("unsupported instrument category: {value}")),
        };
        Ok(category)
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::IntradayEquity => "intraday_equity",
            Self::DeliveryEquity => "delivery_equity",
            Self::EquityFutures => "equity_futures",
            Self::EquityOptions => "equity_options",
            Self::CurrencyFutures => "currency_futures",
            Self::CurrencyOptions => "currency_options",
            Self::CommodityFutures => "commodity_futures",
            Self::CommodityOptions => "commodity_options",
        }
    }

    /// Sub-tab label within the segment.
    pub fn label(self) -> &'static str {
        match self {
            Self::IntradayEquity => "Intraday",
            Self::DeliveryEquity => "Delivery",
            Self::EquityFutures | Self::CurrencyFutures | Self::CommodityFutures => "Futures",
            Self::EquityOptions | Self::CurrencyOptions | Self::CommodityOptions => "Options",
        }
    }

    pub fn segment(self) -> Segment {
        match self {
            Self::IntradayEquity | Self::DeliveryEquity | Self::EquityFutures | Self::EquityOptions => {
                Segment::Equity
            }
            Self::CurrencyFutures | Self::CurrencyOptions => Segment::Currency,
            Self::CommodityFutures | Self::CommodityOptions => Segment::Commodity,
        }
    }

    pub fn uses_venue(self) -> bool {
        self.segment() == Segment::Equity
    }

    pub fn uses_commodity(self) -> bool {
        self.segment() == Segment::Commodity
    }

    pub fn takes_strike(self) -> bool {
        matches!(self, Self::CurrencyOptions | Self::CommodityOptions)
    }
}

impl std::fmt::Display for InstrumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
