use serde::{Deserialize, Serialize};

/// Named line of a breakdown, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeKind {
    Turnover,
    Brokerage,
    Stt,
    #[serde(rename = "etc")]
    ExchangeCharge,
    Gst,
    Ctt,
    Sebi,
    Stamp,
    Total,
    Pnl,
}

impl ChargeKind {
    pub const DISPLAY_ORDER: [ChargeKind; 10] = [
        ChargeKind::Turnover,
        ChargeKind::Brokerage,
        ChargeKind::Stt,
        ChargeKind::ExchangeCharge,
        ChargeKind::Gst,
        ChargeKind::Ctt,
        ChargeKind::Sebi,
        ChargeKind::Stamp,
        ChargeKind::Total,
        ChargeKind::Pnl,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Turnover => "turnover",
            Self::Brokerage => "brokerage",
            Self::Stt => "stt",
            Self::ExchangeCharge => "etc",
            Self::Gst => "gst",
            Self::Ctt => "ctt",
            Self::Sebi => "sebi",
            Self::Stamp => "stamp",
            Self::Total => "total",
            Self::Pnl => "pnl",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Turnover => "Turnover",
            Self::Brokerage => "Brokerage",
            Self::Stt => "STT total",
            Self::ExchangeCharge => "Exchange txn charge",
            Self::Gst => "GST",
            Self::Ctt => "CTT",
            Self::Sebi => "SEBI charges",
            Self::Stamp => "Stamp duty",
            Self::Total => "Total tax and charges",
            Self::Pnl => "Net P&L",
        }
    }
}

/// Result of one fee calculation. Optional components are `None` for
/// categories whose schedule does not levy them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    pub buy_value: f64,
    pub sell_value: f64,
    pub turnover: f64,
    pub brokerage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctt: Option<f64>,
    #[serde(rename = "etc")]
    pub exchange_charge: f64,
    pub gst: f64,
    pub sebi: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp: Option<f64>,
    pub total: f64,
    pub pnl: f64,
}

impl ChargeBreakdown {
    pub fn get(&self, kind: ChargeKind) -> Option<f64> {
        match kind {
            ChargeKind::Turnover => Some(self.turnover),
            ChargeKind::Brokerage => Some(self.brokerage),
            ChargeKind::Stt => self.stt,
            ChargeKind::ExchangeCharge => Some(self.exchange_charge),
            ChargeKind::Gst => Some(self.gst),
            ChargeKind::Ctt => self.ctt,
            ChargeKind::Sebi => Some(self.sebi),
            ChargeKind::Stamp => self.stamp,
            ChargeKind::Total => Some(self.total),
            ChargeKind::Pnl => Some(self.pnl),
        }
    }

    /// Components that apply to this breakdown, in display order.
    pub fn entries(&self) -> Vec<(ChargeKind, f64)> {
        ChargeKind::DISPLAY_ORDER
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|v| (kind, v)))
            .collect()
    }
}
