use crate::value_objects::venue::Venue;
use serde::{Deserialize, Serialize};

/// Numbers fed to the fee engine for one calculation.
///
/// Producers coerce missing or malformed fields to zero before building this;
/// the engine computes mechanically on whatever it receives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeInput {
    pub buy_price: f64,
    pub sell_price: f64,
    pub quantity: f64,
    pub venue: Venue,
    /// Carried for display; no charge depends on it.
    pub strike_price: f64,
    pub lot_multiplier: u32,
}

impl Default for TradeInput {
    fn default() -> Self {
        Self {
            buy_price: 0.0,
            sell_price: 0.0,
            quantity: 0.0,
            venue: Venue::Nse,
            strike_price: 0.0,
            lot_multiplier: 1,
        }
    }
}

impl TradeInput {
    pub fn new(buy_price: f64, sell_price: f64, quantity: f64) -> Self {
        Self {
            buy_price,
            sell_price,
            quantity,
            ..Self::default()
        }
    }

    pub fn with_venue(mut self, venue: Venue) -> Self {
        self.venue = venue;
        self
    }

    pub fn with_strike(mut self, strike_price: f64) -> Self {
        self.strike_price = strike_price;
        self
    }

    pub fn with_lot_multiplier(mut self, lot_multiplier: u32) -> Self {
        self.lot_multiplier = lot_multiplier;
        self
    }
}
