/// Quantity affordable with `amount` at `buy_price`, rounded down.
///
/// A non-positive buy price leaves `current` untouched.
pub fn quantity_from_amount(amount: f64, buy_price: f64, current: f64) -> f64 {
    if buy_price > 0.0 {
        (amount / buy_price).floor()
    } else {
        current
    }
}
