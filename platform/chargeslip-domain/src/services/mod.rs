pub mod charges;
pub mod quantity;
pub mod schedule;
