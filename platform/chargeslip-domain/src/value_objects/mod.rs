pub mod charges;
pub mod commodity;
pub mod instrument;
pub mod snapshot;
pub mod trade_input;
pub mod venue;
