//! Domain types: bars, closed positions, trade records.

pub mod bar;
pub mod position;
pub mod trade;

pub use bar::Bar;
pub use position::{ClosedPosition, Direction};
pub use trade::TradeRecord;
