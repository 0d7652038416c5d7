//! 도메인 타입.

mod signal;
mod stock;

pub use signal::{PriceSignal, Signal};
pub use stock::{CurrentRecord, HistoryRecord, NormalizedMetrics, StockSnapshot, WatchEntry};
