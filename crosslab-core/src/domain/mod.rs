//! Domain types for CrossLab

pub mod bar;
pub mod ids;
pub mod instrument;
pub mod order;
pub mod position;

pub use bar::{Bar, BarType};
pub use ids::{ClientOrderId, OrderIdGenerator};
pub use instrument::{AssetClass, Instrument};
pub use order::{BracketOrder, EntryKind, EntryOrder, OrderSide, StopLossOrder, TakeProfitOrder};
pub use position::{Position, PositionSide};
