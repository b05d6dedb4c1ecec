//! Value records shared by every stage of the engine.

pub mod records;
pub mod series;

pub use records::{CombinedFlowRecord, FlowLeg, FlowPoint, FlowType, NetPremiumRecord};
pub use series::{DateSeries, NamedSeries, parse_iso_date};
