pub mod builtin;
pub mod registry;
pub mod table;

pub use registry::RateTableRegistry;
pub use table::{AgeGroup, CostLookup, CostOfChildrenTable, CostSchedule, FtbRates, RateTable};
