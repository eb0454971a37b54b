pub mod maintenance_income;
pub mod part_b;

pub use maintenance_income::{calculate_ftb_impact, FtbImpact};
pub use part_b::{PartBCheck, PartBEligibility};
