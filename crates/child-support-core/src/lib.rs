pub mod aggregate;
pub mod assessment;
pub mod config;
pub mod error;
pub mod estimate;
pub mod ftb;
pub mod input;
pub mod rates;
pub mod scoring;
pub mod types;

pub use error::ChildSupportError;

/// Standard result type for all child support computations
pub type ChildSupportResult<T> = Result<T, ChildSupportError>;
