pub mod assess;
pub mod enquiry;
pub mod estimate;
pub mod rates;
