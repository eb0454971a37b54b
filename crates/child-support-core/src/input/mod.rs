pub mod coerce;
pub mod model;
pub mod normalizer;

pub use model::{AssessmentInput, Child, LeadContext, Parent, RelevantDependents};
pub use normalizer::{normalize, normalize_as_of};
