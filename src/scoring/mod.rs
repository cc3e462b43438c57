pub mod breakdown;
pub mod engine;
pub mod factors;
pub mod policy;
pub mod validation;

pub use breakdown::{LineItem, ScoreBreakdown, Section};
pub use engine::{compute_breakdown, compute_breakdown_with};
pub use factors::RangeOp;
pub use policy::{default_policy, PointsPolicy, DEFAULT_EPOCH};
pub use validation::validate_policy;
