pub mod buckets;
pub mod distribution;
pub mod focus;
pub mod goals;
pub mod streak;
pub mod summary;
pub mod types;

pub use buckets::generate_buckets;
pub use distribution::{category_distribution, project_distribution};
pub use focus::{focus_score, FocusInputs};
pub use goals::{mean_completion, project_goals};
pub use streak::compute_streak;
pub use summary::{compare, summarize};
pub use types::*;
