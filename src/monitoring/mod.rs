pub mod dedupe;
pub mod delta;

pub use dedupe::dedupe;
pub use delta::{annotate_with_delta, summarize_delta, DeltaSummary};
