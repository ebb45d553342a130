//! One detector per boundary strategy

mod edges;

pub mod change;
pub mod persistent;
pub mod separate;
pub mod step;
pub mod trigger;

pub use change::{StateChangeDetector, ValueChangeDetector};
pub use persistent::PersistentStateDetector;
pub use separate::SeparateStartEndDetector;
pub use step::StepSequenceDetector;
pub use trigger::TriggerEdgeDetector;
