pub mod metric_names;
pub mod status;

pub use metric_names::*;
pub use status::*;
