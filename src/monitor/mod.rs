pub mod topology;
pub mod types;

pub use topology::MonitorTopology;
pub use types::{MonitorRegion, TaskbarPosition, TaskbarRegion};
