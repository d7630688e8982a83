pub mod metrics;
pub mod model;
pub mod predict;
pub mod train;
