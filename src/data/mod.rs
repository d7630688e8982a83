pub mod csv;
pub mod gates;
pub mod sample;

pub use csv::{load_csv, parse_csv, LabelMode};
pub use gates::Gate;
pub use sample::Sample;
