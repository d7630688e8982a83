pub mod record;
pub mod store;

pub use record::{ModelRecord, RECORD_VERSION};
pub use store::{ModelStore, DEFAULT_MODEL_PATH};
