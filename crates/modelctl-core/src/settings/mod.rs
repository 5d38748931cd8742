pub mod loading;
pub mod types;

pub use loading::{load_hierarchy, load_or_default, merge_settings, validate_settings};
pub use types::{CliSettings, OutputFormat};
