pub mod format;

pub use format::{format_duration, format_mttr};
