// Shared errors
pub mod media_error;

pub use media_error::*;
