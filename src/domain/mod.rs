pub mod input;
pub mod types;

pub use input::{Attachment, ClassificationRequest, InputError};
pub use types::{ClassificationResult, Priority};
