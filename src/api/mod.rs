pub mod client;
pub mod payload;
pub mod response;

pub use client::{ClassifierClient, ClientError};
pub use payload::build_payload;
