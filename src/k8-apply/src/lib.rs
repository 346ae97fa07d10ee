mod apply;
mod client;
mod error;
mod in_memory;
pub mod merge;

pub use apply::*;
pub use client::*;
pub use error::ApplyError;
pub use in_memory::CallCount;
pub use in_memory::InMemoryClient;
pub use in_memory::InMemoryError;
pub use merge::OwnedFields;
