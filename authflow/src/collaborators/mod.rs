//! External collaborators consumed by the pipelines.
//!
//! The core only depends on the traits; the bundled implementations are
//! enough for tests and small deployments.

mod hasher;
mod store;

pub use hasher::{Hasher, Md5Hasher, Sha256Hasher};
#[cfg(test)]
pub use hasher::MockHasher;
pub use store::{DataStore, InMemoryDataStore};
