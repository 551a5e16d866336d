//! Persistent operator parameters

pub mod store;

pub use store::{ParameterStore, PersistError, TAG_ABSENT, TAG_VALID};
