//! External collaborators of the catalogue write path.
//!
//! - [`ObjectStore`]: binary storage for uploaded images, backed by S3 or
//!   the local filesystem.
//! - [`ProcessingTrigger`]: notifies the downstream image pipeline that a
//!   new original is available.
//!
//! Both are object-safe traits so the API layer can hold them as
//! `Arc<dyn ...>` and tests can substitute fakes.

pub mod local;
pub mod object_store;
pub mod s3;
pub mod trigger;

pub use local::LocalObjectStore;
pub use object_store::{ObjectStore, ObjectStoreError, StoredObject};
pub use s3::{S3ObjectStore, S3Settings};
pub use trigger::{
    HttpProcessingTrigger, NoopProcessingTrigger, ProcessingRequest, ProcessingTrigger,
    TriggerError,
};
