//! Row structs and DTOs.
//!
//! Each submodule holds a `FromRow` + `Serialize` struct for the table row
//! and, where the table is written from request input, `Deserialize` DTOs
//! for inserts and patches. [`catalog`] holds the composed read models.

pub mod artist;
pub mod catalog;
pub mod gallery;
pub mod gallery_print;
pub mod image;
pub mod print;
pub mod translation;
