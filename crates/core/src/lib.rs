//! Domain logic for the atelier catalog.
//!
//! Everything here is free of I/O so it can be shared by the repository
//! layer, the HTTP API and tests:
//!
//! - [`ordering`] -- the dense gallery/print ordering state machine.
//! - [`translation`] -- entity/field keys and display-text fallback.
//! - [`pagination`] -- page arithmetic for listing endpoints.
//! - [`catalog`] -- publication status, filters and input validators.

pub mod catalog;
pub mod error;
pub mod language;
pub mod ordering;
pub mod pagination;
pub mod translation;
pub mod types;
