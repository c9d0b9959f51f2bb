//! Domain rules for the office QR backend.
//!
//! Pure types, constants, and functions shared by the persistence layer,
//! the generation pipeline, and the HTTP API. Nothing here performs I/O.

pub mod error;
pub mod ids;
pub mod pagination;
pub mod qr_batch;
pub mod templating;
pub mod types;
