//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the types shared by the encoder, the storage
//! backends, the lifecycle service and the HTTP gateway.

pub mod error;
pub mod manager;
pub mod range;
pub mod repository;
pub mod shortcode;

pub use error::{CoreError, LinkError, StorageError};
pub use manager::LinkManager;
pub use range::ListRange;
pub use repository::{NewShortLink, ReadRepository, Repository, ShortLink};
pub use shortcode::ShortCode;
