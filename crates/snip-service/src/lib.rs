//! Short link lifecycle service.
//!
//! [`LinkService`] implements [`snip_core::LinkManager`] on top of any
//! [`snip_core::Repository`], choosing the identifier that is encoded into
//! each short code according to its [`IdStrategy`].

pub mod service;
pub mod strategy;

pub use service::LinkService;
pub use strategy::IdStrategy;
