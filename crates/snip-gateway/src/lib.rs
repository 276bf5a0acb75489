//! HTTP/JSON gateway for the snip URL shortener.
//!
//! Exposes the [`snip_core::LinkManager`] operations under `/shorts`.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
