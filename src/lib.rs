//! SliitScope: hide and show course modules on a portal page.
//!
//! The control surface lists the page's modules grouped by term
//! (`YYYY - Y#.S#`), filtered, searched and sorted. Hiding a module persists
//! its id in a durable store and tells the page agent to re-apply the set.
//!
//! - [`data`] - module model, catalog loading, list processing
//! - [`session`] - hidden-set manager, sync notifier, session controller
//! - [`agent`] - page agent context (catalog owner, visibility enforcement)
//! - [`store`] - durable key-value store
//! - [`app`], [`state`], [`ui`] - egui control surface

pub mod agent;
pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod session;
pub mod state;
pub mod store;
pub mod theme;
pub mod ui;

pub use error::{Error, Result};
