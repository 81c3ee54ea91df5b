//! Domain logic for the campus map: normalized map space, the pan/zoom
//! viewport, pointer gesture handling, path tracing and room search.
//!
//! Nothing in this crate touches the DOM or the network.

pub mod coords;
pub mod filter;
pub mod interaction;
pub mod models;
pub mod path;
pub mod session;
pub mod space;
pub mod viewport;
