pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod io;
pub mod paths;
pub mod payload;
pub mod project;
pub mod render;
pub mod store;

pub use error::{Result, TrackerError};
