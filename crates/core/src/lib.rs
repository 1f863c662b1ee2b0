#![forbid(unsafe_code)]

pub mod error;
pub mod format;
pub mod forms;
pub mod model;
pub mod redirect;
pub mod scoring;
pub mod time;

pub use error::Error;
pub use time::Clock;
