#![forbid(unsafe_code)]

pub mod model;
pub mod runtime;
pub mod time;

pub use time::Clock;
