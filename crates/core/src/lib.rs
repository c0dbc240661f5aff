#![forbid(unsafe_code)]

pub mod filter;
pub mod model;
pub mod time;

pub use filter::{FilterError, FilterMode, Selection};
pub use time::Clock;
