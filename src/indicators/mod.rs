//! Rolling-window technical indicators

pub mod bollinger;

pub use bollinger::*;
