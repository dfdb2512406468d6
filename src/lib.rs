#![no_std]

#[macro_use]
mod log;

mod error;

pub mod config;
pub mod interface;
pub mod max31855;
pub mod max31856;
pub mod params;
pub mod registers;

pub use crate::error::{Error, Result};
pub use crate::max31855::Max31855;
pub use crate::max31856::Max31856;
