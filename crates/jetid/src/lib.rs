#![doc = include_str!("../README.md")]

mod engine;
mod error;
mod generator;
mod id;
mod inspect;
mod repr;
mod rrn;
mod short;
mod time;

pub use crate::engine::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::inspect::*;
pub use crate::repr::*;
pub use crate::rrn::*;
pub use crate::short::*;
pub use crate::time::*;
