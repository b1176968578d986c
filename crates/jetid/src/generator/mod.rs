mod client;
mod lock;
mod status;

pub use client::*;
pub use lock::*;
pub use status::*;
