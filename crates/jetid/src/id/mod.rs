mod core_id;
mod full_id;

pub use core_id::*;
pub use full_id::*;
