mod basic;
mod lock;
mod mutex;
mod status;

pub use basic::*;
pub use lock::*;
pub(crate) use mutex::*;
pub use status::*;
