mod default;
mod fixed;
mod func;
mod interface;

pub use default::*;
pub use fixed::*;
pub use func::*;
pub use interface::*;
