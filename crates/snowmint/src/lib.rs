//! Coordination-free 64-bit Snowflake IDs.
//!
//! Every [`SnowflakeId`] packs a 41-bit millisecond timestamp (relative to a
//! configurable epoch), a 5-bit datacenter ID, a 5-bit worker ID and a 12-bit
//! per-millisecond sequence. Generators with distinct datacenter/worker pairs
//! never collide, and IDs from one generator sort by mint time.
//!
//! ```
//! use snowmint::SnowflakeGenerator;
//!
//! let mut generator = SnowflakeGenerator::new(1, 1)?;
//! let id = generator.mint()?;
//!
//! let parts = id.parts();
//! assert_eq!((parts.datacenter, parts.worker), (1, 1));
//! assert_eq!(id.to_string().parse::<snowmint::SnowflakeId>(), Ok(id));
//! # Ok::<(), snowmint::Error>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
mod sequence;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::sequence::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
