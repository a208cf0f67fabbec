//! Structured, sortable 64-bit identifiers.
//!
//! An id is a signed 64-bit integer whose bits are split into named fields
//! (timestamp, origin, sequence) by a [`Layout`]. The crate provides:
//!
//! - a bit-layout codec: [`Layout::pack`] and [`Layout::unpack`], with every
//!   value range-checked before a bit is written;
//! - [`FreeRunningGenerator`], which pairs the clock with a shared atomic
//!   counter and never blocks;
//! - [`MonotonicGenerator`], which issues strictly increasing ids under a
//!   lock and refuses to run on a clock that moved backwards;
//! - a canonical decimal text form: [`StructuredId::parse`] and `Display`.
//!
//! ```
//! use tessera::{EpochClock, Layout, MonotonicGenerator, StructuredId};
//!
//! let generator = MonotonicGenerator::builder(Layout::regional())
//!     .region(2)
//!     .machine(17)
//!     .build(EpochClock::default())
//!     .unwrap();
//!
//! let id = generator.next_id().unwrap();
//! let text = id.to_string();
//! assert_eq!(StructuredId::parse(&text).unwrap(), id);
//!
//! let fields = Layout::regional().unpack(id);
//! assert_eq!(fields.get("machine"), Some(17));
//! ```
//!
//! ## Features
//!
//! - `parking-lot`: use `parking_lot::Mutex` instead of `std::sync::Mutex`
//! - `cache-padded`: pad the shared counter and generator state to a cache
//!   line
//! - `tracing`: trace-level spans on generator calls, plus events on clock
//!   rollback and sequence exhaustion
//! - `serde`: (de)serialize ids and field values

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
mod layout;
mod rand;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::layout::*;
pub use crate::rand::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
