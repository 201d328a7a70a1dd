//! Item model and the pure filter/sort/lifecycle engine shared by the
//! cart server, client, and tools.
//!
//! Nothing in this crate performs I/O. The engine derives a displayed item
//! sequence from a collection given a filter, a view, and a sort key; the
//! lifecycle module encodes the status state machine those views drive.

pub mod filter;
pub mod item;
pub mod lifecycle;
pub mod sample;
pub mod sort;
pub mod view;

pub use filter::*;
pub use item::*;
pub use lifecycle::*;
pub use sample::sample_items;
pub use sort::*;
pub use view::*;
