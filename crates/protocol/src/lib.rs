//! Wire types for the experiment selector.
//!
//! Everything in this crate is the shape of data as it crosses a boundary:
//!
//! - [`PersistedValue`] - the text the host stores for a field
//! - [`ListingResponse`] - the remote experiment listing envelope
//! - [`WidgetConfig`] - the per-field configuration supplied by the host
//!
//! Types here carry no behavior beyond serialization and a few lookups.
//! The selection state machine built on top of them lives in `expsel`.

pub mod config;
pub mod listing;
pub mod value;

pub use config::*;
pub use listing::*;
pub use value::*;
