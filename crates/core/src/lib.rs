//! # SalonBook Core
//!
//! Domain types and the pure parts of the slot-allocation engine: the
//! slot-run finder, calendar/window arithmetic, reservation planning and the
//! availability query. Nothing in this crate performs I/O directly; storage is
//! reached through the [`availability::SlotCatalog`] trait.

pub mod availability;
pub mod calendar;
pub mod errors;
pub mod finder;
pub mod models;
pub mod reservation;
