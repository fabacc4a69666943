//! Transactional operations on the booking store.
//!
//! Every public function here opens exactly one short transaction, does its
//! reads and writes through the row locks it needs, and commits. Failures
//! roll back by dropping the transaction, so callers never observe partial
//! writes.

pub mod catalog;
pub mod history;
pub mod reservation;
pub mod reviews;
pub mod schedule;
