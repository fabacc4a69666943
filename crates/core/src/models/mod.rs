pub mod availability;
pub mod booking;
pub mod review;
pub mod schedule;
pub mod service;
pub mod staff;
pub mod time_slot;
