pub mod booking;
pub mod client;
pub mod review;
pub mod service;
pub mod staff;
pub mod time_slot;
