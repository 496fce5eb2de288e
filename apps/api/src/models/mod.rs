pub mod event;
pub mod schedule;
pub mod user;
