pub mod account;
pub mod admin;
pub mod auth;
pub mod bookings;
pub mod dev;
pub mod health;
