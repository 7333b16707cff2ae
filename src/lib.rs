//! Booking backend for a ground-transport operator: customers submit and look
//! up bookings, administrators manage them and assign roles.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
