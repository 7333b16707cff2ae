pub mod booking;
pub mod user;
pub mod vehicle;
pub mod wire;

pub use booking::{BookingDetails, BookingId, BookingRecord, BookingStats, BookingStatus, ValidationError};
pub use user::{Caller, Principal, UserProfile, UserRole};
pub use vehicle::{Vehicle, FLEET};

#[cfg(test)]
pub(crate) fn sample_details(phone: &str) -> BookingDetails {
    BookingDetails {
        name: "Asha".to_string(),
        phone: phone.to_string(),
        pickup: "Station Road".to_string(),
        dropoff: "Airport".to_string(),
        date: "2025-06-16".to_string(),
        time: "09:30".to_string(),
        vehicle: "innova".to_string(),
        notes: String::new(),
    }
}
