pub mod bookings;
pub mod gate;
pub mod identity;
pub mod lookup;
pub mod tokens;
