pub mod booking;
pub mod slot;

pub use booking::{Booking, BookingStatus};
pub use slot::Slot;
