use crate::types::{Booking, Class};

/// A class can be booked strictly inside its window, never on the first or last day.
pub fn can_book(booking: &Booking, class: &Class) -> bool {
    class.start_date < booking.date && booking.date < class.end_date
}
