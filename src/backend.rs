use crate::error::StorageError;
use crate::types::{Booking, Class};

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence for classes and bookings. The HTTP layer only talks to this trait,
/// the concrete backend is picked once at startup.
///
/// Missing ids behave the same in every backend: lookups and updates fail with a
/// not-found error, deletes succeed without doing anything.
pub trait Storage: Clone + Send + Sync + 'static {
    /// Stores `class` under a newly generated id and returns that id.
    /// Whatever id the caller put into `class` is ignored.
    fn add_class(&self, class: Class) -> StorageResult<String>;
    fn classes(&self) -> StorageResult<Vec<Class>>;
    fn class(&self, id: &str) -> StorageResult<Class>;
    /// Replaces the class stored under `id`; the stored record keeps `id`.
    fn update_class(&self, id: &str, class: Class) -> StorageResult<()>;
    fn delete_class(&self, id: &str) -> StorageResult<()>;

    /// Stores `booking` under the next free id if its class exists and is
    /// available on the booking date.
    fn add_booking(&self, booking: Booking) -> StorageResult<i32>;
    fn bookings(&self) -> StorageResult<Vec<Booking>>;
    fn booking(&self, id: i32) -> StorageResult<Booking>;
    /// Replaces the booking stored under `id` without checking availability again.
    fn update_booking(&self, id: i32, booking: Booking) -> StorageResult<()>;
    fn delete_booking(&self, id: i32) -> StorageResult<()>;

    /// Releases the backend's resources. Called once on shutdown.
    fn close(&self) -> StorageResult<()>;
}
