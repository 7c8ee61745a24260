use crate::{
    availability::can_book,
    backend::{Storage, StorageResult},
    error::StorageError,
    fixtures::example_classes,
    identifier::fresh_id,
    types::{Booking, Class},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::debug;

#[derive(Debug, Default)]
struct VolatileData {
    classes: HashMap<String, Class>,
    bookings: HashMap<i32, Booking>,
    last_booking_id: i32,
}

/// Keeps everything in memory. All data is lost when the process exits.
#[derive(Debug, Clone)]
pub struct VolatileStorage {
    data: Arc<Mutex<VolatileData>>,
}

impl VolatileStorage {
    pub fn new() -> Self {
        let classes = example_classes()
            .into_iter()
            .map(|class| (class.id.clone(), class))
            .collect();

        Self {
            data: Arc::new(Mutex::new(VolatileData {
                classes,
                ..Default::default()
            })),
        }
    }

    fn data(&self) -> StorageResult<MutexGuard<'_, VolatileData>> {
        self.data.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl Default for VolatileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for VolatileStorage {
    fn add_class(&self, class: Class) -> StorageResult<String> {
        let mut data = self.data()?;
        let id = fresh_id(&class.name, |candidate| {
            Ok(data.classes.contains_key(candidate))
        })?;

        debug!(%id, name = %class.name, "adding class");
        data.classes.insert(
            id.clone(),
            Class {
                id: id.clone(),
                ..class
            },
        );
        Ok(id)
    }

    fn classes(&self) -> StorageResult<Vec<Class>> {
        Ok(self.data()?.classes.values().cloned().collect())
    }

    fn class(&self, id: &str) -> StorageResult<Class> {
        self.data()?
            .classes
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::ClassNotFound(id.into()))
    }

    fn update_class(&self, id: &str, class: Class) -> StorageResult<()> {
        let mut data = self.data()?;
        let Some(stored) = data.classes.get_mut(id) else {
            return Err(StorageError::ClassNotFound(id.into()));
        };

        debug!(%id, "updating class");
        *stored = Class {
            id: id.into(),
            ..class
        };
        Ok(())
    }

    fn delete_class(&self, id: &str) -> StorageResult<()> {
        if self.data()?.classes.remove(id).is_some() {
            debug!(%id, "deleted class");
        }
        Ok(())
    }

    fn add_booking(&self, booking: Booking) -> StorageResult<i32> {
        let mut data = self.data()?;
        let class = data
            .classes
            .get(&booking.class)
            .ok_or_else(|| StorageError::ClassNotFound(booking.class.clone()))?;

        if !can_book(&booking, class) {
            return Err(StorageError::Unavailable {
                class: booking.class,
                date: booking.date,
            });
        }

        data.last_booking_id += 1;
        let id = data.last_booking_id;
        debug!(id, class = %booking.class, "adding booking");
        data.bookings.insert(id, Booking { id, ..booking });
        Ok(id)
    }

    fn bookings(&self) -> StorageResult<Vec<Booking>> {
        Ok(self.data()?.bookings.values().cloned().collect())
    }

    fn booking(&self, id: i32) -> StorageResult<Booking> {
        self.data()?
            .bookings
            .get(&id)
            .cloned()
            .ok_or(StorageError::BookingNotFound(id))
    }

    fn update_booking(&self, id: i32, booking: Booking) -> StorageResult<()> {
        let mut data = self.data()?;
        let Some(stored) = data.bookings.get_mut(&id) else {
            return Err(StorageError::BookingNotFound(id));
        };

        debug!(id, "updating booking");
        *stored = Booking { id, ..booking };
        Ok(())
    }

    fn delete_booking(&self, id: i32) -> StorageResult<()> {
        if self.data()?.bookings.remove(&id).is_some() {
            debug!(id, "deleted booking");
        }
        Ok(())
    }

    fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}
