use crate::{
    availability::can_book,
    backend::{Storage, StorageResult},
    error::{ErrorKind, StorageError},
    fixtures::example_classes,
    identifier::fresh_id,
    schema::{booking, class, SCHEMA},
    types::{Booking, Class},
};
use diesel::{
    connection::SimpleConnection,
    dsl::{exists, max},
    prelude::*,
    sqlite::SqliteConnection,
};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

/// How long a connection waits for another writer's lock before failing.
const BUSY_TIMEOUT_MS: u32 = 5000;

/// SQLite backed storage. The connection is shared between clones and dropped on [`Storage::close`].
#[derive(Clone)]
pub struct DatabaseInterface {
    connection: Arc<Mutex<Option<SqliteConnection>>>,
}

impl DatabaseInterface {
    /// Opens (or creates) the database at `database_path`, creates missing tables and
    /// seeds the example classes. `":memory:"` gives a throwaway database.
    pub fn new(database_path: &str) -> StorageResult<Self> {
        let mut connection = Self::establish_connection(database_path)?;
        connection.batch_execute(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"))?;

        let seeded = connection.immediate_transaction::<_, StorageError, _>(|connection| {
            connection.batch_execute(SCHEMA)?;

            let mut seeded = 0;
            for fixture in example_classes() {
                seeded += diesel::insert_or_ignore_into(class::table)
                    .values(&fixture)
                    .execute(connection)?;
            }
            Ok(seeded)
        })?;
        info!(database_path, seeded, "database ready");

        Ok(Self {
            connection: Arc::new(Mutex::new(Some(connection))),
        })
    }

    fn establish_connection(database_path: &str) -> Result<SqliteConnection, diesel::ConnectionError> {
        SqliteConnection::establish(database_path)
    }

    fn with_connection<T, F>(&self, operation: F) -> StorageResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> StorageResult<T>,
    {
        let mut connection = self.connection.lock().map_err(|_| StorageError::Poisoned)?;
        let connection = connection.as_mut().ok_or(StorageError::Closed)?;

        operation(connection).map_err(|err| {
            if err.kind() == ErrorKind::IoFailure {
                error!(%err, "database operation failed");
            }
            err
        })
    }
}

impl Storage for DatabaseInterface {
    fn add_class(&self, new_class: Class) -> StorageResult<String> {
        self.with_connection(|connection| {
            connection.immediate_transaction(|connection| {
                let id = fresh_id(&new_class.name, |candidate| {
                    Ok(diesel::select(exists(class::table.find(candidate)))
                        .get_result::<bool>(connection)?)
                })?;

                diesel::insert_into(class::table)
                    .values(&Class {
                        id: id.clone(),
                        ..new_class
                    })
                    .execute(connection)?;
                debug!(%id, "added class");
                Ok(id)
            })
        })
    }

    fn classes(&self) -> StorageResult<Vec<Class>> {
        self.with_connection(|connection| {
            Ok(class::table.select(Class::as_select()).load(connection)?)
        })
    }

    fn class(&self, id: &str) -> StorageResult<Class> {
        self.with_connection(|connection| {
            class::table
                .find(id)
                .select(Class::as_select())
                .first(connection)
                .optional()?
                .ok_or_else(|| StorageError::ClassNotFound(id.into()))
        })
    }

    fn update_class(&self, id: &str, updated: Class) -> StorageResult<()> {
        self.with_connection(|connection| {
            let changed = diesel::update(class::table.find(id))
                .set((
                    class::name.eq(updated.name),
                    class::start_date.eq(updated.start_date),
                    class::end_date.eq(updated.end_date),
                    class::capacity.eq(updated.capacity),
                ))
                .execute(connection)?;

            match changed {
                0 => Err(StorageError::ClassNotFound(id.into())),
                _ => Ok(()),
            }
        })
    }

    fn delete_class(&self, id: &str) -> StorageResult<()> {
        self.with_connection(|connection| {
            let deleted = diesel::delete(class::table.find(id)).execute(connection)?;
            debug!(%id, deleted, "delete class");
            Ok(())
        })
    }

    fn add_booking(&self, new_booking: Booking) -> StorageResult<i32> {
        self.with_connection(|connection| {
            // The write lock is taken up front, so `max(id) + 1` can't race another writer.
            connection.immediate_transaction(|connection| {
                let booked_class = class::table
                    .find(new_booking.class.as_str())
                    .select(Class::as_select())
                    .first(connection)
                    .optional()?
                    .ok_or_else(|| StorageError::ClassNotFound(new_booking.class.clone()))?;

                if !can_book(&new_booking, &booked_class) {
                    return Err(StorageError::Unavailable {
                        class: new_booking.class,
                        date: new_booking.date,
                    });
                }

                let last_id: Option<i32> = booking::table
                    .select(max(booking::id))
                    .get_result(connection)?;
                let id = last_id.unwrap_or(0) + 1;

                diesel::insert_into(booking::table)
                    .values(&Booking { id, ..new_booking })
                    .execute(connection)?;
                debug!(id, "added booking");
                Ok(id)
            })
        })
    }

    fn bookings(&self) -> StorageResult<Vec<Booking>> {
        self.with_connection(|connection| {
            Ok(booking::table
                .select(Booking::as_select())
                .load(connection)?)
        })
    }

    fn booking(&self, id: i32) -> StorageResult<Booking> {
        self.with_connection(|connection| {
            booking::table
                .find(id)
                .select(Booking::as_select())
                .first(connection)
                .optional()?
                .ok_or(StorageError::BookingNotFound(id))
        })
    }

    fn update_booking(&self, id: i32, updated: Booking) -> StorageResult<()> {
        self.with_connection(|connection| {
            let changed = diesel::update(booking::table.find(id))
                .set((
                    booking::date.eq(updated.date),
                    booking::customer.eq(updated.customer),
                    booking::class.eq(updated.class),
                ))
                .execute(connection)?;

            match changed {
                0 => Err(StorageError::BookingNotFound(id)),
                _ => Ok(()),
            }
        })
    }

    fn delete_booking(&self, id: i32) -> StorageResult<()> {
        self.with_connection(|connection| {
            let deleted = diesel::delete(booking::table.find(id)).execute(connection)?;
            debug!(id, deleted, "delete booking");
            Ok(())
        })
    }

    fn close(&self) -> StorageResult<()> {
        let mut connection = self.connection.lock().map_err(|_| StorageError::Poisoned)?;
        if connection.take().is_some() {
            info!("database connection closed");
        }
        Ok(())
    }
}
