use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use chrono::NaiveDate;

use crate::{
    backend::{Storage, StorageResult},
    error::StorageError,
    types::{Booking, Class},
};

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub struct MockStorageInner {
    pub success: AtomicBool,
    pub calls_to_add_class: AtomicU64,
    pub calls_to_classes: AtomicU64,
    pub calls_to_class: AtomicU64,
    pub calls_to_update_class: AtomicU64,
    pub calls_to_delete_class: AtomicU64,
    pub calls_to_add_booking: AtomicU64,
    pub calls_to_bookings: AtomicU64,
    pub calls_to_booking: AtomicU64,
    pub calls_to_update_booking: AtomicU64,
    pub calls_to_delete_booking: AtomicU64,
    pub calls_to_close: AtomicU64,
    pub classes: Mutex<Vec<Class>>,
    pub bookings: Mutex<Vec<Booking>>,
}

/// Hands out what was put into `classes`/`bookings` and fails every call with an
/// I/O style error once `success` is switched off.
#[derive(Clone)]
pub struct MockStorage(pub Arc<MockStorageInner>);

impl MockStorageInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_add_class: AtomicU64::default(),
            calls_to_classes: AtomicU64::default(),
            calls_to_class: AtomicU64::default(),
            calls_to_update_class: AtomicU64::default(),
            calls_to_delete_class: AtomicU64::default(),
            calls_to_add_booking: AtomicU64::default(),
            calls_to_bookings: AtomicU64::default(),
            calls_to_booking: AtomicU64::default(),
            calls_to_update_booking: AtomicU64::default(),
            calls_to_delete_booking: AtomicU64::default(),
            calls_to_close: AtomicU64::default(),
            classes: Mutex::default(),
            bookings: Mutex::default(),
        }
    }
}

impl MockStorage {
    pub fn new() -> Self {
        Self(Arc::new(MockStorageInner::new()))
    }

    fn result(&self) -> StorageResult<()> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(StorageError::Poisoned),
        }
    }
}

impl Storage for MockStorage {
    fn add_class(&self, _class: Class) -> StorageResult<String> {
        self.0.calls_to_add_class.fetch_add(1, Ordering::SeqCst);
        self.result().map(|_| "MO0001".into())
    }

    fn classes(&self) -> StorageResult<Vec<Class>> {
        self.0.calls_to_classes.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.classes.lock().unwrap().clone())
    }

    fn class(&self, id: &str) -> StorageResult<Class> {
        self.0.calls_to_class.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        self.0
            .classes
            .lock()
            .unwrap()
            .iter()
            .find(|class| class.id == id)
            .cloned()
            .ok_or_else(|| StorageError::ClassNotFound(id.into()))
    }

    fn update_class(&self, _id: &str, _class: Class) -> StorageResult<()> {
        self.0.calls_to_update_class.fetch_add(1, Ordering::SeqCst);
        self.result()
    }

    fn delete_class(&self, _id: &str) -> StorageResult<()> {
        self.0.calls_to_delete_class.fetch_add(1, Ordering::SeqCst);
        self.result()
    }

    fn add_booking(&self, _booking: Booking) -> StorageResult<i32> {
        self.0.calls_to_add_booking.fetch_add(1, Ordering::SeqCst);
        self.result().map(|_| 1)
    }

    fn bookings(&self) -> StorageResult<Vec<Booking>> {
        self.0.calls_to_bookings.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.bookings.lock().unwrap().clone())
    }

    fn booking(&self, id: i32) -> StorageResult<Booking> {
        self.0.calls_to_booking.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        self.0
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|booking| booking.id == id)
            .cloned()
            .ok_or(StorageError::BookingNotFound(id))
    }

    fn update_booking(&self, _id: i32, _booking: Booking) -> StorageResult<()> {
        self.0.calls_to_update_booking.fetch_add(1, Ordering::SeqCst);
        self.result()
    }

    fn delete_booking(&self, _id: i32) -> StorageResult<()> {
        self.0.calls_to_delete_booking.fetch_add(1, Ordering::SeqCst);
        self.result()
    }

    fn close(&self) -> StorageResult<()> {
        self.0.calls_to_close.fetch_add(1, Ordering::SeqCst);
        self.result()
    }
}

/// Checks every backend has to pass. Each one expects a freshly opened storage
/// holding only the example classes.
pub mod conformance {
    use super::date;
    use crate::{
        backend::Storage,
        error::{ErrorKind, StorageError},
        types::{Booking, Class},
    };

    pub fn pilates_booking(customer: &str) -> Booking {
        Booking {
            id: 0,
            date: date("2020-01-31"),
            customer: customer.into(),
            class: "PI0001".into(),
        }
    }

    fn new_class(name: &str) -> Class {
        Class {
            id: String::new(),
            name: name.into(),
            start_date: date("2021-03-01"),
            end_date: date("2021-03-31"),
            capacity: 10,
        }
    }

    pub fn add_class_grows_listing<S: Storage>(storage: S) {
        let size = storage.classes().unwrap().len();

        let id = storage.add_class(new_class("Foo")).unwrap();

        let classes = storage.classes().unwrap();
        assert_eq!(classes.len(), size + 1);
        assert!(id.starts_with("FO"));
        assert!(classes.iter().any(|class| class.id == id && class.name == "Foo"));
    }

    pub fn add_class_ignores_caller_id<S: Storage>(storage: S) {
        let id = storage
            .add_class(Class {
                id: "PI0001".into(),
                ..new_class("Boxing")
            })
            .unwrap();

        assert!(id.starts_with("BO"));
        assert_eq!(storage.class("PI0001").unwrap().name, "Pilates");
        assert_eq!(storage.class(&id).unwrap().name, "Boxing");
    }

    pub fn add_class_rejects_short_name<S: Storage>(storage: S) {
        let size = storage.classes().unwrap().len();

        let err = storage.add_class(new_class("X")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(storage.classes().unwrap().len(), size);
    }

    pub fn get_fixture_class<S: Storage>(storage: S) {
        let class = storage.class("PI0001").unwrap();
        assert_eq!(class.name, "Pilates");
        assert_eq!(class.start_date, date("2020-01-29"));
        assert_eq!(class.end_date, date("2020-02-28"));
        assert_eq!(class.capacity, 20);
    }

    pub fn get_missing_class_fails<S: Storage>(storage: S) {
        let err = storage.class("missing-id").unwrap_err();
        assert!(matches!(err, StorageError::ClassNotFound(id) if id == "missing-id"));
    }

    pub fn update_class_replaces_record<S: Storage>(storage: S) {
        let class = storage.class("PI0001").unwrap();
        storage
            .update_class(
                "PI0001",
                Class {
                    id: "ignored".into(),
                    name: "Pilates Plus".into(),
                    capacity: 25,
                    ..class
                },
            )
            .unwrap();

        let class = storage.class("PI0001").unwrap();
        assert_eq!(class.id, "PI0001");
        assert_eq!(class.name, "Pilates Plus");
        assert_eq!(class.capacity, 25);
        storage.class("ignored").unwrap_err();
    }

    pub fn update_missing_class_fails<S: Storage>(storage: S) {
        let err = storage
            .update_class("wrong id!", new_class("Foo"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    pub fn delete_class_is_idempotent<S: Storage>(storage: S) {
        storage.delete_class("PI0001").unwrap();
        let err = storage.class("PI0001").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        storage.delete_class("PI0001").unwrap();
        assert_eq!(storage.classes().unwrap().len(), 3);
    }

    pub fn add_booking_requires_existing_class<S: Storage>(storage: S) {
        let err = storage
            .add_booking(Booking {
                class: String::new(),
                ..pilates_booking("Stefan")
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = storage
            .add_booking(Booking {
                class: "XX9999".into(),
                ..pilates_booking("Stefan")
            })
            .unwrap_err();
        assert!(matches!(err, StorageError::ClassNotFound(id) if id == "XX9999"));
        assert!(storage.bookings().unwrap().is_empty());
    }

    pub fn add_booking_rejects_date_outside_window<S: Storage>(storage: S) {
        for outside in ["2019-01-29", "2020-01-29", "2020-02-28", "2021-01-01"] {
            let err = storage
                .add_booking(Booking {
                    date: date(outside),
                    ..pilates_booking("Stefan")
                })
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidState, "date {outside}");
        }
        assert!(storage.bookings().unwrap().is_empty());

        // rejected bookings don't use up ids
        assert_eq!(storage.add_booking(pilates_booking("Stefan")).unwrap(), 1);
    }

    pub fn booking_ids_are_sequential<S: Storage>(storage: S) {
        let ids: Vec<i32> = ["Stefan", "Peter", "Anna"]
            .into_iter()
            .map(|customer| storage.add_booking(pilates_booking(customer)).unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let id = storage
            .add_booking(Booking {
                class: "DA0001".into(),
                ..pilates_booking("Maria")
            })
            .unwrap();
        assert_eq!(id, 4);
        assert_eq!(storage.bookings().unwrap().len(), 4);
    }

    pub fn get_booking<S: Storage>(storage: S) {
        let err = storage.booking(-1).unwrap_err();
        assert!(matches!(err, StorageError::BookingNotFound(-1)));

        let id = storage.add_booking(pilates_booking("Stefan")).unwrap();

        let booking = storage.booking(id).unwrap();
        assert_eq!(booking.id, id);
        assert_eq!(booking.class, "PI0001");
        assert_eq!(booking.customer, "Stefan");
        assert_eq!(booking.date, date("2020-01-31"));
    }

    pub fn update_booking_skips_availability<S: Storage>(storage: S) {
        let id = storage.add_booking(pilates_booking("Foo")).unwrap();

        storage
            .update_booking(
                id,
                Booking {
                    id: 99,
                    customer: "Bar".into(),
                    date: date("2030-01-01"),
                    ..pilates_booking("Foo")
                },
            )
            .unwrap();

        let booking = storage.booking(id).unwrap();
        assert_eq!(booking.id, id);
        assert_eq!(booking.customer, "Bar");
        assert_eq!(booking.date, date("2030-01-01"));
        storage.booking(99).unwrap_err();
    }

    pub fn update_missing_booking_fails<S: Storage>(storage: S) {
        let err = storage
            .update_booking(-1, pilates_booking("Foo"))
            .unwrap_err();
        assert!(matches!(err, StorageError::BookingNotFound(-1)));
    }

    pub fn delete_booking_is_idempotent<S: Storage>(storage: S) {
        let id = storage.add_booking(pilates_booking("Foo")).unwrap();

        storage.delete_booking(id).unwrap();
        storage.booking(id).unwrap_err();
        storage.delete_booking(id).unwrap();
        assert!(storage.bookings().unwrap().is_empty());
    }

    pub fn booking_outlives_its_class<S: Storage>(storage: S) {
        let id = storage.add_booking(pilates_booking("Foo")).unwrap();
        storage.delete_class("PI0001").unwrap();

        assert_eq!(storage.booking(id).unwrap().class, "PI0001");
        let err = storage.add_booking(pilates_booking("Bar")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    pub fn close<S: Storage>(storage: S) {
        storage.close().unwrap();
    }
}
