use crate::schema::{booking, class};
use chrono::NaiveDate;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A class offered by the gym or studio.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, Queryable, Selectable, Insertable,
)]
#[diesel(table_name = class, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Class {
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 2, message = "name needs at least two characters"))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub capacity: i32,
}

/// A customer's reservation of a class on a given date.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, Queryable, Selectable, Insertable,
)]
#[diesel(table_name = booking, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Booking {
    #[serde(default)]
    pub id: i32,
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "customer is required"))]
    pub customer: String,
    #[validate(length(min = 1, message = "class is required"))]
    pub class: String,
}
