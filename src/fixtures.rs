use crate::types::Class;
use chrono::NaiveDate;

const FIXTURE_START: (i32, u32, u32) = (2020, 1, 29);
const FIXTURE_END: (i32, u32, u32) = (2020, 2, 28);
const FIXTURE_CAPACITY: i32 = 20;

/// Classes every backend starts with.
pub fn example_classes() -> Vec<Class> {
    [
        ("PI0001", "Pilates"),
        ("DA0001", "Dance+"),
        ("FB0001", "Full Body"),
        ("YO0001", "Yoga"),
    ]
    .into_iter()
    .map(|(id, name)| Class {
        id: id.into(),
        name: name.into(),
        start_date: date(FIXTURE_START),
        end_date: date(FIXTURE_END),
        capacity: FIXTURE_CAPACITY,
    })
    .collect()
}

fn date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("fixture dates are valid calendar dates")
}
