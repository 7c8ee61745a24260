/// Tables are created on startup when absent. There is no foreign key between
/// `booking.class` and `class.id`; the backends check the reference themselves.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS class (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    start_date DATETIME NOT NULL,
    end_date DATETIME NOT NULL,
    capacity INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS booking (
    id INTEGER PRIMARY KEY NOT NULL,
    date DATETIME NOT NULL,
    customer TEXT NOT NULL,
    class TEXT NOT NULL
);
";

diesel::table! {
    class (id) {
        id -> Text,
        name -> Text,
        start_date -> Date,
        end_date -> Date,
        capacity -> Integer,
    }
}

diesel::table! {
    booking (id) {
        id -> Integer,
        date -> Date,
        customer -> Text,
        class -> Text,
    }
}
