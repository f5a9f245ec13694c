use std::collections::HashMap;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Raw key/value pairs as they come out of the settings store.
pub type RawSettings = HashMap<String, String>;
