//! Small helpers shared by the application modules.

use time::OffsetDateTime;
use uuid::{NoContext, Timestamp, Uuid};

/// Fresh opaque book identifier: a time-ordered UUID without hyphens.
pub fn new_book_id() -> String {
    Uuid::new_v7(Timestamp::now(NoContext)).simple().to_string()
}

/// Current UTC time
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}
