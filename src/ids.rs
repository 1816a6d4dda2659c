//! Identifier generation for users, projects, tasks and comments.

use chrono::Utc;

/// Issues string identifiers from the millisecond clock.
///
/// IDs requested within the same millisecond bump past the last issued
/// value, so every ID from one generator is unique even under rapid
/// successive mutations. The uniform source keeps task IDs unique across
/// the personal and project collections, which the first-match search
/// policy relies on.
#[derive(Debug, Default)]
pub struct IdGen {
    last: i64,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unique identifier: stringified epoch milliseconds.
    pub fn next(&mut self) -> String {
        let mut now = Utc::now().timestamp_millis();
        if now <= self.last {
            now = self.last + 1;
        }
        self.last = now;
        now.to_string()
    }
}
