use std::collections::BTreeMap;

pub const QUERY_TIME: &str = "Query_time";
pub const LOCK_TIME: &str = "Lock_time";
pub const ROWS_SENT: &str = "Rows_sent";
pub const ROWS_EXAMINED: &str = "Rows_examined";

/// One query entry from a slow query log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlowQueryEvent {
    pub timestamp: Option<String>,
    pub user: String,
    pub host: String,
    pub query: String,
    pub metrics: BTreeMap<String, f64>,
}

impl SlowQueryEvent {
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }
}
