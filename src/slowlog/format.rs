use super::event::{SlowQueryEvent, LOCK_TIME, QUERY_TIME, ROWS_EXAMINED, ROWS_SENT};
use std::fmt::Write;

/// Render an event as a slow query log block, newline terminated.
pub fn render(event: &SlowQueryEvent) -> String {
    let mut out = String::new();

    if let Some(ts) = event.timestamp.as_deref().filter(|ts| !ts.is_empty()) {
        let _ = writeln!(out, "# Time: {}", ts);
    }

    let _ = writeln!(
        out,
        "# User@Host: {}[{}] @ {} []  Id: ",
        event.user, event.user, event.host
    );

    let _ = writeln!(
        out,
        "# Query_time: {:.6} Lock_time: {:.6} Rows_sent: {}  Rows_examined: {}",
        event.metric(QUERY_TIME),
        event.metric(LOCK_TIME),
        event.metric(ROWS_SENT) as i64,
        event.metric(ROWS_EXAMINED) as i64,
    );

    let _ = writeln!(out, "{}", event.query);

    out
}
