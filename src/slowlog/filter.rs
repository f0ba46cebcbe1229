use super::event::SlowQueryEvent;

/// Internal account the managed database service uses for its own housekeeping.
pub const ADMIN_USER: &str = "rdsadmin";

/// Probe sent by client libraries on every connect.
pub const VERSION_PROBE: &str = "select @@version_comment limit 1";

pub const DISCONNECT_COMMAND: &str = "quit";

/// True for events that carry no information about application queries.
pub fn is_noise(event: &SlowQueryEvent) -> bool {
    event.user == ADMIN_USER
        || event.query.eq_ignore_ascii_case(VERSION_PROBE)
        || event.query.eq_ignore_ascii_case(DISCONNECT_COMMAND)
}
