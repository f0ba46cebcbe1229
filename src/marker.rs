use thiserror::Error;

/// Marker submitted when nothing is known about a log file yet.
pub const DEFAULT_MARKER: &str = "0:0";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkerError {
    #[error("invalid marker: {0:?}")]
    Invalid(String),
}

/// Split a continuation marker into its two colon-separated components.
pub fn parse_marker(marker: &str) -> Result<(&str, &str), MarkerError> {
    let mut parts = marker.split(':');
    match (parts.next(), parts.next()) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(MarkerError::Invalid(marker.to_string())),
    }
}

/// Wrap a single component into the `v:v` shape the remote service accepts.
pub fn create_marker(value: &str) -> String {
    format!("{}:{}", value, value)
}

/// Turn a marker returned by the remote service into the value persisted for
/// the next run.
pub fn next_marker_from(raw: &str) -> Result<String, MarkerError> {
    let (_, second) = parse_marker(raw)?;
    Ok(create_marker(second))
}

/// The marker to submit for a stored position.
///
/// Positions written by older releases hold only the bare component, so
/// anything not already in two-part shape is wrapped.
pub fn resume_marker(stored: &str) -> String {
    if stored.is_empty() {
        return DEFAULT_MARKER.to_string();
    }
    match parse_marker(stored) {
        Ok(_) => stored.to_string(),
        Err(_) => create_marker(stored),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_marker_two_parts() {
        assert_eq!(parse_marker("12:34").unwrap(), ("12", "34"));
    }

    #[test]
    fn test_parse_marker_extra_parts_uses_first_two() {
        assert_eq!(parse_marker("1:2:3").unwrap(), ("1", "2"));
    }

    #[test]
    fn test_parse_marker_rejects_single_component() {
        assert_eq!(
            parse_marker("1234"),
            Err(MarkerError::Invalid("1234".to_string()))
        );
    }

    #[test]
    fn test_next_marker_is_idempotent() {
        for value in ["0", "100", "8812731"] {
            let wrapped = create_marker(value);
            assert_eq!(next_marker_from(&wrapped).unwrap(), wrapped);
        }
    }

    #[test]
    fn test_next_marker_takes_second_component() {
        assert_eq!(next_marker_from("5:900").unwrap(), "900:900");
    }

    #[test]
    fn test_resume_marker() {
        assert_eq!(resume_marker(""), DEFAULT_MARKER);
        assert_eq!(resume_marker("100:100"), "100:100");
        // bare value from an older positions file
        assert_eq!(resume_marker("100"), "100:100");
    }
}
