use super::event::SlowQueryEvent;
use regex::Regex;
use std::str::Lines;
use std::sync::OnceLock;

struct Patterns {
    user_host: Regex,
    metric: Regex,
    banner: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        user_host: Regex::new(r"^# User@Host: ([^\[]*)\[([^\]]*)\] @ (\S*) \[([^\]]*)\]")
            .expect("user@host pattern"),
        metric: Regex::new(r"([A-Za-z_]+): (\S+)").expect("metric pattern"),
        banner: Regex::new(r"(, Version: .*started with:$)|(^Tcp port: )|(^Time\s+Id\s+Command\s+Argument)")
            .expect("banner pattern"),
    })
}

/// Streams [`SlowQueryEvent`]s out of raw slow query log text, in the order
/// they appear.
///
/// Header lines (`# Time:`, `# User@Host:`, `# Query_time:`) open a new
/// event once the previous one has query text. Entries with headers but no
/// query are dropped.
pub struct SlowLogParser<'a> {
    lines: Lines<'a>,
    current: SlowQueryEvent,
    query_lines: Vec<&'a str>,
    done: bool,
}

impl<'a> SlowLogParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            current: SlowQueryEvent::default(),
            query_lines: Vec::new(),
            done: false,
        }
    }

    fn in_query(&self) -> bool {
        !self.query_lines.is_empty()
    }

    /// Finish the event under construction, if it has a query.
    fn take_event(&mut self) -> Option<SlowQueryEvent> {
        if !self.in_query() {
            return None;
        }

        let mut event = std::mem::take(&mut self.current);
        let query = self.query_lines.join("\n");
        self.query_lines.clear();

        let query = query.trim_end();
        event.query = query.strip_suffix(';').unwrap_or(query).to_string();
        Some(event)
    }

    fn apply_header(&mut self, line: &str) {
        if let Some(ts) = line.strip_prefix("# Time:") {
            self.current.timestamp = Some(ts.trim().to_string());
            return;
        }

        if line.starts_with("# User@Host:") {
            if let Some(caps) = patterns().user_host.captures(line) {
                let user = caps[1].trim();
                self.current.user = if user.is_empty() {
                    caps[2].to_string()
                } else {
                    user.to_string()
                };
                let host = &caps[3];
                self.current.host = if host.is_empty() {
                    caps[4].to_string()
                } else {
                    host.to_string()
                };
            }
            return;
        }

        for caps in patterns().metric.captures_iter(line) {
            let name = &caps[1];
            let value = &caps[2];
            if let Ok(number) = value.parse::<f64>() {
                self.current.metrics.insert(name.to_string(), number);
            }
        }
    }
}

impl<'a> Iterator for SlowLogParser<'a> {
    type Item = SlowQueryEvent;

    fn next(&mut self) -> Option<SlowQueryEvent> {
        if self.done {
            return None;
        }

        while let Some(line) = self.lines.next() {
            let line = line.trim_end_matches('\r');

            if let Some(command) = line.strip_prefix("# administrator command:") {
                let finished = self.take_event();
                self.query_lines.push(command.trim());
                if finished.is_some() {
                    return finished;
                }
                continue;
            }

            if line.starts_with("# ") {
                let finished = self.take_event();
                self.apply_header(line);
                if finished.is_some() {
                    return finished;
                }
                continue;
            }

            if patterns().banner.is_match(line) {
                continue;
            }

            if !self.in_query() {
                let lower = line.to_ascii_lowercase();
                if lower.trim().is_empty() || lower.starts_with("set timestamp=") {
                    continue;
                }
                if lower.starts_with("use ") {
                    continue;
                }
            }

            self.query_lines.push(line);
        }

        self.done = true;
        self.take_event()
    }
}
