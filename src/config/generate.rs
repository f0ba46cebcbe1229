pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# SLOWLOG HARVESTER CONFIGURATION
# =============================================================================
# Incrementally downloads database slow query logs and appends them to a local
# slow log per instance. Progress is kept in the positions file so each run
# only fetches what is new.
#
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. ~/.config/slowlog-harvester/config.yml
#   3. /etc/slowlog-harvester/config.yml
#
# Environment variables are expanded with the $env{...} syntax and a leading
# ~ with the home directory.

remote:
  # Log gateway exposing the instance log listing and portion download calls
  endpoint: http://127.0.0.1:7300
  # Optional bearer token
  # token: changeme
  timeout: 60s

# Instances to harvest, processed in order. --instance-ids overrides this list.
instances:
  - mydb-primary

harvest:
  # Only log files whose name contains this string are considered
  filename_contains: slowquery
  # 'abort' stops the run when an instance has no log files,
  # 'skip' keeps its stored position and moves on
  on_missing_logs: abort
  # Upper bound on pages fetched from one log file in a single run
  max_pages: 10000

positions:
  path: ~/.local/state/slowlog-harvester/positions.json

output:
  # {instance} is replaced with the instance id. Defaults to
  # <tmp>/<instance>.slowquery.log when omitted.
  path: ~/slowlogs/{instance}.slowquery.log
"#
    .to_string()
}
