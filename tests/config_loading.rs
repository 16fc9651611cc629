//! Loading configuration files from disk.

use std::io::Write;

use probe_dispatch::config::{load_config, ConfigError, ValidationError};

#[test]
fn test_load_full_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
targets = ["http://127.0.0.1:8080/health", "https://example.com/"]

[run]
label = "nightly"
deadline_ms = 2500
cancel_on_ctrl_c = false

[probe]
user_agent = "checker/1.0"
cancel_in_flight = false

[observability]
json_logs = true
metrics_enabled = true
metrics_address = "0.0.0.0:9100"
"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.targets.len(), 2);
    assert_eq!(config.run.label, "nightly");
    assert_eq!(config.run.deadline_ms, Some(2500));
    assert!(!config.run.cancel_on_ctrl_c);
    assert_eq!(config.probe.user_agent, "checker/1.0");
    assert!(!config.probe.cancel_in_flight);
    assert!(config.observability.json_logs);
    assert_eq!(config.observability.metrics_address, "0.0.0.0:9100");
}

#[test]
fn test_invalid_file_reports_every_problem() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
targets = ["mailto:someone@example.com"]

[run]
deadline_ms = 0
label = " "
"#
    )
    .unwrap();

    match load_config(file.path()) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 3);
            assert!(errors.contains(&ValidationError::ZeroDeadline));
            assert!(errors.contains(&ValidationError::EmptyLabel));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}
