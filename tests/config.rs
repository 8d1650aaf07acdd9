/// Registry option tests
///
/// Environment variables are process-global, so every test touching them
/// runs serially.

use ferrous_factory::config::{ENV_LABEL, ENV_LOG, ENV_LOG_PREFIX};
use ferrous_factory::{FactoryError, FactoryRegistry, RegistryOptions};
use serial_test::serial;
use std::env;

fn clear_env() {
    env::remove_var(ENV_LOG);
    env::remove_var(ENV_LOG_PREFIX);
    env::remove_var(ENV_LABEL);
}

#[test]
#[serial]
fn test_from_env_defaults_when_unset() {
    clear_env();
    let options = RegistryOptions::from_env().unwrap();
    assert_eq!(options, RegistryOptions::default());
}

#[test]
#[serial]
fn test_from_env_reads_all_variables() {
    clear_env();
    env::set_var(ENV_LOG, "yes");
    env::set_var(ENV_LOG_PREFIX, "[player]");
    env::set_var(ENV_LABEL, "player");

    let options = RegistryOptions::from_env().unwrap();
    clear_env();

    assert!(options.log_events);
    assert_eq!(options.log_prefix, "[player]");
    assert_eq!(options.label.as_deref(), Some("player"));
}

#[test]
#[serial]
fn test_from_env_rejects_bad_flag() {
    clear_env();
    env::set_var(ENV_LOG, "sometimes");

    let result = RegistryOptions::from_env();
    clear_env();

    match result {
        Err(FactoryError::Config(msg)) => assert!(msg.contains("sometimes")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_empty_label_is_ignored() {
    clear_env();
    env::set_var(ENV_LABEL, "");

    let options = RegistryOptions::from_env().unwrap();
    clear_env();

    assert_eq!(options.label, None);
}

#[test]
fn test_registry_keeps_options() {
    let registry = FactoryRegistry::with_options(RegistryOptions::default().with_label("mixer"));
    assert_eq!(registry.options().label.as_deref(), Some("mixer"));
    assert!(!registry.options().log_events);
    assert!(format!("{:?}", registry).contains("mixer"));
}

#[cfg(feature = "config")]
#[test]
fn test_json_round_trip() {
    let options = RegistryOptions::default()
        .with_label("mixer")
        .with_logging(true);

    let json = options.to_json_string().unwrap();
    assert!(json.contains("\"log_events\": true"));
    assert_eq!(RegistryOptions::from_json_str(&json).unwrap(), options);
}

#[cfg(feature = "config")]
#[test]
fn test_json_rejects_wrong_types() {
    let err = RegistryOptions::from_json_str(r#"{ "log_events": "loud" }"#).unwrap_err();
    assert!(matches!(err, FactoryError::Config(_)));
}
