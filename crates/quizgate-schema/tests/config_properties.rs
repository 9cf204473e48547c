//! Behavioural properties of the configuration validator, exercised
//! through the public API only.

use std::collections::HashMap;

use proptest::prelude::*;
use quizgate_schema::{Config, ConfigValidator, Environment, CONFIG_FIELDS};

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_all_keys_absent_yields_declared_defaults() {
    let config = ConfigValidator::new()
        .validate(HashMap::<String, String>::new())
        .unwrap();
    assert_eq!(config.node_env, Environment::Development);
    assert_eq!(config.port, 5000);
    assert!(!config.use_proxy);
    assert_eq!(config.proxy_host, None);
    assert_eq!(config.proxy_port, None);
    assert_eq!(config.proxy_username, None);
    assert_eq!(config.proxy_password, None);
}

#[test]
fn test_use_proxy_without_host_and_port_yields_two_errors() {
    let errors = ConfigValidator::new()
        .validate(&env(&[("USE_PROXY", "true")]))
        .unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.paths(), vec!["[PROXY_HOST]", "[PROXY_PORT]"]);
}

#[test]
fn test_complete_proxy_configuration() {
    let config = ConfigValidator::new()
        .validate(&env(&[
            ("USE_PROXY", "true"),
            ("PROXY_HOST", "proxy.example.com"),
            ("PROXY_PORT", "8080"),
        ]))
        .unwrap();
    assert!(config.use_proxy);
    assert_eq!(config.proxy_host.as_deref(), Some("proxy.example.com"));
    assert_eq!(config.proxy_port, Some(8080));
}

#[test]
fn test_port_not_a_number_and_absent() {
    let validator = ConfigValidator::new();
    let errors = validator
        .validate(&env(&[("PORT", "not-a-number")]))
        .unwrap_err();
    assert_eq!(errors.paths(), vec!["[PORT]"]);
    assert_eq!(validator.validate(&env(&[])).unwrap().port, 5000);
}

#[test]
fn test_node_env_membership() {
    let validator = ConfigValidator::new();
    let errors = validator.validate(&env(&[("NODE_ENV", "qa")])).unwrap_err();
    let message = &errors.errors()[0].message;
    for allowed in ["development", "production", "staging", "test"] {
        assert!(message.contains(allowed), "{message}");
    }
    let config = validator.validate(&env(&[("NODE_ENV", "staging")])).unwrap();
    assert_eq!(config.node_env, Environment::Staging);
}

#[test]
fn test_field_table_declares_seven_keys_in_order() {
    let keys: Vec<&str> = CONFIG_FIELDS.iter().map(|spec| spec.key).collect();
    assert_eq!(
        keys,
        vec![
            "NODE_ENV",
            "PORT",
            "USE_PROXY",
            "PROXY_HOST",
            "PROXY_PORT",
            "PROXY_USERNAME",
            "PROXY_PASSWORD",
        ]
    );
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::sample::select(Environment::all().to_vec()),
        any::<u16>(),
        any::<bool>(),
        prop::option::of("[a-z][a-z0-9.-]{0,20}"),
        prop::option::of(1u16..=u16::MAX),
        prop::option::of("[a-zA-Z0-9_]{1,12}"),
        prop::option::of("[ -~]{1,16}"),
    )
        .prop_filter("enabled proxy needs host and port", |t| {
            !t.2 || (t.3.is_some() && t.4.is_some())
        })
        .prop_map(
            |(node_env, port, use_proxy, proxy_host, proxy_port, proxy_username, proxy_password)| {
                Config {
                    node_env,
                    port,
                    use_proxy,
                    proxy_host,
                    proxy_port,
                    proxy_username,
                    proxy_password,
                }
            },
        )
}

proptest! {
    /// Re-validating a config rendered back to its string encoding
    /// reproduces the identical config.
    #[test]
    fn revalidation_is_idempotent(config in config_strategy()) {
        let again = ConfigValidator::new().validate(config.to_env());
        prop_assert_eq!(again.ok(), Some(config));
    }

    /// Validation never panics on arbitrary string values for known keys.
    #[test]
    fn arbitrary_values_never_panic(
        values in proptest::collection::vec(".{0,12}", CONFIG_FIELDS.len())
    ) {
        let source: Vec<(&str, &str)> = CONFIG_FIELDS
            .iter()
            .zip(values.iter())
            .map(|(spec, value)| (spec.key, value.as_str()))
            .collect();
        let _ = ConfigValidator::new().validate(source);
    }
}
