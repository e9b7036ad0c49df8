//! Tests for proxy resolution.

use super::*;

#[test]
fn no_proxy_by_default() {
    let config = resolve(&webhook_cli()).0.unwrap();
    assert!(config.proxy.is_none());
}

#[test]
fn proxy_input() {
    let cli = Cli {
        proxy: Some("http://proxy.internal:3128".to_string()),
        ..webhook_cli()
    };

    let config = resolve(&cli).0.unwrap();

    assert_eq!(config.proxy.as_deref(), Some("http://proxy.internal:3128"));
}

#[test]
fn uppercase_environment_fallback() {
    let runner = RecordingRunner::new();
    let environment = env(&[("HTTPS_PROXY", "http://upper:3128")]);

    let config = ValidatedConfig::from_raw(&webhook_cli(), &environment, &runner).unwrap();

    assert_eq!(config.proxy.as_deref(), Some("http://upper:3128"));
}

#[test]
fn lowercase_environment_fallback() {
    let runner = RecordingRunner::new();
    let environment = env(&[("https_proxy", "http://lower:3128")]);

    let config = ValidatedConfig::from_raw(&webhook_cli(), &environment, &runner).unwrap();

    assert_eq!(config.proxy.as_deref(), Some("http://lower:3128"));
}

#[test]
fn uppercase_wins_over_lowercase() {
    let runner = RecordingRunner::new();
    let environment = env(&[
        ("HTTPS_PROXY", "http://upper:3128"),
        ("https_proxy", "http://lower:3128"),
    ]);

    let config = ValidatedConfig::from_raw(&webhook_cli(), &environment, &runner).unwrap();

    assert_eq!(config.proxy.as_deref(), Some("http://upper:3128"));
}

#[test]
fn input_wins_over_environment() {
    let runner = RecordingRunner::new();
    let environment = env(&[("HTTPS_PROXY", "http://upper:3128")]);
    let cli = Cli {
        proxy: Some("http://input:3128".to_string()),
        ..webhook_cli()
    };

    let config = ValidatedConfig::from_raw(&cli, &environment, &runner).unwrap();

    assert_eq!(config.proxy.as_deref(), Some("http://input:3128"));
}

#[test]
fn invalid_proxy_is_not_a_config_error() {
    let cli = Cli {
        proxy: Some("::not a proxy::".to_string()),
        ..webhook_cli()
    };

    let config = resolve(&cli).0.unwrap();

    assert_eq!(config.proxy.as_deref(), Some("::not a proxy::"));
}
