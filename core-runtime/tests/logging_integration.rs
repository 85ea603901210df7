//! Integration tests for logging system

use bridge_traits::LogLevel;
use core_runtime::logging::{redact_if_sensitive, redact_url, LogFormat, LoggingConfig};

#[test]
fn test_logging_initialization() {
    // Only one global subscriber per process, so exercise the builder here.
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Debug)
        .with_pii_redaction(true)
        .with_spans(true);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Debug);
    assert!(config.redact_pii);
    assert!(config.enable_spans);
}

#[test]
fn test_credential_fields_are_masked() {
    assert_eq!(redact_if_sensitive("access_token", "abc"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("url_signature", "sig"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("password", "hunter2"), "[REDACTED]");
}

#[test]
fn test_playback_fields_pass_through() {
    assert_eq!(redact_if_sensitive("video_id", "M7lc1UVf-VE"), "M7lc1UVf-VE");
    assert_eq!(redact_if_sensitive("volume", "0.5"), "0.5");
    assert_eq!(redact_if_sensitive("backend", "embed-sdk"), "embed-sdk");
}

#[test]
fn test_signed_source_urls_lose_query() {
    assert_eq!(
        redact_url("https://cdn.example.com/v.mp4?X-Amz-Signature=deadbeef"),
        "https://cdn.example.com/v.mp4"
    );
    assert_eq!(
        redact_url("https://vimeo.com/76979871#t=30s"),
        "https://vimeo.com/76979871"
    );
    assert_eq!(redact_url("76979871"), "76979871");
    assert_eq!(redact_url(""), "");
}

#[test]
fn test_format_selection() {
    #[cfg(debug_assertions)]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[cfg(not(debug_assertions))]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Json);
    }
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_pii_redaction(false)
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.redact_pii);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}
