//! Logging configuration
//!
//! Configurable JSON/Pretty logging output.
//!
//! # Environment Variables
//! - `LOG_FORMAT`: Output format - `json` (default) or `pretty`
//! - `RUST_LOG`: Log level filter (default: `info`)

use tracing_subscriber::EnvFilter;

/// Initialize logging with configurable format
///
/// Reads `LOG_FORMAT` from environment:
/// - `json` (default): Machine-parseable JSON output for production
/// - `pretty`: Human-readable output for development
///
/// Also respects `RUST_LOG` for log level filtering (default: `info`)
pub fn init_logging() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .pretty()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .json()
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    // NOTE: `init_logging()` itself is not unit-testable: the global
    // subscriber can only be installed once per process and a second
    // init() panics. Only the env parsing logic is covered here; the
    // JSON output shape is checked by hand:
    //   `LOG_FORMAT=json cargo run 2>&1 | head -1 | jq .`

    #[test]
    fn test_env_filter_fallback() {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        assert!(!format!("{:?}", filter).is_empty());
    }

    #[test]
    fn test_pretty_format_detection() {
        for (input, expected) in [("pretty", true), ("json", false), ("PRETTY", false)] {
            assert_eq!(input == "pretty", expected, "Failed for input: {}", input);
        }
    }
}
