//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.
//! Output goes to stderr so that report output on stdout stays parseable.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    /// Parse a profile name as accepted on the command line
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "dev" | "development" | "text" => Some(Profile::Development),
            "prod" | "production" | "json" => Some(Profile::Production),
            "test" => Some(Profile::Test),
            _ => None,
        }
    }

    fn default_directive(self) -> &'static str {
        match self {
            Profile::Development => "hanoi=debug",
            Profile::Production => "hanoi=info",
            Profile::Test => "off",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// # Profiles
///
/// - **Development**: Human-readable logs with debug level
/// - **Production**: JSON structured logs with info level
/// - **Test**: Capture mode for test assertions
///
/// `RUST_LOG` overrides the profile's default filter.
pub fn init(profile: Profile) {
    init_with_filter(profile, None);
}

/// Initialize the logging facility with an explicit filter directive
///
/// The explicit directive wins over `RUST_LOG`, which wins over the
/// profile default. Only the first call has any effect.
pub fn init_with_filter(profile: Profile, directive: Option<&str>) {
    INIT_ONCE.call_once(|| {
        let filter = match directive {
            Some(d) => EnvFilter::new(d),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(profile.default_directive())),
        };
        match profile {
            Profile::Development => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Production => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Test => {
                // Test capture is initialized separately via init_test_capture()
                tracing_subscriber::registry().init();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(Profile::Test);
        init(Profile::Test);
        init_with_filter(Profile::Test, Some("hanoi=trace"));
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("json"), Some(Profile::Production));
        assert_eq!(Profile::parse("text"), Some(Profile::Development));
        assert_eq!(Profile::parse("loud"), None);
    }
}
