use std::env;
use dotenvy::dotenv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Diagnostics settings. None of these change the URL that gets printed.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// `EnvFilter` directives replacing the level picked from the flags.
    pub log_filter: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let log_filter = env::var("UNTRACK_LOG").ok().filter(|s| !s.trim().is_empty());
        let log_format = env::var("UNTRACK_LOG_FORMAT")
            .map(|s| LogFormat::from_name(&s))
            .unwrap_or_default();

        Self {
            log_filter,
            log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_names() {
        assert_eq!(LogFormat::from_name("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("pretty"), LogFormat::Text);
    }
}
