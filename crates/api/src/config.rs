//! Runtime configuration from the environment.

use anyhow::{bail, Context};

/// Wire error-code configuration: `<PREFIX>-<3-digit service code>-<suffix>`.
#[derive(Debug, Clone)]
pub struct ErrorCodes {
    /// Prefix for failures the service itself classified.
    pub prefix: String,
    /// Catch-all prefix for unclassified failures.
    pub common_prefix: String,
    pub service_code: u16,
}

impl Default for ErrorCodes {
    fn default() -> Self {
        Self {
            prefix: "ORG".to_string(),
            common_prefix: "GNR".to_string(),
            service_code: 1,
        }
    }
}

impl ErrorCodes {
    /// Format the classified error code for a numeric suffix.
    pub fn code(&self, suffix: u16) -> String {
        format!("{}-{:03}-{}", self.prefix, self.service_code, suffix)
    }

    /// Format the catch-all error code.
    pub fn common_code(&self, suffix: u16) -> String {
        format!("{}-{:03}-{}", self.common_prefix, self.service_code, suffix)
    }
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: String,
    /// Postgres connection string; in-memory storage when unset.
    pub database_url: Option<String>,
    pub error_codes: ErrorCodes,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let listen_addr =
            std::env::var("BACKSHOP_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let database_url = std::env::var("DATABASE_URL").ok();

        let mut error_codes = ErrorCodes::default();
        if let Ok(prefix) = std::env::var("BACKSHOP_ERROR_PREFIX") {
            error_codes.prefix = prefix;
        }
        if let Ok(prefix) = std::env::var("BACKSHOP_COMMON_ERROR_PREFIX") {
            error_codes.common_prefix = prefix;
        }
        if let Ok(raw) = std::env::var("BACKSHOP_SERVICE_CODE") {
            let code: u16 = raw
                .parse()
                .with_context(|| format!("BACKSHOP_SERVICE_CODE {raw:?} is not a number"))?;
            if code > 999 {
                bail!("BACKSHOP_SERVICE_CODE must be at most 999, got {code}");
            }
            error_codes.service_code = code;
        }

        Ok(Self {
            listen_addr,
            database_url,
            error_codes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_prefixed_and_zero_padded() {
        let codes = ErrorCodes::default();
        assert_eq!(codes.code(991), "ORG-001-991");
        assert_eq!(codes.common_code(999), "GNR-001-999");
    }

    #[test]
    fn wide_service_codes_keep_their_width() {
        let codes = ErrorCodes {
            prefix: "SHP".to_string(),
            common_prefix: "GNR".to_string(),
            service_code: 123,
        };
        assert_eq!(codes.code(992), "SHP-123-992");
    }
}
