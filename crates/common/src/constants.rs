/// Configuration key holding the expected basic-auth username
pub const AUTH_USERNAME_KEY: &str = "AUTH_USERNAME";

/// Configuration key holding the expected basic-auth passcode
pub const AUTH_PASSCODE_KEY: &str = "AUTH_PASSCODE";

/// Configuration key enabling `info`/`warn` output of the leveled logger
pub const DEBUG_FLAG_KEY: &str = "TWILIO_DEBUG";

/// Configuration key holding the domain the current request was served from
pub const DOMAIN_NAME_KEY: &str = "DOMAIN_NAME";

/// Account identifier used to authenticate against the management API
pub const ACCOUNT_SID_KEY: &str = "ACCOUNT_SID";

/// Secret used to authenticate against the management API
pub const AUTH_TOKEN_KEY: &str = "AUTH_TOKEN";

/// Optional override for the management API base URL
pub const SERVERLESS_API_URL_KEY: &str = "SERVERLESS_API_URL";

/// Default management API base URL
pub const DEFAULT_SERVERLESS_API_URL: &str = "https://serverless.twilio.com/v1";

/// Domain prefix that marks local (non-deployed) execution
pub const LOCALHOST_PREFIX: &str = "localhost";

/// Methods allowed by CORS responses unless the caller overrides them
pub const DEFAULT_CORS_METHODS: [&str; 2] = ["POST", "OPTIONS"];

/// Request headers allowed by CORS responses unless the caller overrides them
pub const DEFAULT_CORS_HEADERS: [&str; 1] = ["Content-Type"];

pub const HEADER_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const HEADER_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const HEADER_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Status code for parameter validation failures
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Status code for failure envelopes
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Number of retries performed by the fetch wrapper by default (no retries)
pub const DEFAULT_RETRIES: u32 = 0;

/// Base delay for exponential backoff between fetch retries (1 second)
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_values() {
        const _: () = assert!(DEFAULT_RETRIES == 0, "Retries are opt-in");
        const _: () = assert!(STATUS_BAD_REQUEST < STATUS_INTERNAL_ERROR);

        assert_eq!(DEFAULT_CORS_METHODS.join(", "), "POST, OPTIONS");
        assert_eq!(DEFAULT_CORS_HEADERS.join(", "), "Content-Type");
        assert!(DEFAULT_SERVERLESS_API_URL.starts_with("https://"));
    }
}
