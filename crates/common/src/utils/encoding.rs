use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, PAD, STANDARD};
use base64::{Engine as _, alphabet};

// Clients differ on whether `Authorization` tokens keep their `=` padding.
const HEADER_TOKEN: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode Base64 string to bytes
pub fn decode_body(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded)
}

/// Decode the base64 token of an `Authorization` header, padded or not
pub fn decode_header_token(token: &str) -> Result<Vec<u8>, base64::DecodeError> {
    HEADER_TOKEN.decode(token)
}

/// Build an `Authorization` header value for HTTP Basic authentication
pub fn encode_basic_credentials(username: &str, passcode: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, passcode)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_basic_credentials() {
        assert_eq!(
            encode_basic_credentials("testuser", "testpass"),
            "Basic dGVzdHVzZXI6dGVzdHBhc3M="
        );
        assert_eq!(encode_basic_credentials("", ""), "Basic Og==");
    }

    #[test]
    fn test_decode_form_body() {
        let decoded = decode_body("a2V5PUFQSV9LRVkmdmFsdWU9MQ==").unwrap();
        assert_eq!(decoded, b"key=API_KEY&value=1");
    }

    #[test]
    fn test_decode_header_token_ignores_padding() {
        assert_eq!(decode_header_token("dGVzdHVzZXI6dGVzdHBhc3M=").unwrap(), b"testuser:testpass");
        assert_eq!(decode_header_token("dGVzdHVzZXI6dGVzdHBhc3M").unwrap(), b"testuser:testpass");
        assert!(decode_header_token("dGVzdHVzZXI6dGVzdHBhc3M!").is_err());
    }

    #[test]
    fn test_decode_invalid() {
        assert!(decode_body("not base64!").is_err());
    }
}
