//! # Field Validation
//!
//! Format checks for data-source settings fields.
//!
//! - Absolute URIs: parsed with the WHATWG URL parser (`url` crate)
//! - Subscription IDs: hyphenated UUID syntax (8-4-4-4-12 hex digits)
//! - Certificate thumbprints: SHA-1 thumbprint, exactly 40 hex digits

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("Failed to compile UUID_PATTERN - this should never happen")
});

static THUMBPRINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{40}$")
        .expect("Failed to compile THUMBPRINT_PATTERN - this should never happen")
});

/// Whether `value` parses as an absolute URI (scheme required)
pub fn is_absolute_uri(value: &str) -> bool {
    if value.trim() != value || value.is_empty() {
        return false;
    }
    Url::parse(value).is_ok()
}

/// Whether `value` is a hyphenated UUID
pub fn is_uuid(value: &str) -> bool {
    UUID_PATTERN.is_match(value)
}

/// Whether `value` is a 40 character hexadecimal certificate thumbprint
pub fn is_certificate_thumbprint(value: &str) -> bool {
    THUMBPRINT_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_uris() {
        let valid = vec![
            "https://my-vault.vault.azure.net/",
            "https://my-vault.vault.azure.net",
            "https://management.azure.com",
            "http://localhost:8200/v1",
        ];
        for uri in valid {
            assert!(is_absolute_uri(uri), "URI '{uri}' should be valid");
        }

        let invalid = vec![
            "",
            "my-vault.vault.azure.net",
            "/relative/path",
            "https://",
            " https://my-vault.vault.azure.net/",
            "not a uri",
        ];
        for uri in invalid {
            assert!(!is_absolute_uri(uri), "URI '{uri}' should be invalid");
        }
    }

    #[test]
    fn test_uuid_syntax() {
        assert!(is_uuid("12345678-1234-1234-1234-123456789012"));
        assert!(is_uuid("ABCDEF01-abcd-ABCD-abcd-0123456789ab"));

        let invalid = vec![
            "",
            "12345678123412341234123456789012",
            "{12345678-1234-1234-1234-123456789012}",
            "12345678-1234-1234-1234-12345678901",
            "g2345678-1234-1234-1234-123456789012",
            "sub-001",
        ];
        for value in invalid {
            assert!(!is_uuid(value), "'{value}' should not be a UUID");
        }
    }

    #[test]
    fn test_certificate_thumbprint() {
        assert!(is_certificate_thumbprint(&"a".repeat(40)));
        assert!(is_certificate_thumbprint(
            "0123456789ABCDEF0123456789abcdef01234567"
        ));
        assert!(!is_certificate_thumbprint(&"a".repeat(39)));
        assert!(!is_certificate_thumbprint(&"a".repeat(41)));
        assert!(!is_certificate_thumbprint(&"z".repeat(40)));
        assert!(!is_certificate_thumbprint("cert-thumbprint-secret"));
    }
}
