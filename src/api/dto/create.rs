//! DTOs for the link creation endpoint.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

/// Characters allowed in a custom alias.
static CUSTOM_ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid alias regex"));

/// Path segments an alias must not shadow.
const RESERVED_ALIASES: &[&str] = &["create", "links", "stats", "health"];

/// Request to create a short link.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Optional custom short code used verbatim. An empty string means none.
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 1, max = 64))]
    #[validate(regex(path = "*CUSTOM_ALIAS_REGEX", message = "Alias may only contain letters, digits, '_' and '-'"))]
    #[validate(custom(function = "validate_not_reserved"))]
    pub custom_alias: Option<String>,
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer).map(|alias| alias.filter(|s| !s.is_empty()))
}

fn validate_not_reserved(alias: &str) -> Result<(), ValidationError> {
    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        let mut err = ValidationError::new("reserved");
        err.message = Some("Alias is a reserved word".into());
        return Err(err);
    }
    Ok(())
}

/// Response for a created link.
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub message: String,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(alias: Option<&str>) -> CreateRequest {
        CreateRequest {
            url: "https://example.com".to_string(),
            custom_alias: alias.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_requests() {
        assert!(request(None).validate().is_ok());
        assert!(request(Some("my-link_01")).validate().is_ok());
        assert!(request(Some(&"a".repeat(64))).validate().is_ok());
    }

    #[test]
    fn test_invalid_aliases() {
        assert!(request(Some(&"a".repeat(65))).validate().is_err());
        assert!(request(Some("has space")).validate().is_err());
        assert!(request(Some("slash/inside")).validate().is_err());
        assert!(request(Some("stats")).validate().is_err());
        assert!(request(Some("Health")).validate().is_err());
    }

    #[test]
    fn test_invalid_url() {
        let req = CreateRequest {
            url: "not a url".to_string(),
            custom_alias: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let req: CreateRequest =
            serde_json::from_str(r#"{"url":"https://example.com","customAlias":"docs"}"#)
                .unwrap();
        assert_eq!(req.custom_alias.as_deref(), Some("docs"));
    }

    #[test]
    fn test_empty_alias_means_generated() {
        let req: CreateRequest =
            serde_json::from_str(r#"{"url":"https://example.com","customAlias":""}"#).unwrap();
        assert_eq!(req.custom_alias, None);
        assert!(req.validate().is_ok());

        let req: CreateRequest =
            serde_json::from_str(r#"{"url":"https://example.com","customAlias":null}"#).unwrap();
        assert_eq!(req.custom_alias, None);

        let req: CreateRequest = serde_json::from_str(r#"{"url":"https://example.com"}"#).unwrap();
        assert_eq!(req.custom_alias, None);
    }
}
