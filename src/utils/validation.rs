use crate::utils::error::{Result, UnifinderError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(UnifinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(UnifinderError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(UnifinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(UnifinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(UnifinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(UnifinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Storage keys become file names, so they may not contain separators.
pub fn validate_storage_key(field_name: &str, key: &str) -> Result<()> {
    validate_non_empty_string(field_name, key)?;
    if key.contains(['/', '\\', '\0']) || key == "." || key == ".." {
        return Err(UnifinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: key.to_string(),
            reason: "Storage key cannot contain path separators".to_string(),
        });
    }
    Ok(())
}

/// Returns the trimmed country name, or a `ValidationError` when blank.
pub fn validate_country(country: &str) -> Result<&str> {
    let trimmed = country.trim();
    if trimmed.is_empty() {
        return Err(UnifinderError::ValidationError {
            message: "Please enter a country name".to_string(),
        });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("base_url", "https://example.com").is_ok());
        assert!(validate_url("base_url", "http://universities.hipolabs.com").is_ok());
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "invalid-url").is_err());
        assert!(validate_url("base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("data_dir", "/tmp/unifinder").is_ok());
        assert!(validate_path("data_dir", "").is_err());
        assert!(validate_path("data_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_storage_key() {
        assert!(validate_storage_key("favorites_key", "unifinder_favorites").is_ok());
        assert!(validate_storage_key("favorites_key", "  ").is_err());
        assert!(validate_storage_key("favorites_key", "a/b").is_err());
        assert!(validate_storage_key("favorites_key", "..").is_err());
    }

    #[test]
    fn test_validate_country_trims() {
        assert_eq!(validate_country("  Togo ").unwrap(), "Togo");
        assert!(matches!(
            validate_country("\t"),
            Err(UnifinderError::ValidationError { .. })
        ));
    }
}
