use crate::utils::error::{FiestaError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FiestaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FiestaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_negative_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FiestaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite, non-negative number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FiestaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(FiestaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(FiestaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("probes.missing_file", "nope.txt").is_ok());
        assert!(validate_path("probes.missing_file", "").is_err());
        assert!(validate_path("probes.missing_file", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_non_negative_finite() {
        assert!(validate_non_negative_finite("build_time", 3.5).is_ok());
        assert!(validate_non_negative_finite("build_time", 0.0).is_ok());
        assert!(validate_non_negative_finite("build_time", -1.0).is_err());
        assert!(validate_non_negative_finite("build_time", f64::NAN).is_err());
        assert!(validate_non_negative_finite("build_time", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("format", "json", &["text", "json", "csv"]).is_ok());
        assert!(validate_one_of("format", "yaml", &["text", "json", "csv"]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("recursion_limit", 1000, 1, 100_000).is_ok());
        assert!(validate_range("recursion_limit", 200_000, 1, 100_000).is_err());
    }
}
