use rust_decimal::Decimal;

/// Upper bound accepted for any single asking or list price.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Validates a catalog SKU: uppercase alphanumeric plus dashes, 3..=32 chars.
pub fn validate_sku(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("SKU cannot be empty".to_string());
    }
    if value.len() < 3 || value.len() > 32 {
        return Err("SKU must be between 3 and 32 characters".to_string());
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("SKU may only contain A-Z, 0-9 and dashes".to_string());
    }
    Ok(())
}

/// Validates a monetary amount: non-negative and below the store ceiling.
pub fn validate_price(value: Decimal) -> Result<(), String> {
    if value.is_sign_negative() {
        return Err("Price cannot be negative".to_string());
    }
    if value > MAX_PRICE {
        return Err("Price exceeds the maximum of 1,000,000".to_string());
    }
    Ok(())
}

/// Validates a WhatsApp phone number: E.164 shape, digits with a leading +.
pub fn validate_phone(value: &str) -> Result<(), String> {
    let Some(digits) = value.strip_prefix('+') else {
        return Err("Phone number must start with +".to_string());
    };
    if digits.len() < 7 || digits.len() > 15 {
        return Err("Phone number must have 7 to 15 digits".to_string());
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone number may only contain digits after +".to_string());
    }
    Ok(())
}

/// Validates HTTP/HTTPS URL
pub fn validate_http_url(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("URL cannot be empty".to_string());
    }
    let url = url::Url::parse(value).map_err(|e| format!("Invalid URL: {}", e))?;
    match url.scheme() {
        "http" | "https" => {}
        _ => return Err("URL must use http or https scheme".to_string()),
    }
    if url.host_str().filter(|h| !h.is_empty()).is_none() {
        return Err("URL must have a valid host".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert_eq!(validate_sku("CAM-5D-0042"), Ok(()));
        assert_eq!(validate_sku("LENS50"), Ok(()));
        assert!(validate_sku("").is_err());
        assert!(validate_sku("ab").is_err());
        assert!(validate_sku("lowercase-sku").is_err());
        assert!(validate_sku("HAS SPACE").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert_eq!(validate_price(Decimal::new(129999, 2)), Ok(()));
        assert_eq!(validate_price(Decimal::ZERO), Ok(()));
        assert!(validate_price(Decimal::new(-100, 2)).is_err());
        assert!(validate_price(Decimal::new(1_000_001, 0)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone("+14155550123"), Ok(()));
        assert!(validate_phone("14155550123").is_err());
        assert!(validate_phone("+1-415-555").is_err());
        assert!(validate_phone("+123").is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert_eq!(validate_http_url("https://store.example.com"), Ok(()));
        assert!(validate_http_url("ftp://store.example.com").is_err());
        assert!(validate_http_url("store.example.com").is_err());
        assert!(validate_http_url("").is_err());
    }
}
