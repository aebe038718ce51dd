//! Input rules applied before data is sent to the backend.

use thiserror::Error;

pub const MIN_LOGIN_PASSWORD_LENGTH: usize = 4;
pub const MIN_REGISTER_PASSWORD_LENGTH: usize = 6;
pub const MIN_RESET_PASSWORD_LENGTH: usize = 8;
pub const MIN_NAME_LENGTH: usize = 2;

/// Oldest model year accepted when adding a vehicle.
pub const MIN_NEW_VEHICLE_YEAR: i32 = 1980;
pub const MIN_VEHICLE_YEAR: i32 = 1900;
pub const MAX_VEHICLE_YEAR: i32 = 2100;

pub const MAX_KM: i64 = 5_000_000;
pub const MAX_PRICE: f64 = 100_000.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} es obligatorio")]
    Required(&'static str),

    #[error("El email no es válido")]
    InvalidEmail,

    #[error("La contraseña debe tener al menos {0} caracteres")]
    PasswordTooShort(usize),

    #[error("Las contraseñas no coinciden")]
    PasswordMismatch,

    #[error("{0} debe tener al menos {1} caracteres")]
    TooShort(&'static str, usize),

    #[error("El teléfono debe tener entre 9 y 15 dígitos")]
    InvalidPhone,

    #[error("{field} debe estar entre {min} y {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required("El email"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    let domain_ok = !domain.is_empty()
        && !domain.contains('@')
        && domain
            .split('.')
            .all(|label| !label.is_empty() && label.chars().all(|c| c.is_alphanumeric() || c == '-'));
    if local.is_empty() || local.chars().any(char::is_whitespace) || !domain_ok {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password(password: &str, min_len: usize) -> ValidationResult {
    if password.is_empty() {
        return Err(ValidationError::Required("La contraseña"));
    }
    if password.chars().count() < min_len {
        return Err(ValidationError::PasswordTooShort(min_len));
    }
    Ok(())
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_name(field: &'static str, value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    if value.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort(field, MIN_NAME_LENGTH));
    }
    Ok(())
}

/// Phone numbers are optional; when given they must be 9 to 15 digits.
pub fn validate_phone(phone: Option<&str>) -> ValidationResult {
    match phone.map(str::trim) {
        None | Some("") => Ok(()),
        Some(p) if (9..=15).contains(&p.len()) && p.chars().all(|c| c.is_ascii_digit()) => Ok(()),
        Some(_) => Err(ValidationError::InvalidPhone),
    }
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> ValidationResult {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(())
}

/// Model year for a new vehicle: 1980 up to the current year.
pub fn validate_new_vehicle_year(year: i32, current_year: i32) -> ValidationResult {
    check_range("El año", year.into(), MIN_NEW_VEHICLE_YEAR.into(), current_year.into())
}

pub fn validate_vehicle_year(year: i32) -> ValidationResult {
    check_range("El año", year.into(), MIN_VEHICLE_YEAR.into(), MAX_VEHICLE_YEAR.into())
}

pub fn validate_km(km: i64) -> ValidationResult {
    check_range("El kilometraje", km, 0, MAX_KM)
}

pub fn validate_price(price: f64) -> ValidationResult {
    if !price.is_finite() || !(0.0..=MAX_PRICE).contains(&price) {
        return Err(ValidationError::OutOfRange {
            field: "El precio",
            min: 0,
            max: MAX_PRICE as i64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("  ana.lopez@mail.co.uk ").is_ok());
        assert_eq!(validate_email(""), Err(ValidationError::Required("El email")));
        assert_eq!(validate_email("ana"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("@example.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("ana@"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("ana@exa mple.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("ana@example..com"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_validate_password_lengths() {
        assert!(validate_password("abcd", MIN_LOGIN_PASSWORD_LENGTH).is_ok());
        assert_eq!(
            validate_password("abcd", MIN_REGISTER_PASSWORD_LENGTH),
            Err(ValidationError::PasswordTooShort(6))
        );
        assert_eq!(
            validate_password("", MIN_LOGIN_PASSWORD_LENGTH),
            Err(ValidationError::Required("La contraseña"))
        );
        assert!(validate_password_confirmation("secreto1", "secreto1").is_ok());
        assert_eq!(
            validate_password_confirmation("secreto1", "secreto2"),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone(None).is_ok());
        assert!(validate_phone(Some("")).is_ok());
        assert!(validate_phone(Some("600111222")).is_ok());
        assert!(validate_phone(Some("346001112223")).is_ok());
        assert_eq!(validate_phone(Some("60011122")), Err(ValidationError::InvalidPhone));
        assert_eq!(validate_phone(Some("+34600111222")), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(validate_new_vehicle_year(1980, 2026).is_ok());
        assert!(validate_new_vehicle_year(2027, 2026).is_err());
        assert!(validate_new_vehicle_year(1979, 2026).is_err());
        assert!(validate_vehicle_year(1950).is_ok());
        assert!(validate_km(0).is_ok());
        assert!(validate_km(-1).is_err());
        assert!(validate_km(5_000_001).is_err());
        assert!(validate_price(89.9).is_ok());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(100_000.01).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("El nombre", "Ana").is_ok());
        assert_eq!(
            validate_name("El nombre", " A "),
            Err(ValidationError::TooShort("El nombre", 2))
        );
        assert_eq!(validate_name("El nombre", "  "), Err(ValidationError::Required("El nombre")));
    }
}
