//! Input validation rules
//!
//! Pure shape checks run before anything is sent to the backend. Business
//! rules (balances, ownership, account state) stay on the server.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use super::wire::parse_decimal;

/// Transfer destination account numbers are between these lengths (inclusive)
pub const ACCOUNT_NUMBER_MIN_LEN: usize = 10;
pub const ACCOUNT_NUMBER_MAX_LEN: usize = 24;

/// Maximum length of a free-text operation description
pub const DESCRIPTION_MAX_LEN: usize = 200;

/// A failed validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Wire name of the offending field
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^(06|07)[0-9]{8}$").expect("valid phone regex"))
}

/// Parse a user-entered amount; it must be a number strictly greater than zero
pub fn parse_amount(raw: &str) -> ValidationResult<Decimal> {
    if raw.trim().is_empty() {
        return Err(ValidationError::new("montant", "Le montant est requis"));
    }
    let approx = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite());

    match (parse_decimal(raw), approx) {
        // Positive input that rounded to zero or below
        (Some(amount), Some(f)) if amount <= Decimal::ZERO && f > 0.0 => Err(too_precise()),
        (Some(amount), _) => {
            validate_amount(amount)?;
            Ok(amount)
        }
        (None, None) => Err(ValidationError::new(
            "montant",
            "Le montant doit être un nombre",
        )),
        (None, Some(f)) if f <= 0.0 => Err(ValidationError::new(
            "montant",
            "Le montant doit être supérieur à 0",
        )),
        (None, Some(f)) if f >= 1.0 => Err(ValidationError::new(
            "montant",
            "Le montant dépasse la limite autorisée",
        )),
        (None, Some(_)) => Err(too_precise()),
    }
}

fn too_precise() -> ValidationError {
    ValidationError::new("montant", "Le montant comporte trop de décimales")
}

/// Check an already-parsed amount
pub fn validate_amount(amount: Decimal) -> ValidationResult<()> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::new(
            "montant",
            "Le montant doit être supérieur à 0",
        ));
    }
    Ok(())
}

/// Initial balance of a new account may be zero but not negative
pub fn validate_initial_balance(amount: Decimal) -> ValidationResult<()> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::new(
            "soldeInitial",
            "Le solde initial ne peut pas être négatif",
        ));
    }
    Ok(())
}

/// Destination account number of a transfer
pub fn validate_account_number(number: &str) -> ValidationResult<()> {
    let len = number.chars().count();
    if len < ACCOUNT_NUMBER_MIN_LEN {
        return Err(ValidationError::new(
            "compteDestinationNumero",
            format!(
                "Le numéro de compte doit contenir au moins {} caractères",
                ACCOUNT_NUMBER_MIN_LEN
            ),
        ));
    }
    if len > ACCOUNT_NUMBER_MAX_LEN {
        return Err(ValidationError::new(
            "compteDestinationNumero",
            format!(
                "Le numéro de compte ne peut pas dépasser {} caractères",
                ACCOUNT_NUMBER_MAX_LEN
            ),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ValidationResult<()> {
    if !email_regex().is_match(email) {
        return Err(ValidationError::new("email", "Adresse email invalide"));
    }
    Ok(())
}

/// Moroccan mobile number: 06 or 07 followed by 8 digits
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if !phone_regex().is_match(phone) {
        return Err(ValidationError::new(
            "telephone",
            "Le numéro de téléphone doit commencer par 06 ou 07 et contenir 10 chiffres",
        ));
    }
    Ok(())
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(
            field,
            format!("Le champ {} est requis", field),
        ));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(ValidationError::new(
            "description",
            format!(
                "La description ne peut pas dépasser {} caractères",
                DESCRIPTION_MAX_LEN
            ),
        ));
    }
    Ok(())
}

/// A date filter is valid when start does not come after end
pub fn validate_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ValidationResult<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(ValidationError::new(
                "dateDebut",
                "La date de début doit précéder la date de fin",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("500").unwrap(), Decimal::new(500, 0));
        assert_eq!(parse_amount(" 12.50 ").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_amount("1e2").unwrap(), Decimal::new(100, 0));

        assert_eq!(parse_amount("").unwrap_err().message, "Le montant est requis");
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
    }

    #[test]
    fn test_parse_amount_outside_decimal_range() {
        let message = |raw: &str| parse_amount(raw).unwrap_err().message;

        assert_eq!(message("1e40"), "Le montant dépasse la limite autorisée");
        assert_eq!(message("1e-30"), "Le montant comporte trop de décimales");
        assert_eq!(
            message("0.00000000000000000000000000001"),
            "Le montant comporte trop de décimales"
        );
        assert_eq!(message("-1e40"), "Le montant doit être supérieur à 0");
        assert_eq!(message("douze"), "Le montant doit être un nombre");
        assert_eq!(message("inf"), "Le montant doit être un nombre");
    }

    #[test]
    fn test_account_number_bounds() {
        assert!(validate_account_number("123456789").is_err());
        assert!(validate_account_number("1234567890").is_ok());
        assert!(validate_account_number(&"1".repeat(24)).is_ok());
        assert!(validate_account_number(&"1".repeat(25)).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("client@ebank.ma").is_ok());
        assert!(validate_email("a.b@c.d").is_ok());
        assert!(validate_email("client@ebank").is_err());
        assert!(validate_email("client ebank@x.ma").is_err());
        assert!(validate_email("@ebank.ma").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("0612345678").is_ok());
        assert!(validate_phone("0712345678").is_ok());
        assert!(validate_phone("0512345678").is_err());
        assert!(validate_phone("061234567").is_err());
        assert!(validate_phone("06123456789").is_err());
        assert!(validate_phone("+212612345678").is_err());
    }

    #[test]
    fn test_required_and_description() {
        assert!(validate_required("nom", "  ").is_err());
        assert!(validate_required("nom", "Alami").is_ok());
        assert!(validate_description(&"x".repeat(200)).is_ok());
        assert!(validate_description(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_date_range() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1);
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert!(validate_date_range(jan, feb).is_ok());
        assert!(validate_date_range(jan, None).is_ok());
        assert!(validate_date_range(feb, jan).is_err());
    }

    #[test]
    fn test_initial_balance() {
        assert!(validate_initial_balance(Decimal::ZERO).is_ok());
        assert!(validate_initial_balance(Decimal::new(-1, 2)).is_err());
    }

    proptest! {
        #[test]
        fn prop_non_positive_amounts_rejected(cents in i64::MIN / 2..=0i64) {
            let amount = Decimal::new(cents, 2);
            prop_assert!(validate_amount(amount).is_err());
            prop_assert!(parse_amount(&amount.to_string()).is_err());
        }

        #[test]
        fn prop_positive_amounts_accepted(cents in 1i64..=i64::MAX / 2) {
            let amount = Decimal::new(cents, 2);
            prop_assert!(validate_amount(amount).is_ok());
            prop_assert_eq!(parse_amount(&amount.to_string()).unwrap(), amount);
        }

        #[test]
        fn prop_account_number_length(number in "[0-9A-Z]{0,40}") {
            let len = number.chars().count();
            let accepted = validate_account_number(&number).is_ok();
            prop_assert_eq!(accepted, (ACCOUNT_NUMBER_MIN_LEN..=ACCOUNT_NUMBER_MAX_LEN).contains(&len));
        }
    }
}
