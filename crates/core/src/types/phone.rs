//! Mobile phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character that is not a digit, space, dash, or
    /// leading `+`.
    #[error("phone number contains invalid characters")]
    InvalidCharacter,
    /// The normalized number is not ten digits.
    #[error("phone number must be 10 digits")]
    InvalidLength,
    /// The normalized number does not start with 6-9.
    #[error("mobile numbers start with 6, 7, 8, or 9")]
    InvalidPrefix,
}

/// An Indian mobile number, normalized to its ten-digit form.
///
/// Accepts common input variations (`+91` country prefix, leading `0`,
/// spaces and dashes) and stores the bare ten digits the backend expects
/// for `mobileNumber` fields and phone lookups.
///
/// ## Examples
///
/// ```
/// use estatehub_core::Phone;
///
/// let phone = Phone::parse("+91 98765 43210").unwrap();
/// assert_eq!(phone.as_str(), "9876543210");
///
/// assert!(Phone::parse("12345").is_err());      // too short
/// assert!(Phone::parse("1234567890").is_err()); // bad prefix
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string, normalizing to ten digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Contains characters other than digits, spaces, dashes, or a
    ///   leading `+`
    /// - Is not ten digits after stripping a `+91` or `0` prefix
    /// - Does not start with 6-9
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.trim().is_empty() {
            return Err(PhoneError::Empty);
        }

        let mut digits = String::with_capacity(s.len());
        for (i, c) in s.trim().chars().enumerate() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' => {}
                '+' if i == 0 => {}
                _ => return Err(PhoneError::InvalidCharacter),
            }
        }

        let digits = digits
            .strip_prefix("91")
            .filter(|rest| rest.len() == 10)
            .map_or_else(
                || digits.strip_prefix('0').unwrap_or(&digits).to_owned(),
                ToOwned::to_owned,
            );

        if digits.len() != 10 {
            return Err(PhoneError::InvalidLength);
        }

        if !digits.starts_with(['6', '7', '8', '9']) {
            return Err(PhoneError::InvalidPrefix);
        }

        Ok(Self(digits))
    }

    /// Returns the normalized ten-digit number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_ten_digits() {
        let phone = Phone::parse("9876543210").unwrap();
        assert_eq!(phone.as_str(), "9876543210");
    }

    #[test]
    fn test_parse_with_country_code() {
        assert_eq!(Phone::parse("+919876543210").unwrap().as_str(), "9876543210");
        assert_eq!(Phone::parse("919876543210").unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_parse_with_leading_zero() {
        assert_eq!(Phone::parse("09876543210").unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_parse_with_separators() {
        assert_eq!(
            Phone::parse("+91 98765 43210").unwrap().as_str(),
            "9876543210"
        );
        assert_eq!(Phone::parse("98765-43210").unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
        assert!(matches!(Phone::parse("   "), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            Phone::parse("98765abc10"),
            Err(PhoneError::InvalidCharacter)
        ));
        assert!(matches!(
            Phone::parse("98765+43210"),
            Err(PhoneError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(Phone::parse("12345"), Err(PhoneError::InvalidLength)));
        assert!(matches!(
            Phone::parse("98765432101"),
            Err(PhoneError::InvalidLength)
        ));
    }

    #[test]
    fn test_parse_bad_prefix() {
        assert!(matches!(
            Phone::parse("1234567890"),
            Err(PhoneError::InvalidPrefix)
        ));
    }

    #[test]
    fn test_number_starting_with_91_is_not_stripped() {
        // 91-prefixed input is only a country code when 12 digits long
        assert_eq!(Phone::parse("9198765432").unwrap().as_str(), "9198765432");
    }

    #[test]
    fn test_display() {
        let phone = Phone::parse("9876543210").unwrap();
        assert_eq!(format!("{phone}"), "9876543210");
    }

    #[test]
    fn test_serde_round_trip() {
        let phone = Phone::parse("9876543210").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"9876543210\"");

        let parsed: Phone = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }

    #[test]
    fn test_from_str() {
        let phone: Phone = "9876543210".parse().unwrap();
        assert_eq!(phone.as_str(), "9876543210");
    }
}
