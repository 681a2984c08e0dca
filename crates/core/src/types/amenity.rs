//! Amenity answers for the cafe submission form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Answer to an amenity question ("Wifi available?") on the cafe form.
///
/// The form offers exactly two choices, `YES` and `NO`. Parsing is
/// permissive: anything that is not `YES` counts as [`Amenity::No`], so a
/// tampered or missing select value never rejects the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Amenity {
    Yes,
    #[default]
    No,
}

impl Amenity {
    /// Choices in the order the form renders them.
    pub const CHOICES: [Self; 2] = [Self::Yes, Self::No];

    /// Interpret a submitted select value. Only the exact literal `YES` is yes.
    #[must_use]
    pub fn from_form_value(value: &str) -> Self {
        if value.trim() == "YES" {
            Self::Yes
        } else {
            Self::No
        }
    }

    /// The literal submitted by the form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }

    /// Human-readable answer for listings.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    /// The stored boolean.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for Amenity {
    fn from(available: bool) -> Self {
        if available { Self::Yes } else { Self::No }
    }
}

impl From<Amenity> for bool {
    fn from(amenity: Amenity) -> Self {
        amenity.is_available()
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_and_no() {
        assert_eq!(Amenity::from_form_value("YES"), Amenity::Yes);
        assert_eq!(Amenity::from_form_value("NO"), Amenity::No);
        assert!(Amenity::from_form_value("YES").is_available());
        assert!(!Amenity::from_form_value("NO").is_available());
    }

    #[test]
    fn test_unknown_values_are_no() {
        for value in ["", "yes", "Yes", "true", "1", "MAYBE"] {
            assert_eq!(Amenity::from_form_value(value), Amenity::No, "{value}");
        }
    }

    #[test]
    fn test_bool_conversions() {
        assert_eq!(Amenity::from(true), Amenity::Yes);
        assert!(!bool::from(Amenity::No));
    }

    #[test]
    fn test_choices_render_order() {
        let labels: Vec<&str> = Amenity::CHOICES.iter().map(Amenity::as_str).collect();
        assert_eq!(labels, ["YES", "NO"]);
    }
}
