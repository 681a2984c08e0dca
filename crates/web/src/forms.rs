//! Submitted form types and their validation.
//!
//! Raw forms deserialize every field as a string (missing fields become
//! empty) so that a bad submission can always be redisplayed with the values
//! the user typed. Validation turns a raw form into a typed value or a set of
//! per-field messages.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::{Host, Url};

use cafe_core::Amenity;

use crate::models::NewCafe;

/// Message for a missing required field.
pub const REQUIRED: &str = "This field is required.";

/// Message for a malformed URL.
pub const INVALID_URL: &str = "Invalid URL.";

/// Maximum length of short text fields (`VARCHAR(250)`).
pub const MAX_TEXT_LENGTH: usize = 250;

/// Maximum length of URL fields (`VARCHAR(500)`).
pub const MAX_URL_LENGTH: usize = 500;

/// Field name -> message for a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. The first error per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    /// The error recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Whether no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with an error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Raw "add a cafe" submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CafeForm {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub has_sockets: String,
    pub has_toilet: String,
    pub has_wifi: String,
    pub can_take_calls: String,
    pub seats: String,
    pub coffee_price: String,
    /// Anti-forgery token; checked by the route, not by [`CafeForm::validate`].
    pub csrf_token: String,
}

impl CafeForm {
    /// Validate the submission into a [`NewCafe`].
    ///
    /// Text fields are trimmed. Amenity selects never fail: only `YES`
    /// counts as available.
    ///
    /// # Errors
    ///
    /// Returns every field-level problem at once.
    pub fn validate(&self) -> Result<NewCafe, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = text_field(&mut errors, "name", &self.name, MAX_TEXT_LENGTH);
        let map_url = url_field(&mut errors, "map_url", &self.map_url);
        let img_url = url_field(&mut errors, "img_url", &self.img_url);
        let location = text_field(&mut errors, "location", &self.location, MAX_TEXT_LENGTH);
        let seats = text_field(&mut errors, "seats", &self.seats, MAX_TEXT_LENGTH);
        let coffee_price =
            text_field(&mut errors, "coffee_price", &self.coffee_price, MAX_TEXT_LENGTH);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewCafe {
            name,
            map_url,
            img_url,
            location,
            has_sockets: Amenity::from_form_value(&self.has_sockets).is_available(),
            has_toilet: Amenity::from_form_value(&self.has_toilet).is_available(),
            has_wifi: Amenity::from_form_value(&self.has_wifi).is_available(),
            can_take_calls: Amenity::from_form_value(&self.can_take_calls).is_available(),
            seats: Some(seats),
            coffee_price: Some(coffee_price),
        })
    }
}

/// Login submission.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration submission.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Required, length-limited text. Returns the trimmed value.
fn text_field(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: &str,
    max: usize,
) -> String {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else if value.chars().count() > max {
        errors.add(field, format!("Field cannot be longer than {max} characters."));
    }
    value.to_owned()
}

/// Required, well-formed absolute URL. Returns the trimmed value as typed.
fn url_field(errors: &mut ValidationErrors, field: &'static str, raw: &str) -> String {
    let value = text_field(errors, field, raw, MAX_URL_LENGTH);
    if errors.get(field).is_none() && !is_well_formed_url(&value) {
        errors.add(field, INVALID_URL);
    }
    value
}

/// `http`/`https` URL whose host is an IP address or a dotted domain name.
#[must_use]
pub fn is_well_formed_url(value: &str) -> bool {
    let Ok(url) = Url::parse(value) else {
        return false;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.');
            domain
                .rsplit_once('.')
                .is_some_and(|(rest, tld)| !rest.is_empty() && !tld.is_empty())
        }
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
        None => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> CafeForm {
        CafeForm {
            name: "Lighthaus".to_string(),
            map_url: "https://goo.gl/maps/2EvhB4oq4gyUXKXx9".to_string(),
            img_url: "https://atlondonbridge.com/wp-content/uploads/2019/02/Pano_9758_9761-Edit-190918_LTS_Science_Gallery-Medium-Crop-V2.jpg".to_string(),
            location: "London Bridge".to_string(),
            has_sockets: "YES".to_string(),
            has_toilet: "NO".to_string(),
            has_wifi: "YES".to_string(),
            can_take_calls: "YES".to_string(),
            seats: "20-30".to_string(),
            coffee_price: "£2.40".to_string(),
            csrf_token: String::new(),
        }
    }

    #[test]
    fn test_valid_form() {
        let cafe = valid_form().validate().unwrap();
        assert_eq!(cafe.name, "Lighthaus");
        assert!(cafe.has_sockets);
        assert!(!cafe.has_toilet);
        assert!(cafe.has_wifi);
        assert!(cafe.can_take_calls);
        assert_eq!(cafe.seats.as_deref(), Some("20-30"));
        assert_eq!(cafe.coffee_price.as_deref(), Some("£2.40"));
    }

    #[test]
    fn test_can_take_calls_follows_submitted_value() {
        let mut form = valid_form();
        form.can_take_calls = "NO".to_string();
        assert!(!form.validate().unwrap().can_take_calls);
        form.can_take_calls = "YES".to_string();
        assert!(form.validate().unwrap().can_take_calls);
    }

    #[test]
    fn test_unknown_amenity_values_are_false_not_errors() {
        let mut form = valid_form();
        form.has_sockets = "maybe".to_string();
        form.has_wifi = String::new();
        let cafe = form.validate().unwrap();
        assert!(!cafe.has_sockets);
        assert!(!cafe.has_wifi);
    }

    #[test]
    fn test_required_fields() {
        let errors = CafeForm::default().validate().unwrap_err();
        for field in ["name", "map_url", "img_url", "location", "seats", "coffee_price"] {
            assert_eq!(errors.get(field), Some(REQUIRED), "{field}");
        }
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get("has_wifi"), None);
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let mut form = valid_form();
        form.location = "   ".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("location"), Some(REQUIRED));
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut form = valid_form();
        form.name = "  Lighthaus  ".to_string();
        assert_eq!(form.validate().unwrap().name, "Lighthaus");
    }

    #[test]
    fn test_invalid_urls() {
        let mut form = valid_form();
        form.map_url = "not a url".to_string();
        form.img_url = "ftp://files.example.com/cafe.jpg".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("map_url"), Some(INVALID_URL));
        assert_eq!(errors.get("img_url"), Some(INVALID_URL));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_url_shapes() {
        assert!(is_well_formed_url("https://example.com"));
        assert!(is_well_formed_url("http://maps.example.co.uk/path?q=1"));
        assert!(is_well_formed_url("http://192.168.0.1/img.png"));
        assert!(!is_well_formed_url("https://localhost/img.png"));
        assert!(!is_well_formed_url("example.com"));
        assert!(!is_well_formed_url("mailto:someone@example.com"));
        assert!(!is_well_formed_url(""));
    }

    #[test]
    fn test_length_limits() {
        let mut form = valid_form();
        form.name = "n".repeat(MAX_TEXT_LENGTH + 1);
        form.map_url = format!("https://example.com/{}", "p".repeat(MAX_URL_LENGTH));
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("name"),
            Some("Field cannot be longer than 250 characters.")
        );
        assert_eq!(
            errors.get("map_url"),
            Some("Field cannot be longer than 500 characters.")
        );
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "first");
        errors.add("name", "second");
        assert_eq!(errors.get("name"), Some("first"));
        assert_eq!(errors.iter().count(), 1);
    }
}
