//! Cafe domain types.

use serde::{Deserialize, Serialize};

use cafe_core::{Amenity, CafeId};

/// A listed cafe (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cafe {
    /// Unique cafe ID.
    pub id: CafeId,
    /// Cafe name, unique across the site.
    pub name: String,
    /// Link to the cafe on a map service.
    pub map_url: String,
    /// Link to a photo of the cafe.
    pub img_url: String,
    /// City or neighbourhood.
    pub location: String,
    pub has_sockets: bool,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub can_take_calls: bool,
    /// Seat range, e.g. "0-10".
    pub seats: Option<String>,
    /// Coffee price, e.g. "$2.75".
    pub coffee_price: Option<String>,
}

impl Cafe {
    /// Amenity flags with their display labels, in listing order.
    #[must_use]
    pub fn amenities(&self) -> [(&'static str, Amenity); 4] {
        [
            ("Sockets", self.has_sockets.into()),
            ("Toilet", self.has_toilet.into()),
            ("Wifi", self.has_wifi.into()),
            ("Can take calls", self.can_take_calls.into()),
        ]
    }
}

/// A cafe that has passed form validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCafe {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub has_sockets: bool,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub can_take_calls: bool,
    pub seats: Option<String>,
    pub coffee_price: Option<String>,
}
