//! Delivery Destination
//!
//! Where an order ships to. The state code decides both delivery eligibility
//! for unregistered sellers and the CGST/SGST vs IGST split; the country
//! decides whether the order is inside the GST regime at all.

/// Country name treated as domestic for GST purposes.
const DOMESTIC_COUNTRY: &str = "india";

/// A buyer's delivery destination.
///
/// Callers are responsible for normalising casing and whitespace of the state
/// code before constructing a destination; state comparison downstream is a
/// case-sensitive exact match. A blank state is stored as unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    country: String,
    state: Option<String>,
}

impl Destination {
    /// Create a destination from a country and an optional state code.
    pub fn new(country: impl Into<String>, state: Option<String>) -> Self {
        let state = state.filter(|s| !s.trim().is_empty());

        Self {
            country: country.into(),
            state,
        }
    }

    /// Domestic destination with a known state code.
    pub fn domestic(state: impl Into<String>) -> Self {
        Self::new("India", Some(state.into()))
    }

    /// Domestic destination whose state is not yet known.
    #[must_use]
    pub fn domestic_unknown_state() -> Self {
        Self::new("India", None)
    }

    /// The destination country as supplied.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// The destination state code, if known.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Whether the destination falls inside the GST regime.
    #[must_use]
    pub fn is_domestic(&self) -> bool {
        self.country.trim().eq_ignore_ascii_case(DOMESTIC_COUNTRY)
    }
}
