//! Address parsing for the Formal letterhead.

/// City and state/zip fragments taken from a free-text address.
///
/// Fragments are the trimmed second and third comma-delimited segments.
/// A missing segment is `None` and renders as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFragments {
    pub city: Option<String>,
    pub state_zip: Option<String>,
}

impl AddressFragments {
    /// Parses `"street, city, state zip"`. Never fails: shorter inputs
    /// yield empty fragments, extra segments are ignored.
    pub fn parse(address: &str) -> Self {
        let mut segments = address.split(',').skip(1).map(|s| s.trim().to_string());
        let city = segments.next();
        let state_zip = segments.next();
        Self { city, state_zip }
    }

    pub fn city(&self) -> &str {
        self.city.as_deref().unwrap_or("")
    }

    pub fn state_zip(&self) -> &str {
        self.state_zip.as_deref().unwrap_or("")
    }
}
