//! Search term interpretation.
//!
//! A numeric term highlights exact bucketed prices; anything else is
//! treated as a case-insensitive substring filter on the venue id,
//! applied upstream of aggregation.

/// Interpreted free-text search term.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchTerm {
    /// Empty term: no search.
    None,
    /// Numeric term: exact-price highlight.
    Price(f64),
    /// Non-numeric term: venue substring filter (lowercased).
    VenueSubstring(String),
}

impl SearchTerm {
    pub fn parse(term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() {
            return SearchTerm::None;
        }
        match term.parse::<f64>() {
            Ok(price) if price.is_finite() => SearchTerm::Price(price),
            _ => SearchTerm::VenueSubstring(term.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_term_is_price() {
        assert_eq!(SearchTerm::parse("101.5"), SearchTerm::Price(101.5));
        assert_eq!(SearchTerm::parse("  42 "), SearchTerm::Price(42.0));
        assert_eq!(SearchTerm::parse("-3.5"), SearchTerm::Price(-3.5));
    }

    #[test]
    fn test_text_term_is_venue_filter() {
        assert_eq!(
            SearchTerm::parse("Binance"),
            SearchTerm::VenueSubstring("binance".to_string())
        );
        assert_eq!(
            SearchTerm::parse("101.5x"),
            SearchTerm::VenueSubstring("101.5x".to_string())
        );
    }

    #[test]
    fn test_empty_and_degenerate_terms() {
        assert_eq!(SearchTerm::parse(""), SearchTerm::None);
        assert_eq!(SearchTerm::parse("   "), SearchTerm::None);
        // Parseable but non-finite floats are not usable price searches.
        assert_eq!(
            SearchTerm::parse("NaN"),
            SearchTerm::VenueSubstring("nan".to_string())
        );
    }
}
