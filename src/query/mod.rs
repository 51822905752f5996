use serde::{Deserialize, Serialize};

/// Structured fields extracted from a free-text part request.
///
/// Produced by the language-model collaborator; the default instance is
/// the fallback used whenever extraction fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    #[serde(default)]
    pub part_type: String,
    #[serde(default)]
    pub vehicle_model: String,
    #[serde(default = "default_price_range")]
    pub price_range: (f64, f64),
}

fn default_price_range() -> (f64, f64) {
    (0.0, 999_999.0)
}

impl Default for ParsedQuery {
    fn default() -> Self {
        Self {
            part_type: String::new(),
            vehicle_model: String::new(),
            price_range: default_price_range(),
        }
    }
}

impl ParsedQuery {
    pub fn new(part_type: impl Into<String>, vehicle_model: impl Into<String>) -> Self {
        Self {
            part_type: part_type.into(),
            vehicle_model: vehicle_model.into(),
            price_range: default_price_range(),
        }
    }

    /// Canonical query string used for both caching and display.
    ///
    /// Empty fields are not validated; an empty query renders as `" for "`.
    /// Two requests that normalize to the same string are treated as the
    /// same request, which is what makes the cache effective.
    pub fn normalized(&self) -> String {
        format!("{} for {}", self.part_type, self.vehicle_model)
    }
}

/// Outcome of query extraction, keeping "parsed" and "defaulted after a
/// failure" distinguishable for the presentation layer.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    Parsed(ParsedQuery),
    Fallback { query: ParsedQuery, reason: String },
}

impl QueryOutcome {
    pub fn query(&self) -> &ParsedQuery {
        match self {
            Self::Parsed(q) => q,
            Self::Fallback { query, .. } => query,
        }
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Self::Parsed(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_query() {
        let query = ParsedQuery::new("brake pad", "Honda Civic");
        assert_eq!(query.normalized(), "brake pad for Honda Civic");
    }

    #[test]
    fn test_empty_fields_render_bare_separator() {
        let query = ParsedQuery::default();
        assert_eq!(query.normalized(), " for ");
        assert_eq!(query.price_range, (0.0, 999_999.0));
    }

    #[test]
    fn test_outcome_accessors() {
        let parsed = QueryOutcome::Parsed(ParsedQuery::new("alternator", "Ford Focus"));
        assert!(!parsed.is_fallback());
        assert!(parsed.fallback_reason().is_none());

        let fallback = QueryOutcome::Fallback {
            query: ParsedQuery::default(),
            reason: "model unreachable".to_string(),
        };
        assert!(fallback.is_fallback());
        assert_eq!(fallback.fallback_reason(), Some("model unreachable"));
        assert_eq!(fallback.query().normalized(), " for ");
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let parsed: ParsedQuery = serde_json::from_str(r#"{"part_type": "clutch"}"#).unwrap();
        assert_eq!(parsed.part_type, "clutch");
        assert_eq!(parsed.vehicle_model, "");
        assert_eq!(parsed.price_range, (0.0, 999_999.0));
    }
}
