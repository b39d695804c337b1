//! Embargo terms and their classification.
//!
//! Depositors supply a free-text terms string. The only structure the
//! embargo engine recognizes in it is a marker phrase meaning "restrict to
//! the institution"; everything else is a plain delayed release. The string
//! is classified once, here, and the decision engine only ever sees the
//! resulting [`EmbargoKind`].

use serde::{Deserialize, Serialize};

/// Marker phrase used by the hosting platform's deposit form.
pub const DEFAULT_RESTRICTION_MARKER: &str = "Restrict to UW";

/// How an embargo treats the institutional population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbargoKind {
    /// Everyone who currently reads waits for the embargo date.
    DelayedRelease,
    /// The public waits; the institutional population reads immediately.
    InstitutionRestricted,
}

impl EmbargoKind {
    /// Classify a raw terms string against a marker phrase.
    ///
    /// Matching is a case-sensitive substring test. An empty marker never
    /// matches, so a misconfigured marker cannot silently turn every embargo
    /// into an institution-restricted one.
    pub fn classify(raw: &str, marker: &str) -> Self {
        if !marker.is_empty() && raw.contains(marker) {
            EmbargoKind::InstitutionRestricted
        } else {
            EmbargoKind::DelayedRelease
        }
    }

    pub fn permits_institution(&self) -> bool {
        matches!(self, EmbargoKind::InstitutionRestricted)
    }
}

/// A terms string together with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbargoTerms {
    raw: String,
    kind: EmbargoKind,
}

impl EmbargoTerms {
    /// Classify terms using the default marker phrase.
    pub fn parse(raw: impl Into<String>) -> Self {
        Self::parse_with_marker(raw, DEFAULT_RESTRICTION_MARKER)
    }

    /// Classify terms using a configured marker phrase.
    pub fn parse_with_marker(raw: impl Into<String>, marker: &str) -> Self {
        let raw = raw.into();
        let kind = EmbargoKind::classify(&raw, marker);
        Self { raw, kind }
    }

    /// The terms exactly as supplied by the depositor.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> EmbargoKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_delay() {
        let terms = EmbargoTerms::parse("Delay release 6 months");
        assert_eq!(terms.kind(), EmbargoKind::DelayedRelease);
        assert_eq!(terms.raw(), "Delay release 6 months");
    }

    #[test]
    fn test_marker_anywhere_in_terms() {
        assert_eq!(
            EmbargoTerms::parse("Restrict to UW").kind(),
            EmbargoKind::InstitutionRestricted
        );
        assert_eq!(
            EmbargoTerms::parse("Restrict to UW for 2 years").kind(),
            EmbargoKind::InstitutionRestricted
        );
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        assert_eq!(
            EmbargoTerms::parse("restrict to uw").kind(),
            EmbargoKind::DelayedRelease
        );
    }

    #[test]
    fn test_custom_marker() {
        let terms = EmbargoTerms::parse_with_marker("Campus only, 1 year", "Campus only");
        assert!(terms.kind().permits_institution());
    }

    #[test]
    fn test_empty_marker_never_matches() {
        assert_eq!(EmbargoKind::classify("anything", ""), EmbargoKind::DelayedRelease);
    }

    proptest! {
        #[test]
        fn test_terms_without_marker_are_delayed(raw in "[a-z0-9 ]{0,40}") {
            // Lowercase input can never contain the capitalized marker.
            prop_assert_eq!(EmbargoTerms::parse(raw).kind(), EmbargoKind::DelayedRelease);
        }

        #[test]
        fn test_marker_with_surrounding_text(prefix in ".{0,20}", suffix in ".{0,20}") {
            let raw = format!("{prefix}{DEFAULT_RESTRICTION_MARKER}{suffix}");
            prop_assert!(EmbargoTerms::parse(raw).kind().permits_institution());
        }
    }
}
