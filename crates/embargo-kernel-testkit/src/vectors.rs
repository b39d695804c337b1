//! Scenario vectors for the embargo decision.
//!
//! Each vector names the reserved groups that can read the owning
//! collection, the embargo date and terms, and the read grants the item
//! should end up with. Any store backend should reproduce all of them.

use embargo_kernel::{EmbargoConfig, EmbargoError};
use embargo_kernel_core::{
    parse_embargo_date, EffectiveUntil, PolicyDirective, ReservedRole,
};

use crate::fixtures::RepositoryFixture;

/// A scenario vector.
#[derive(Debug, Clone)]
pub struct ScenarioVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Reserved groups with read access on the collection.
    pub readers: &'static [ReservedRole],
    /// Embargo date as entered on the deposit form.
    pub embargo_date: Option<&'static str>,
    /// Embargo terms.
    pub terms: &'static str,
    /// Expected grants in order: role and start date, `None` for unbounded.
    pub expected: &'static [(ReservedRole, Option<&'static str>)],
}

/// Get all scenario vectors.
pub fn all_scenarios() -> Vec<ScenarioVector> {
    use ReservedRole::{Anonymous, Institutional};

    vec![
        ScenarioVector {
            name: "Delayed release of a public collection",
            readers: &[Anonymous],
            embargo_date: Some("2026-01-01"),
            terms: "Delay release 6 months",
            expected: &[(Anonymous, Some("2026-01-01"))],
        },
        ScenarioVector {
            name: "Restricted to institution, public and institutional readers",
            readers: &[Anonymous, Institutional],
            embargo_date: Some("2026-01-01"),
            terms: "Restrict to UW",
            expected: &[(Anonymous, Some("2026-01-01")), (Institutional, None)],
        },
        ScenarioVector {
            name: "Restricted to institution, institutional readers only",
            readers: &[Institutional],
            embargo_date: Some("2026-01-01"),
            terms: "Restrict to UW",
            expected: &[(Institutional, None)],
        },
        ScenarioVector {
            name: "Delayed release leaves institutional readers alone",
            readers: &[Anonymous, Institutional],
            embargo_date: Some("2030-06-15"),
            terms: "Delay release 1 year",
            expected: &[(Anonymous, Some("2030-06-15"))],
        },
        ScenarioVector {
            name: "Restricted terms without institutional readers",
            readers: &[Anonymous],
            embargo_date: Some("2026-01-01"),
            terms: "Restrict to UW for 2 years",
            expected: &[(Anonymous, Some("2026-01-01"))],
        },
        ScenarioVector {
            name: "Marker is case sensitive",
            readers: &[Anonymous, Institutional],
            embargo_date: Some("2026-01-01"),
            terms: "restrict to uw",
            expected: &[(Anonymous, Some("2026-01-01"))],
        },
        ScenarioVector {
            name: "No embargo date",
            readers: &[Anonymous, Institutional],
            embargo_date: None,
            terms: "Restrict to UW",
            expected: &[],
        },
        ScenarioVector {
            name: "Private collection",
            readers: &[],
            embargo_date: Some("2026-01-01"),
            terms: "Restrict to UW",
            expected: &[],
        },
    ]
}

/// Apply a vector to a fresh memory repository and return the directives.
pub async fn run_scenario(vector: &ScenarioVector) -> Result<Vec<PolicyDirective>, EmbargoError> {
    let fixture = RepositoryFixture::with_config(EmbargoConfig::default());
    for role in vector.readers {
        let group = match role {
            ReservedRole::Anonymous => &fixture.anonymous,
            ReservedRole::Institutional => &fixture.institutional,
        };
        fixture.grant(group)?;
    }

    let embargo_date = vector.embargo_date.map(parse_embargo_date).transpose().map_err(|e| {
        EmbargoError::InvalidConfig(format!("vector {:?}: {e}", vector.name))
    })?;

    let report = fixture
        .setter()
        .generate_policies(
            fixture.item(1),
            fixture.collection,
            embargo_date,
            Some(vector.terms),
            vector.name,
        )
        .await?;
    Ok(report.directives)
}

/// Check directives against a vector's expected grants.
pub fn matches_expected(vector: &ScenarioVector, directives: &[PolicyDirective]) -> bool {
    let names = EmbargoConfig::default().reserved_groups;
    directives.len() == vector.expected.len()
        && directives
            .iter()
            .zip(vector.expected)
            .all(|(directive, (role, until))| {
                let expected_until = match until {
                    Some(date) => match parse_embargo_date(date) {
                        Ok(date) => EffectiveUntil::Until(date),
                        Err(_) => return false,
                    },
                    None => EffectiveUntil::Unbounded,
                };
                directive.group.name == names.name_for(*role)
                    && directive.effective_until == expected_until
            })
}

/// Verify all scenario vectors.
///
/// Returns each vector's name, whether it matched, and what was produced.
pub async fn verify_all_scenarios() -> Vec<(String, bool, String)> {
    let mut results = Vec::new();
    for vector in all_scenarios() {
        let (matched, produced) = match run_scenario(&vector).await {
            Ok(directives) => {
                let rendered = directives
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                (matches_expected(&vector, &directives), rendered)
            }
            Err(e) => (false, e.to_string()),
        };
        results.push((vector.name.to_string(), matched, produced));
    }
    results
}
