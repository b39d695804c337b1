//! Proptest generators for property-based testing.

use proptest::prelude::*;

use embargo_kernel::{EmbargoConfig, EmbargoReport};
use embargo_kernel_core::{EmbargoKind, NaiveDate, PolicyDirective, DEFAULT_RESTRICTION_MARKER};
use embargo_kernel_store::StoreError;

use crate::fixtures::RepositoryFixture;

/// Generate an embargo date between 2000 and 2100.
pub fn embargo_date() -> impl Strategy<Value = NaiveDate> {
    (730_120i32..=766_645i32)
        .prop_filter_map("day out of range", NaiveDate::from_num_days_from_ce_opt)
}

/// Generate terms that do not contain `marker`.
pub fn delayed_terms(marker: &str) -> impl Strategy<Value = String> {
    let marker = marker.to_string();
    "[A-Za-z0-9 ,.]{0,40}".prop_filter("terms contain marker", move |raw| {
        marker.is_empty() || !raw.contains(&marker)
    })
}

/// Generate terms with `marker` somewhere inside.
pub fn restricted_terms(marker: &str) -> impl Strategy<Value = String> {
    let marker = marker.to_string();
    ("[a-z0-9 ]{0,20}", "[a-z0-9 ,.]{0,20}")
        .prop_map(move |(prefix, suffix)| format!("{prefix}{marker}{suffix}"))
}

/// Generate terms of either kind for the default marker.
pub fn terms() -> impl Strategy<Value = String> {
    prop_oneof![
        delayed_terms(DEFAULT_RESTRICTION_MARKER),
        restricted_terms(DEFAULT_RESTRICTION_MARKER),
    ]
}

/// Generate a policy reason.
pub fn reason() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,39}".prop_map(String::from)
}

/// Which groups can read the owning collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionReaders {
    pub anonymous: bool,
    pub institutional: bool,
    /// Ordinary groups with read access, which never get directives.
    pub others: u8,
}

impl Arbitrary for CollectionReaders {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<bool>(), any::<bool>(), 0u8..4)
            .prop_map(|(anonymous, institutional, others)| CollectionReaders {
                anonymous,
                institutional,
                others,
            })
            .boxed()
    }
}

/// Parameters for one embargo application.
#[derive(Debug, Clone)]
pub struct EmbargoParams {
    pub readers: CollectionReaders,
    pub embargo_date: Option<NaiveDate>,
    pub terms: String,
    pub reason: String,
}

impl EmbargoParams {
    /// The classification the terms should receive.
    pub fn expected_kind(&self) -> EmbargoKind {
        if self.terms.contains(DEFAULT_RESTRICTION_MARKER) {
            EmbargoKind::InstitutionRestricted
        } else {
            EmbargoKind::DelayedRelease
        }
    }
}

impl Arbitrary for EmbargoParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<CollectionReaders>(),
            proptest::option::weighted(0.9, embargo_date()),
            terms(),
            reason(),
        )
            .prop_map(|(readers, embargo_date, terms, reason)| EmbargoParams {
                readers,
                embargo_date,
                terms,
                reason,
            })
            .boxed()
    }
}

/// Build a repository whose collection readers match `params`.
pub fn fixture_from_params(params: &EmbargoParams) -> Result<RepositoryFixture, StoreError> {
    let fixture = RepositoryFixture::with_config(EmbargoConfig::default());
    if params.readers.anonymous {
        fixture.grant(&fixture.anonymous)?;
    }
    if params.readers.institutional {
        fixture.grant(&fixture.institutional)?;
    }
    for n in 0..params.readers.others {
        let group = fixture.group(&format!("Department_{n}"));
        fixture.grant(&group)?;
    }
    Ok(fixture)
}

/// Decide the directives for `params` without persisting them.
pub async fn plan_from_params(
    fixture: &RepositoryFixture,
    params: &EmbargoParams,
) -> embargo_kernel::Result<Vec<PolicyDirective>> {
    fixture
        .setter()
        .plan_policies(
            fixture.item(1),
            fixture.collection,
            params.embargo_date,
            Some(&params.terms),
            &params.reason,
        )
        .await
}

/// Decide and persist the directives for `params`.
pub async fn apply_from_params(
    fixture: &RepositoryFixture,
    params: &EmbargoParams,
) -> embargo_kernel::Result<EmbargoReport> {
    fixture
        .setter()
        .generate_policies(
            fixture.item(1),
            fixture.collection,
            params.embargo_date,
            Some(&params.terms),
            &params.reason,
        )
        .await
}
