//! Schema lookup: inputs validated against an algorithm's allowed keys.
//!
//! # Design
//! Each staging algorithm accepts its own fixed set of discriminating
//! fields. The policy is data: an [`AllowedKeySet`] selected by an
//! [`Algorithm`] tag, or supplied directly. Adding an algorithm means adding
//! a variant and its key list, nothing else.
//!
//! Validation happens in [`SchemaLookup::materialize`], entirely client-side
//! and before any request is built.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::ApiError;
use crate::input::InputSet;

pub const PRIMARY_SITE_KEY: &str = "site";
pub const HISTOLOGY_KEY: &str = "hist";
pub const SSF25_KEY: &str = "ssf25";
pub const SEX_KEY: &str = "sex";
pub const DISCRIMINATOR_1_KEY: &str = "discriminator_1";
pub const DISCRIMINATOR_2_KEY: &str = "discriminator_2";

/// Staging algorithm served by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Collaborative Stage.
    Cs,
    /// TNM, which also accepts `sex` in lookups.
    Tnm,
    /// Extent of Disease, served under the `eod_public` path id.
    Eod,
}

impl Algorithm {
    /// Identifier used in request paths.
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Cs => "cs",
            Algorithm::Tnm => "tnm",
            Algorithm::Eod => "eod_public",
        }
    }

    fn key_names(self) -> &'static [&'static str] {
        match self {
            Algorithm::Cs => &[PRIMARY_SITE_KEY, HISTOLOGY_KEY, SSF25_KEY],
            Algorithm::Tnm => &[PRIMARY_SITE_KEY, HISTOLOGY_KEY, SSF25_KEY, SEX_KEY],
            Algorithm::Eod => &[
                PRIMARY_SITE_KEY,
                HISTOLOGY_KEY,
                DISCRIMINATOR_1_KEY,
                DISCRIMINATOR_2_KEY,
            ],
        }
    }

    pub fn allowed_keys(self) -> AllowedKeySet {
        AllowedKeySet::new(self.key_names().iter().copied())
    }

    /// Key populated by the three-argument lookup constructor.
    pub fn discriminator_key(self) -> &'static str {
        match self {
            Algorithm::Cs | Algorithm::Tnm => SSF25_KEY,
            Algorithm::Eod => DISCRIMINATOR_1_KEY,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown staging algorithm `{0}`")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cs" => Ok(Algorithm::Cs),
            "tnm" => Ok(Algorithm::Tnm),
            "eod_public" | "eod" => Ok(Algorithm::Eod),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Immutable set of input keys a lookup variant may send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedKeySet {
    keys: BTreeSet<String>,
}

impl AllowedKeySet {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

/// Inputs for a schema lookup plus the policy they are checked against.
///
/// `allowed` is `None` for the generic, unrestricted lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLookup {
    inputs: InputSet,
    allowed: Option<AllowedKeySet>,
}

impl SchemaLookup {
    pub fn new(allowed: AllowedKeySet) -> Self {
        Self {
            inputs: InputSet::new(),
            allowed: Some(allowed),
        }
    }

    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        Self::new(algorithm.allowed_keys())
    }

    /// A lookup that accepts any key and leaves validation to the server.
    pub fn unrestricted() -> Self {
        Self {
            inputs: InputSet::new(),
            allowed: None,
        }
    }

    pub fn site_histology(algorithm: Algorithm, site: &str, histology: &str) -> Self {
        let mut lookup = Self::for_algorithm(algorithm);
        lookup.set_input(PRIMARY_SITE_KEY, site);
        lookup.set_input(HISTOLOGY_KEY, histology);
        lookup
    }

    pub fn site_histology_discriminator(
        algorithm: Algorithm,
        site: &str,
        histology: &str,
        discriminator: &str,
    ) -> Self {
        let mut lookup = Self::site_histology(algorithm, site, histology);
        lookup.set_input(algorithm.discriminator_key(), discriminator);
        lookup
    }

    pub fn set_input(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inputs.set_input(key, value);
    }

    pub fn inputs(&self) -> &InputSet {
        &self.inputs
    }

    pub fn allowed_keys(&self) -> Option<&AllowedKeySet> {
        self.allowed.as_ref()
    }

    /// The ordered pairs to transmit.
    ///
    /// Fails with [`ApiError::InvalidKey`] naming the first key, in insertion
    /// order, that the allowed set does not contain.
    pub fn materialize(&self) -> Result<Vec<(String, String)>, ApiError> {
        if let Some(allowed) = &self.allowed {
            if let Some(key) = self.inputs.keys().find(|k| !allowed.contains(k)) {
                return Err(ApiError::InvalidKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(self.inputs.to_pairs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn generic_keys() -> AllowedKeySet {
        AllowedKeySet::new(["site", "histology", "discriminator"])
    }

    #[test]
    fn allowed_inputs_materialize_in_order() {
        let mut lookup = SchemaLookup::new(generic_keys());
        lookup.set_input("site", "C509");
        lookup.set_input("histology", "8000");
        assert_eq!(
            lookup.materialize().unwrap(),
            pairs(&[("site", "C509"), ("histology", "8000")])
        );
    }

    #[test]
    fn disallowed_key_is_named() {
        let mut lookup = SchemaLookup::new(generic_keys());
        lookup.set_input("site", "C509");
        lookup.set_input("histology", "8000");
        lookup.set_input("ssf", "010");
        assert_eq!(
            lookup.materialize().unwrap_err(),
            ApiError::InvalidKey {
                key: "ssf".to_string()
            }
        );
    }

    #[test]
    fn first_disallowed_key_wins() {
        let mut lookup = SchemaLookup::for_algorithm(Algorithm::Cs);
        lookup.set_input("year_dx", "2015");
        lookup.set_input("sex", "1");
        assert!(matches!(
            lookup.materialize(),
            Err(ApiError::InvalidKey { key }) if key == "year_dx"
        ));
    }

    #[test]
    fn materialize_does_not_mutate() {
        let lookup = SchemaLookup::site_histology(Algorithm::Cs, "C509", "8000");
        let before = lookup.clone();
        let first = lookup.materialize().unwrap();
        let second = lookup.materialize().unwrap();
        assert_eq!(first, second);
        assert_eq!(lookup, before);
    }

    #[test]
    fn cs_discriminator_uses_ssf25() {
        let lookup = SchemaLookup::site_histology_discriminator(Algorithm::Cs, "C111", "8000", "010");
        assert_eq!(
            lookup.materialize().unwrap(),
            pairs(&[("site", "C111"), ("hist", "8000"), ("ssf25", "010")])
        );
    }

    #[test]
    fn eod_discriminator_uses_discriminator_1() {
        let lookup = SchemaLookup::site_histology_discriminator(Algorithm::Eod, "C111", "8000", "1");
        assert_eq!(lookup.inputs().get("discriminator_1"), Some("1"));
        assert!(lookup.materialize().is_ok());
    }

    #[test]
    fn sex_is_allowed_for_tnm_only() {
        let mut tnm = SchemaLookup::site_histology(Algorithm::Tnm, "C481", "8000");
        tnm.set_input(SEX_KEY, "2");
        assert!(tnm.materialize().is_ok());

        let mut cs = SchemaLookup::site_histology(Algorithm::Cs, "C481", "8000");
        cs.set_input(SEX_KEY, "2");
        assert!(cs.materialize().is_err());
    }

    #[test]
    fn unrestricted_accepts_anything() {
        let mut lookup = SchemaLookup::unrestricted();
        lookup.set_input("anything", "goes");
        assert!(lookup.allowed_keys().is_none());
        assert_eq!(lookup.materialize().unwrap(), pairs(&[("anything", "goes")]));
    }

    #[test]
    fn empty_lookup_materializes_to_nothing() {
        assert!(SchemaLookup::for_algorithm(Algorithm::Tnm)
            .materialize()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn algorithm_round_trips_through_id() {
        for alg in [Algorithm::Cs, Algorithm::Tnm, Algorithm::Eod] {
            assert_eq!(alg.id().parse::<Algorithm>().unwrap(), alg);
        }
        assert!("seer".parse::<Algorithm>().is_err());
    }
}
