//! Synchronous API client core for SEER*API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `SeerClient` is stateless. It holds only a base URL and an API key.
//! - Schema lookups are checked against the algorithm's allowed keys
//!   client-side, before a request exists (`lookup`).
//! - Searches share one offset-paginated contract; `paginate` drives it to
//!   completion using the first page's `total`.
//! - Failed responses are mapped to a fixed taxonomy by `error::classify`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod input;
pub mod lookup;
pub mod paginate;
pub mod search;
pub mod types;

pub use client::{SeerClient, DEFAULT_BASE_URL};
pub use config::{ClientConfig, ConfigError};
pub use error::{classify, ApiError, ErrorBody, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use input::InputSet;
pub use lookup::{Algorithm, AllowedKeySet, SchemaLookup};
pub use paginate::{pages, Pages, Paginator};
pub use search::{OutputType, SearchMode, SearchQuery, SearchResults, DEFAULT_PAGE_SIZE};
pub use types::{
    Disease, DiseaseChangelog, DiseaseChangelogEntry, DiseaseType, DiseaseVersion, Glossary, GlossaryCategory,
    NaaccrField, NaaccrFieldName, NaaccrVersion, PrimarySite, SamePrimaries, SiteCategory, SiteRange, SiteRecode,
    SiteRecodeVersion, StageOutcome, StagingAlgorithmInfo, StagingError, StagingResult, StagingSchemaInfo,
    StagingTable, StagingVersion, YearRange,
};
