//! Stateless HTTP request builder and response parser for SEER*API.
//!
//! # Design
//! `SeerClient` holds only a base URL and an API key and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip, keeping
//! the core deterministic and free of I/O dependencies.
//!
//! Schema lookups are validated before a request exists, so a disallowed
//! key never costs a round trip. Every non-2xx response goes through
//! [`classify`].

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{classify, ApiError};
use crate::http::{build_url, encode_segment, HttpMethod, HttpRequest, HttpResponse, API_KEY_HEADER};
use crate::input::InputSet;
use crate::lookup::{Algorithm, SchemaLookup};
use crate::search::{SearchQuery, SearchResults, DATE_FORMAT};
use crate::types::{
    Disease, DiseaseChangelog, DiseaseVersion, Glossary, NaaccrField, NaaccrFieldName, NaaccrVersion, PrimarySite,
    SamePrimaries, SiteCategory, SiteRecode, SiteRecodeVersion, StagingAlgorithmInfo, StagingResult,
    StagingSchemaInfo, StagingTable, StagingVersion,
};

/// Production endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.seer.cancer.gov/rest";

/// Synchronous, stateless client for SEER*API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct SeerClient {
    base_url: String,
    api_key: String,
}

impl SeerClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<K, V>(&self, segment: &str, params: &[(K, V)]) -> HttpRequest
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let path = build_url(&self.base_url, segment, params);
        debug!(method = "GET", %path, "built request");
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: self.default_headers(),
            body: None,
        }
    }

    fn default_headers(&self) -> Vec<(String, String)> {
        vec![
            (API_KEY_HEADER.to_string(), self.api_key.clone()),
            ("Accept".to_string(), "application/json".to_string()),
        ]
    }

    // -----------------------------------------------------------------------
    // Staging
    // -----------------------------------------------------------------------

    pub fn build_algorithms(&self) -> HttpRequest {
        self.get::<&str, &str>("/staging/algorithms", &[])
    }

    pub fn build_versions(&self, algorithm: Algorithm) -> HttpRequest {
        self.get::<&str, &str>(&format!("/staging/{}/versions", algorithm.id()), &[])
    }

    /// Fails with `ApiError::InvalidKey` before any request is built if the
    /// lookup holds a key its algorithm does not accept.
    pub fn build_schema_lookup(
        &self,
        algorithm: Algorithm,
        version: &str,
        lookup: &SchemaLookup,
    ) -> Result<HttpRequest, ApiError> {
        let params = lookup.materialize()?;
        Ok(self.get(
            &format!("/staging/{}/{}/schemas/lookup", algorithm.id(), encode_segment(version)),
            &params,
        ))
    }

    pub fn build_schema_by_id(&self, algorithm: Algorithm, version: &str, id: &str) -> HttpRequest {
        self.get::<&str, &str>(
            &format!(
                "/staging/{}/{}/schema/{}",
                algorithm.id(),
                encode_segment(version),
                encode_segment(id)
            ),
            &[],
        )
    }

    /// Every schema of a version, optionally narrowed by a free-text `search`.
    pub fn build_schemas(&self, algorithm: Algorithm, version: &str, search: Option<&str>) -> HttpRequest {
        self.get(
            &format!("/staging/{}/{}/schemas", algorithm.id(), encode_segment(version)),
            &search_param(search),
        )
    }

    pub fn build_tables(&self, algorithm: Algorithm, version: &str, search: Option<&str>) -> HttpRequest {
        self.get(
            &format!("/staging/{}/{}/tables", algorithm.id(), encode_segment(version)),
            &search_param(search),
        )
    }

    pub fn build_table_by_id(&self, algorithm: Algorithm, version: &str, id: &str) -> HttpRequest {
        self.get::<&str, &str>(&self.staging_path(algorithm, version, "table", id, None), &[])
    }

    /// Tables a schema reads while staging.
    pub fn build_schema_involved_tables(&self, algorithm: Algorithm, version: &str, schema_id: &str) -> HttpRequest {
        self.get::<&str, &str>(
            &self.staging_path(algorithm, version, "schema", schema_id, Some("tables")),
            &[],
        )
    }

    /// Schemas that reference a table.
    pub fn build_table_involved_schemas(&self, algorithm: Algorithm, version: &str, table_id: &str) -> HttpRequest {
        self.get::<&str, &str>(
            &self.staging_path(algorithm, version, "table", table_id, Some("schemas")),
            &[],
        )
    }

    fn staging_path(&self, algorithm: Algorithm, version: &str, kind: &str, id: &str, tail: Option<&str>) -> String {
        let mut path = format!(
            "/staging/{}/{}/{kind}/{}",
            algorithm.id(),
            encode_segment(version),
            encode_segment(id)
        );
        if let Some(tail) = tail {
            path.push('/');
            path.push_str(tail);
        }
        path
    }

    /// Staging accepts the algorithm's full input set; no key filter applies.
    pub fn build_stage(&self, algorithm: Algorithm, version: &str, inputs: &InputSet) -> HttpRequest {
        let params = inputs.to_pairs();
        self.get(
            &format!("/staging/{}/{}/stage", algorithm.id(), encode_segment(version)),
            &params,
        )
    }

    pub fn parse_algorithms(&self, response: HttpResponse) -> Result<Vec<StagingAlgorithmInfo>, ApiError> {
        parse_json(response)
    }

    pub fn parse_versions(&self, response: HttpResponse) -> Result<Vec<StagingVersion>, ApiError> {
        parse_json(response)
    }

    pub fn parse_schema_lookup(&self, response: HttpResponse) -> Result<Vec<StagingSchemaInfo>, ApiError> {
        parse_json(response)
    }

    pub fn parse_schema_by_id(&self, response: HttpResponse) -> Result<StagingSchemaInfo, ApiError> {
        parse_json(response)
    }

    pub fn parse_stage(&self, response: HttpResponse) -> Result<StagingResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_schemas(&self, response: HttpResponse) -> Result<Vec<StagingSchemaInfo>, ApiError> {
        parse_json(response)
    }

    pub fn parse_tables(&self, response: HttpResponse) -> Result<Vec<StagingTable>, ApiError> {
        parse_json(response)
    }

    pub fn parse_table_by_id(&self, response: HttpResponse) -> Result<StagingTable, ApiError> {
        parse_json(response)
    }

    pub fn parse_schema_involved_tables(&self, response: HttpResponse) -> Result<Vec<StagingTable>, ApiError> {
        parse_json(response)
    }

    pub fn parse_table_involved_schemas(&self, response: HttpResponse) -> Result<Vec<StagingSchemaInfo>, ApiError> {
        parse_json(response)
    }

    // -----------------------------------------------------------------------
    // Disease
    // -----------------------------------------------------------------------

    pub fn build_disease_versions(&self) -> HttpRequest {
        self.get::<&str, &str>("/disease/versions", &[])
    }

    pub fn build_disease_primary_sites(&self) -> HttpRequest {
        self.get::<&str, &str>("/disease/primary_site", &[])
    }

    pub fn build_disease_primary_site_code(&self, code: &str) -> HttpRequest {
        self.get::<&str, &str>(&format!("/disease/primary_site/{}", encode_segment(code)), &[])
    }

    pub fn build_disease_site_categories(&self) -> HttpRequest {
        self.get::<&str, &str>("/disease/site_categories", &[])
    }

    /// Ask whether two morphologies diagnosed in `year` are one primary.
    pub fn build_disease_same_primaries(
        &self,
        version: &str,
        morphology1: &str,
        morphology2: &str,
        year: &str,
    ) -> HttpRequest {
        self.get(
            &format!("/disease/{}/same_primary", encode_segment(version)),
            &[("d1", morphology1), ("d2", morphology2), ("year", year)],
        )
    }

    /// Change sets published between `from` and `to` (inclusive), newest
    /// first, at most `count` of them.
    pub fn build_disease_changelogs(
        &self,
        version: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        count: Option<u32>,
    ) -> HttpRequest {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(from) = from {
            params.push(("from", from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = to {
            params.push(("to", to.format(DATE_FORMAT).to_string()));
        }
        if let Some(count) = count {
            params.push(("count", count.to_string()));
        }
        self.get(&format!("/disease/{}/changelog", encode_segment(version)), &params)
    }

    pub fn build_disease_search(&self, version: &str, query: &SearchQuery) -> HttpRequest {
        self.get(&format!("/disease/{}", encode_segment(version)), &query.to_params())
    }

    pub fn build_disease_by_id(&self, version: &str, id: &str) -> HttpRequest {
        self.get::<&str, &str>(
            &format!("/disease/{}/id/{}", encode_segment(version), encode_segment(id)),
            &[],
        )
    }

    /// Ask the service for the reportable year range of a partial disease.
    pub fn build_disease_reportability(&self, disease: &Disease) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(disease).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut headers = self.default_headers();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        let path = build_url::<&str, &str>(&self.base_url, "/disease/reportability", &[]);
        debug!(method = "POST", %path, "built request");
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path,
            headers,
            body: Some(body),
        })
    }

    pub fn parse_disease_search(&self, response: HttpResponse) -> Result<SearchResults<Disease>, ApiError> {
        parse_json(response)
    }

    pub fn parse_disease_by_id(&self, response: HttpResponse) -> Result<Disease, ApiError> {
        parse_json(response)
    }

    pub fn parse_disease_reportability(&self, response: HttpResponse) -> Result<Disease, ApiError> {
        parse_json(response)
    }

    pub fn parse_disease_versions(&self, response: HttpResponse) -> Result<Vec<DiseaseVersion>, ApiError> {
        parse_json(response)
    }

    pub fn parse_disease_primary_sites(&self, response: HttpResponse) -> Result<Vec<PrimarySite>, ApiError> {
        parse_json(response)
    }

    pub fn parse_disease_site_categories(&self, response: HttpResponse) -> Result<Vec<SiteCategory>, ApiError> {
        parse_json(response)
    }

    pub fn parse_disease_same_primaries(&self, response: HttpResponse) -> Result<SamePrimaries, ApiError> {
        parse_json(response)
    }

    pub fn parse_disease_changelogs(&self, response: HttpResponse) -> Result<Vec<DiseaseChangelog>, ApiError> {
        parse_json(response)
    }

    // -----------------------------------------------------------------------
    // Glossary
    // -----------------------------------------------------------------------

    pub fn build_glossary_search(&self, version: &str, query: &SearchQuery) -> HttpRequest {
        self.get(&format!("/glossary/{}", encode_segment(version)), &query.to_params())
    }

    pub fn build_glossary_by_id(&self, version: &str, id: &str) -> HttpRequest {
        self.get::<&str, &str>(
            &format!("/glossary/{}/id/{}", encode_segment(version), encode_segment(id)),
            &[],
        )
    }

    pub fn parse_glossary_search(&self, response: HttpResponse) -> Result<SearchResults<Glossary>, ApiError> {
        parse_json(response)
    }

    pub fn parse_glossary_by_id(&self, response: HttpResponse) -> Result<Glossary, ApiError> {
        parse_json(response)
    }

    // -----------------------------------------------------------------------
    // Site recode
    // -----------------------------------------------------------------------

    pub fn build_site_recode(&self, site: &str, histology: &str) -> HttpRequest {
        self.get("/recode/sitegroup", &[("site", site), ("hist", histology)])
    }

    pub fn parse_site_recode(&self, response: HttpResponse) -> Result<SiteRecode, ApiError> {
        parse_json(response)
    }

    pub fn build_site_recode_version(&self) -> HttpRequest {
        self.get::<&str, &str>("/recode/version", &[])
    }

    pub fn parse_site_recode_version(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse_json::<SiteRecodeVersion>(response).map(|v| v.version)
    }

    // -----------------------------------------------------------------------
    // NAACCR
    // -----------------------------------------------------------------------

    pub fn build_naaccr_versions(&self) -> HttpRequest {
        self.get::<&str, &str>("/naaccr/versions", &[])
    }

    pub fn build_naaccr_field_names(&self, version: &str) -> HttpRequest {
        self.get::<&str, &str>(&format!("/naaccr/{}", encode_segment(version)), &[])
    }

    pub fn build_naaccr_field(&self, version: &str, item: u32) -> HttpRequest {
        self.get::<&str, &str>(&format!("/naaccr/{}/item/{item}", encode_segment(version)), &[])
    }

    pub fn parse_naaccr_versions(&self, response: HttpResponse) -> Result<Vec<NaaccrVersion>, ApiError> {
        parse_json(response)
    }

    pub fn parse_naaccr_field_names(&self, response: HttpResponse) -> Result<Vec<NaaccrFieldName>, ApiError> {
        parse_json(response)
    }

    pub fn parse_naaccr_field(&self, response: HttpResponse) -> Result<NaaccrField, ApiError> {
        parse_json(response)
    }
}

fn search_param(search: Option<&str>) -> Vec<(&'static str, &str)> {
    search.map(|s| vec![("search", s)]).unwrap_or_default()
}

/// Classify non-success statuses, then deserialize the body.
fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let err = classify(Some(response.status), Some(&response.body));
    debug!(status = response.status, error = %err, "request failed");
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn client() -> SeerClient {
        SeerClient::new("http://localhost:3000", "test-key")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn requests_carry_key_and_accept_headers() {
        let req = client().build_algorithms();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/staging/algorithms");
        assert_eq!(req.header("x-seerapi-key"), Some("test-key"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert!(req.body.is_none());
    }

    #[test]
    fn schema_lookup_preserves_input_order() {
        let lookup = SchemaLookup::site_histology_discriminator(Algorithm::Cs, "C111", "8000", "010");
        let req = client().build_schema_lookup(Algorithm::Cs, "02.05.50", &lookup).unwrap();
        assert_eq!(
            req.path,
            "http://localhost:3000/staging/cs/02.05.50/schemas/lookup?site=C111&hist=8000&ssf25=010"
        );
    }

    #[test]
    fn schema_lookup_rejects_disallowed_key_before_building() {
        let mut lookup = SchemaLookup::site_histology(Algorithm::Cs, "C509", "8000");
        lookup.set_input("year_dx", "2015");
        let err = client().build_schema_lookup(Algorithm::Cs, "02.05.50", &lookup).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn stage_sends_every_input() {
        let inputs: InputSet = [("site", "C680"), ("hist", "8000"), ("year_dx", "2013")]
            .into_iter()
            .collect();
        let req = client().build_stage(Algorithm::Cs, "02.05.50", &inputs);
        assert_eq!(req.query_pairs().len(), 3);
        assert!(req.path.starts_with("http://localhost:3000/staging/cs/02.05.50/stage?site=C680"));
    }

    #[test]
    fn disease_search_uses_query_params() {
        let query = SearchQuery::text("basophilic").count(25).offset(50);
        let req = client().build_disease_search("latest", &query);
        assert_eq!(
            req.path,
            "http://localhost:3000/disease/latest?q=basophilic&count=25&offset=50"
        );
    }

    #[test]
    fn ids_are_percent_encoded() {
        let req = client().build_glossary_by_id("latest", "a b/c");
        assert_eq!(req.path, "http://localhost:3000/glossary/latest/id/a%20b%2Fc");
    }

    #[test]
    fn reportability_posts_json_without_nulls() {
        let disease = Disease {
            disease_type: Some(crate::types::DiseaseType::Hemato),
            icd_o3_morphology: Some("9840/3".to_string()),
            ..Disease::default()
        };
        let req = client().build_disease_reportability(&disease).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/disease/reportability");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["icd_o3_morphology"], "9840/3");
        assert!(body.get("version").is_none());
        assert!(body.get("id").is_none());
        assert!(body.get("name").is_none());
    }

    #[test]
    fn reportability_echo_without_identity_parses() {
        let disease = client()
            .parse_disease_reportability(ok(
                r#"{"type":"HEMATO","icd_o3_morphology":"9840/3","primary_site":[{"low":"C421","high":"C421"}],"reportable":[{"start":2001}]}"#,
            ))
            .unwrap();
        assert_eq!(disease.id, None);
        assert_eq!(disease.reportable.len(), 1);
    }

    #[test]
    fn reduced_output_search_page_parses() {
        let page = client()
            .parse_disease_search(ok(r#"{"count":25,"total":1,"results":[{"id":"x","name":"y"}]}"#))
            .unwrap();
        assert_eq!(page.results[0].name.as_deref(), Some("y"));
        assert_eq!(page.results[0].disease_type, None);
    }

    #[test]
    fn schema_and_table_listing_paths() {
        let c = client();
        assert_eq!(
            c.build_schemas(Algorithm::Cs, "02.05.50", Some("skin")).path,
            "http://localhost:3000/staging/cs/02.05.50/schemas?search=skin"
        );
        assert_eq!(
            c.build_tables(Algorithm::Cs, "02.05.50", None).path,
            "http://localhost:3000/staging/cs/02.05.50/tables"
        );
        assert_eq!(
            c.build_table_by_id(Algorithm::Eod, "3.0", "primary_site").path,
            "http://localhost:3000/staging/eod_public/3.0/table/primary_site"
        );
        assert_eq!(
            c.build_schema_involved_tables(Algorithm::Cs, "02.05.50", "urethra").path,
            "http://localhost:3000/staging/cs/02.05.50/schema/urethra/tables"
        );
        assert_eq!(
            c.build_table_involved_schemas(Algorithm::Cs, "02.05.50", "extension_baa").path,
            "http://localhost:3000/staging/cs/02.05.50/table/extension_baa/schemas"
        );
    }

    #[test]
    fn disease_reference_paths() {
        let c = client();
        assert_eq!(c.build_disease_versions().path, "http://localhost:3000/disease/versions");
        assert_eq!(
            c.build_disease_primary_site_code("C021").path,
            "http://localhost:3000/disease/primary_site/C021"
        );
        assert_eq!(
            c.build_disease_same_primaries("latest", "9870/3", "9872/3", "2010").path,
            "http://localhost:3000/disease/latest/same_primary?d1=9870%2F3&d2=9872%2F3&year=2010"
        );
    }

    #[test]
    fn changelog_params_skip_unset_bounds() {
        let to = NaiveDate::from_ymd_opt(2013, 7, 30);
        let req = client().build_disease_changelogs("latest", None, to, Some(1));
        assert_eq!(
            req.path,
            "http://localhost:3000/disease/latest/changelog?to=2013-07-30&count=1"
        );
    }

    #[test]
    fn naaccr_and_recode_version() {
        let c = client();
        assert_eq!(c.build_naaccr_field("16", 390).path, "http://localhost:3000/naaccr/16/item/390");
        assert_eq!(c.build_naaccr_field_names("16").path, "http://localhost:3000/naaccr/16");
        let version = c.parse_site_recode_version(ok(r#"{"version":"2008"}"#)).unwrap();
        assert_eq!(version, "2008");
    }

    #[test]
    fn site_recode_request() {
        let req = client().build_site_recode("C509", "8000");
        assert_eq!(req.path, "http://localhost:3000/recode/sitegroup?site=C509&hist=8000");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = SeerClient::new("http://localhost:3000/", "k");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.build_algorithms().path, "http://localhost:3000/staging/algorithms");
    }

    #[test]
    fn parse_schema_lookup_success() {
        let schemas = client()
            .parse_schema_lookup(ok(r#"[{"algorithm":"cs","version":"02.05.50","id":"breast","name":"Breast"}]"#))
            .unwrap();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].id, "breast");
    }

    #[test]
    fn parse_search_with_zero_total() {
        let page = client().parse_disease_search(ok(r#"{"count":100,"total":0}"#)).unwrap();
        assert_eq!(page.total, 0);
        assert!(page.results.is_empty());
    }

    #[test]
    fn parse_error_body_message_verbatim() {
        let response = HttpResponse {
            status: 401,
            headers: Vec::new(),
            body: r#"{"code":401,"message":"Invalid API key"}"#.to_string(),
        };
        let err = client().parse_disease_by_id(response).unwrap_err();
        assert_eq!(
            err,
            ApiError::Unauthorized {
                status: 401,
                message: "Invalid API key".to_string()
            }
        );
    }

    #[test]
    fn parse_not_found() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: String::new(),
        };
        let err = client().parse_schema_by_id(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn parse_bad_json() {
        let err = client().parse_site_recode(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn repeated_builds_are_identical() {
        let lookup = SchemaLookup::site_histology(Algorithm::Tnm, "C509", "8000");
        let c = client();
        assert_eq!(
            c.build_schema_lookup(Algorithm::Tnm, "1.9", &lookup).unwrap(),
            c.build_schema_lookup(Algorithm::Tnm, "1.9", &lookup).unwrap()
        );
    }
}
