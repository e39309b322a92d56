//! In-memory stand-in for SEER*API.
//!
//! Serves staging metadata, lookups and computation, disease and glossary
//! search with offset pagination, disease reference data, NAACCR layouts
//! and the site recode. Every route
//! requires the `X-SEERAPI-Key` header; failures use the service's
//! `{code, message}` body.

pub mod catalog;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

use catalog::{
    histology_number, site_number, Catalog, ChangelogRecord, NaaccrFieldRecord, SchemaRecord, TableRecord, ALGORITHMS,
    NAACCR_VERSIONS, PRIMARY_SITES, SITE_CATEGORIES,
};

pub const TEST_API_KEY: &str = "test-key";
pub const DEFAULT_COUNT: usize = 25;
pub const MAX_COUNT: usize = 100;

pub struct AppState {
    api_key: String,
    catalog: Catalog,
}

pub type Db = Arc<AppState>;

/// Query parameters in arrival order; repeated keys are kept.
type Params = Query<Vec<(String, String)>>;

/// Error response carrying the service's `{code, message}` body.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({ "code": self.status.as_u16(), "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    app_with_key(TEST_API_KEY)
}

pub fn app_with_key(api_key: &str) -> Router {
    let state: Db = Arc::new(AppState {
        api_key: api_key.to_string(),
        catalog: Catalog::seeded(),
    });
    Router::new()
        .route("/staging/algorithms", get(list_algorithms))
        .route("/staging/{algorithm}/versions", get(list_versions))
        .route("/staging/{algorithm}/{version}/schemas", get(list_schemas))
        .route("/staging/{algorithm}/{version}/schemas/lookup", get(schema_lookup))
        .route("/staging/{algorithm}/{version}/schema/{id}", get(schema_by_id))
        .route("/staging/{algorithm}/{version}/schema/{id}/tables", get(schema_tables))
        .route("/staging/{algorithm}/{version}/tables", get(list_tables))
        .route("/staging/{algorithm}/{version}/table/{id}", get(table_by_id))
        .route("/staging/{algorithm}/{version}/table/{id}/schemas", get(table_schemas))
        .route("/staging/{algorithm}/{version}/stage", get(stage))
        .route("/disease/versions", get(disease_versions))
        .route("/disease/primary_site", get(primary_sites))
        .route("/disease/primary_site/{code}", get(primary_site_by_code))
        .route("/disease/site_categories", get(site_categories))
        .route("/disease/reportability", post(reportability))
        .route("/disease/{version}", get(disease_search))
        .route("/disease/{version}/id/{id}", get(disease_by_id))
        .route("/disease/{version}/same_primary", get(same_primary))
        .route("/disease/{version}/changelog", get(disease_changelog))
        .route("/glossary/{version}", get(glossary_search))
        .route("/glossary/{version}/id/{id}", get(glossary_by_id))
        .route("/naaccr/versions", get(naaccr_versions))
        .route("/naaccr/{version}", get(naaccr_field_names))
        .route("/naaccr/{version}/item/{item}", get(naaccr_field))
        .route("/recode/sitegroup", get(site_recode))
        .route("/recode/version", get(site_recode_version))
        .layer(middleware::from_fn_with_state(state.clone(), require_key))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_key(State(db): State<Db>, request: Request, next: Next) -> Response {
    let supplied = request
        .headers()
        .get("x-seerapi-key")
        .and_then(|v| v.to_str().ok());
    match supplied {
        Some(key) if key == db.api_key => next.run(request).await,
        Some(_) => ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid API key").into_response(),
        None => ApiFailure::new(StatusCode::UNAUTHORIZED, "Missing API key").into_response(),
    }
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

fn bool_param(params: &[(String, String)], key: &str) -> Result<Option<bool>, ApiFailure> {
    match param(params, key) {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(ApiFailure::bad_request(format!("Invalid value for '{key}': {other}"))),
    }
}

fn algorithm(id: &str) -> Result<&'static catalog::Algorithm, ApiFailure> {
    ALGORITHMS
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| ApiFailure::not_found(format!("Unknown algorithm '{id}'")))
}

fn check_version(alg: &catalog::Algorithm, version: &str) -> Result<(), ApiFailure> {
    if alg.version == version {
        Ok(())
    } else {
        Err(ApiFailure::not_found(format!(
            "Version '{version}' of '{}' does not exist",
            alg.id
        )))
    }
}

// ---------------------------------------------------------------------------
// Staging
// ---------------------------------------------------------------------------

async fn list_algorithms() -> Json<Value> {
    let list: Vec<Value> = ALGORITHMS
        .iter()
        .map(|a| json!({ "algorithm": a.id, "name": a.name }))
        .collect();
    Json(Value::Array(list))
}

async fn list_versions(Path(alg): Path<String>) -> Result<Json<Value>, ApiFailure> {
    let alg = algorithm(&alg)?;
    Ok(Json(json!([{
        "algorithm": alg.id,
        "version": alg.version,
        "last_modified": "2014-06-01T08:00:00.000Z"
    }])))
}

fn matching_schemas<'a>(
    db: &'a AppState,
    alg: &catalog::Algorithm,
    params: &[(String, String)],
) -> Result<Vec<&'a SchemaRecord>, ApiFailure> {
    let site_code = param(params, "site").ok_or_else(|| ApiFailure::bad_request("Primary site is required"))?;
    let site = site_number(site_code)
        .ok_or_else(|| ApiFailure::bad_request(format!("Invalid primary site '{site_code}'")))?;
    let hist = match param(params, "hist") {
        Some(code) => Some(
            histology_number(code).ok_or_else(|| ApiFailure::bad_request(format!("Invalid histology '{code}'")))?,
        ),
        None => None,
    };
    let disc = param(params, alg.discriminator_key);

    Ok(db
        .catalog
        .schemas
        .iter()
        .filter(|s| s.algorithm == alg.id)
        .filter(|s| s.sites.iter().any(|(lo, hi)| (*lo..=*hi).contains(&site)))
        .filter(|s| hist.map_or(true, |h| (s.histologies.0..=s.histologies.1).contains(&h)))
        .filter(|s| match (&s.discriminator, disc) {
            (Some(required), Some(given)) => required == given,
            _ => true,
        })
        .collect())
}

async fn schema_lookup(
    State(db): State<Db>,
    Path((alg, version)): Path<(String, String)>,
    Query(params): Params,
) -> Result<Json<Vec<SchemaRecord>>, ApiFailure> {
    let alg = algorithm(&alg)?;
    check_version(alg, &version)?;
    let found = matching_schemas(&db, alg, &params)?;
    debug!(algorithm = alg.id, matches = found.len(), "schema lookup");
    Ok(Json(found.into_iter().cloned().collect()))
}

async fn schema_by_id(
    State(db): State<Db>,
    Path((alg, version, id)): Path<(String, String, String)>,
) -> Result<Json<SchemaRecord>, ApiFailure> {
    let alg = algorithm(&alg)?;
    check_version(alg, &version)?;
    db.catalog
        .schemas
        .iter()
        .find(|s| s.algorithm == alg.id && s.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found(format!("Schema '{id}' does not exist")))
}

/// Case-insensitive match of `search` against an id or a name.
fn listed(search: Option<&str>, id: &str, name: &str) -> bool {
    match search {
        None => true,
        Some(s) => {
            let s = s.to_lowercase();
            id.to_lowercase().contains(&s) || name.to_lowercase().contains(&s)
        }
    }
}

async fn list_schemas(
    State(db): State<Db>,
    Path((alg, version)): Path<(String, String)>,
    Query(params): Params,
) -> Result<Json<Vec<SchemaRecord>>, ApiFailure> {
    let alg = algorithm(&alg)?;
    check_version(alg, &version)?;
    let search = param(&params, "search");
    Ok(Json(
        db.catalog
            .schemas
            .iter()
            .filter(|s| s.algorithm == alg.id && listed(search, &s.id, &s.name))
            .cloned()
            .collect(),
    ))
}

async fn list_tables(
    State(db): State<Db>,
    Path((alg, version)): Path<(String, String)>,
    Query(params): Params,
) -> Result<Json<Vec<TableRecord>>, ApiFailure> {
    let alg = algorithm(&alg)?;
    check_version(alg, &version)?;
    let search = param(&params, "search");
    Ok(Json(
        db.catalog
            .tables
            .iter()
            .filter(|t| t.algorithm == alg.id && listed(search, &t.id, &t.name))
            .cloned()
            .collect(),
    ))
}

fn find_table<'a>(db: &'a AppState, alg: &catalog::Algorithm, id: &str) -> Result<&'a TableRecord, ApiFailure> {
    db.catalog
        .tables
        .iter()
        .find(|t| t.algorithm == alg.id && t.id == id)
        .ok_or_else(|| ApiFailure::not_found(format!("Table '{id}' does not exist")))
}

async fn table_by_id(
    State(db): State<Db>,
    Path((alg, version, id)): Path<(String, String, String)>,
) -> Result<Json<TableRecord>, ApiFailure> {
    let alg = algorithm(&alg)?;
    check_version(alg, &version)?;
    find_table(&db, alg, &id).cloned().map(Json)
}

async fn schema_tables(
    State(db): State<Db>,
    Path((alg, version, id)): Path<(String, String, String)>,
) -> Result<Json<Vec<TableRecord>>, ApiFailure> {
    let alg = algorithm(&alg)?;
    check_version(alg, &version)?;
    if !db.catalog.schemas.iter().any(|s| s.algorithm == alg.id && s.id == id) {
        return Err(ApiFailure::not_found(format!("Schema '{id}' does not exist")));
    }
    Ok(Json(
        db.catalog
            .tables
            .iter()
            .filter(|t| t.algorithm == alg.id && t.schemas.contains(&id))
            .cloned()
            .collect(),
    ))
}

async fn table_schemas(
    State(db): State<Db>,
    Path((alg, version, id)): Path<(String, String, String)>,
) -> Result<Json<Vec<SchemaRecord>>, ApiFailure> {
    let alg = algorithm(&alg)?;
    check_version(alg, &version)?;
    let table = find_table(&db, alg, &id)?;
    Ok(Json(
        db.catalog
            .schemas
            .iter()
            .filter(|s| s.algorithm == alg.id && table.schemas.contains(&s.id))
            .cloned()
            .collect(),
    ))
}

#[derive(Serialize)]
struct StageResponse {
    result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_id: Option<String>,
    input: serde_json::Map<String, Value>,
    output: serde_json::Map<String, Value>,
    errors: Vec<Value>,
    path: Vec<String>,
}

async fn stage(
    State(db): State<Db>,
    Path((alg, version)): Path<(String, String)>,
    Query(params): Params,
) -> Result<Json<StageResponse>, ApiFailure> {
    let alg = algorithm(&alg)?;
    check_version(alg, &version)?;

    let input: serde_json::Map<String, Value> = params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    let mut response = StageResponse {
        result: "STAGED",
        schema_id: None,
        input,
        output: serde_json::Map::new(),
        errors: Vec::new(),
        path: Vec::new(),
    };

    let year_ok = param(&params, "year_dx")
        .and_then(|y| y.parse::<u32>().ok())
        .is_some_and(|y| (2004..=2100).contains(&y));
    if !year_ok {
        response.result = "FAILED_INVALID_YEAR_DX";
        return Ok(Json(response));
    }

    let found = matching_schemas(&db, alg, &params)?;
    match found.as_slice() {
        [] => response.result = "FAILED_NO_MATCHING_SCHEMA",
        [schema] => {
            response.schema_id = Some(schema.id.clone());
            response
                .output
                .insert("schema_number".to_string(), Value::String(schema.schema_num.to_string()));
            response
                .output
                .insert("csver_derived".to_string(), Value::String(version.replace('.', "")));
            response.path = vec!["primary_site".to_string(), "histology".to_string()];
            for key in ["extension", "nodes", "mets"] {
                if param(&params, key).is_none() {
                    response.errors.push(json!({ "key": key, "message": format!("'{key}' is missing") }));
                }
            }
        }
        _ => response.result = "FAILED_MULTIPLE_MATCHING_SCHEMAS",
    }
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Page {
    count: usize,
    offset: usize,
    count_only: bool,
}

fn page_params(params: &[(String, String)]) -> Result<Page, ApiFailure> {
    let count = match param(params, "count") {
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|c| (1..=MAX_COUNT).contains(c))
            .ok_or_else(|| ApiFailure::bad_request(format!("count must be between 1 and {MAX_COUNT}")))?,
        None => DEFAULT_COUNT,
    };
    let offset = match param(params, "offset") {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ApiFailure::bad_request("offset must be a non-negative integer"))?,
        None => 0,
    };
    Ok(Page {
        count,
        offset,
        count_only: bool_param(params, "count_only")?.unwrap_or(false),
    })
}

/// Lowercased query terms and whether any one of them suffices.
fn terms(params: &[(String, String)]) -> Result<(Vec<String>, bool), ApiFailure> {
    let terms = param(params, "q")
        .map(|q| q.split_whitespace().map(str::to_lowercase).collect())
        .unwrap_or_default();
    let any = match param(params, "mode") {
        None | Some("AND") => false,
        Some("OR") => true,
        Some(other) => return Err(ApiFailure::bad_request(format!("Invalid mode '{other}'"))),
    };
    Ok((terms, any))
}

fn name_matches(name: &str, terms: &[String], any: bool) -> bool {
    if terms.is_empty() {
        return true;
    }
    let name = name.to_lowercase();
    if any {
        terms.iter().any(|t| name.contains(t.as_str()))
    } else {
        terms.iter().all(|t| name.contains(t.as_str()))
    }
}

fn paged<T: Serialize>(matches: Vec<T>, page: Page, terms: Vec<String>) -> Json<Value> {
    let total = matches.len();
    let mut body = json!({ "count": page.count, "total": total, "offset": page.offset, "terms": terms });
    if !page.count_only && total > 0 {
        let results: Vec<T> = matches.into_iter().skip(page.offset).take(page.count).collect();
        body["results"] = json!(results);
    }
    Json(body)
}

async fn disease_search(
    State(db): State<Db>,
    Path(version): Path<String>,
    Query(params): Params,
) -> Result<Json<Value>, ApiFailure> {
    if version != "latest" {
        return Err(ApiFailure::not_found(format!("Version '{version}' does not exist")));
    }
    let page = page_params(&params)?;
    let (terms, any) = terms(&params)?;
    let kind = param(&params, "type");
    if let Some(k) = kind {
        if k != "SOLID_TUMOR" && k != "HEMATO" {
            return Err(ApiFailure::bad_request(format!("Invalid type '{k}'")));
        }
    }
    let category = param(&params, "site_category");

    let matches: Vec<_> = db
        .catalog
        .diseases
        .iter()
        .filter(|d| kind.map_or(true, |k| d.disease_type == k))
        .filter(|d| match category {
            Some(c) => SITE_CATEGORIES.iter().any(|sc| sc.id == c) && d.site_category.as_deref() == Some(c),
            None => true,
        })
        .filter(|d| name_matches(&d.name, &terms, any))
        .cloned()
        .collect();
    debug!(total = matches.len(), offset = page.offset, "disease search");
    Ok(paged(matches, page, terms))
}

async fn disease_by_id(
    State(db): State<Db>,
    Path((version, id)): Path<(String, String)>,
) -> Result<Json<catalog::DiseaseRecord>, ApiFailure> {
    db.catalog
        .diseases
        .iter()
        .find(|d| d.version == version && d.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found(format!("Disease '{id}' does not exist")))
}

fn check_disease_version(version: &str) -> Result<(), ApiFailure> {
    if version == "latest" {
        Ok(())
    } else {
        Err(ApiFailure::not_found(format!("Version '{version}' does not exist")))
    }
}

async fn disease_versions(State(db): State<Db>) -> Json<Value> {
    Json(json!([{
        "name": "latest",
        "type": "PUBLIC",
        "first_published": "2013-07-30T12:00:00.000Z",
        "last_modified": "2015-02-11T14:20:00.000Z",
        "count": db.catalog.diseases.len(),
    }]))
}

fn site_json(code: &str, label: &str) -> Value {
    json!({ "value": code, "label": label })
}

async fn primary_sites() -> Json<Value> {
    Json(PRIMARY_SITES.iter().map(|(c, l)| site_json(c, l)).collect())
}

async fn primary_site_by_code(Path(code): Path<String>) -> Result<Json<Value>, ApiFailure> {
    let found: Vec<Value> = PRIMARY_SITES
        .iter()
        .filter(|(c, _)| c.eq_ignore_ascii_case(&code))
        .map(|(c, l)| site_json(c, l))
        .collect();
    if found.is_empty() {
        return Err(ApiFailure::not_found(format!("Primary site '{code}' does not exist")));
    }
    Ok(Json(Value::Array(found)))
}

async fn site_categories() -> Json<Value> {
    Json(
        SITE_CATEGORIES
            .iter()
            .map(|sc| {
                let sites: Vec<Value> = sc
                    .sites
                    .iter()
                    .map(|(low, high)| json!({ "low": low, "high": high }))
                    .collect();
                json!({ "id": sc.id, "label": sc.label, "sites": sites })
            })
            .collect(),
    )
}

async fn same_primary(Path(version): Path<String>, Query(params): Params) -> Result<Json<Value>, ApiFailure> {
    check_disease_version(&version)?;
    let (Some(d1), Some(d2), Some(year)) = (param(&params, "d1"), param(&params, "d2"), param(&params, "year")) else {
        return Err(ApiFailure::bad_request("d1, d2 and year must be supplied"));
    };
    let year: i32 = year
        .parse()
        .map_err(|_| ApiFailure::bad_request(format!("Invalid year '{year}'")))?;
    Ok(Json(json!({
        "disease1": d1,
        "disease2": d2,
        "year": year,
        "is_same": d1 == d2,
    })))
}

async fn disease_changelog(
    State(db): State<Db>,
    Path(version): Path<String>,
    Query(params): Params,
) -> Result<Json<Vec<ChangelogRecord>>, ApiFailure> {
    check_disease_version(&version)?;
    let count = match param(&params, "count") {
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|c| (1..=MAX_COUNT).contains(c))
            .ok_or_else(|| ApiFailure::bad_request(format!("count must be between 1 and {MAX_COUNT}")))?,
        None => DEFAULT_COUNT,
    };
    let from = param(&params, "from");
    let to = param(&params, "to");
    // dates compare as YYYY-MM-DD prefixes of the RFC 3339 timestamps
    let found = db
        .catalog
        .changelogs
        .iter()
        .filter(|c| from.map_or(true, |f| day(&c.date) >= f))
        .filter(|c| to.map_or(true, |t| day(&c.date) <= t))
        .take(count)
        .cloned()
        .collect();
    Ok(Json(found))
}

fn day(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

async fn reportability(Json(mut disease): Json<Value>) -> Result<Json<Value>, ApiFailure> {
    let has_morphology = disease
        .get("icd_o3_morphology")
        .and_then(Value::as_str)
        .is_some_and(|m| !m.is_empty());
    if !has_morphology {
        return Err(ApiFailure::bad_request("ICD-O-3 morphology is required"));
    }
    disease["reportable"] = json!([{ "start": 2001 }]);
    Ok(Json(disease))
}

async fn glossary_search(
    State(db): State<Db>,
    Path(version): Path<String>,
    Query(params): Params,
) -> Result<Json<Value>, ApiFailure> {
    if version != "latest" {
        return Err(ApiFailure::not_found(format!("Version '{version}' does not exist")));
    }
    let page = page_params(&params)?;
    let (terms, any) = terms(&params)?;
    let categories: Vec<&str> = params
        .iter()
        .filter(|(k, _)| k == "category")
        .map(|(_, v)| v.as_str())
        .collect();

    let matches: Vec<_> = db
        .catalog
        .glossary
        .iter()
        .filter(|g| categories.is_empty() || g.category.iter().any(|c| categories.contains(&c.as_str())))
        .filter(|g| name_matches(&g.name, &terms, any))
        .cloned()
        .collect();
    Ok(paged(matches, page, terms))
}

async fn glossary_by_id(
    State(db): State<Db>,
    Path((version, id)): Path<(String, String)>,
) -> Result<Json<catalog::GlossaryRecord>, ApiFailure> {
    if version != "latest" {
        return Err(ApiFailure::not_found(format!("Version '{version}' does not exist")));
    }
    db.catalog
        .glossary
        .iter()
        .find(|g| g.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found(format!("Glossary term '{id}' does not exist")))
}

// ---------------------------------------------------------------------------
// NAACCR
// ---------------------------------------------------------------------------

fn check_naaccr_version(version: &str) -> Result<(), ApiFailure> {
    if NAACCR_VERSIONS.iter().any(|(v, _)| *v == version) {
        Ok(())
    } else {
        Err(ApiFailure::not_found(format!("NAACCR version '{version}' does not exist")))
    }
}

async fn naaccr_versions() -> Json<Value> {
    Json(
        NAACCR_VERSIONS
            .iter()
            .map(|(v, name)| json!({ "version": v, "name": name, "style": "FIXED", "length": 22824 }))
            .collect(),
    )
}

async fn naaccr_field_names(State(db): State<Db>, Path(version): Path<String>) -> Result<Json<Value>, ApiFailure> {
    check_naaccr_version(&version)?;
    Ok(Json(
        db.catalog
            .naaccr_fields
            .iter()
            .map(|f| json!({ "item": f.item, "name": f.name }))
            .collect(),
    ))
}

async fn naaccr_field(
    State(db): State<Db>,
    Path((version, item)): Path<(String, String)>,
) -> Result<Json<NaaccrFieldRecord>, ApiFailure> {
    check_naaccr_version(&version)?;
    let number: u32 = item
        .parse()
        .map_err(|_| ApiFailure::bad_request(format!("Invalid item number '{item}'")))?;
    db.catalog
        .naaccr_fields
        .iter()
        .find(|f| f.item == number)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found(format!("Item {number} does not exist")))
}

// ---------------------------------------------------------------------------
// Site recode
// ---------------------------------------------------------------------------

async fn site_recode_version() -> Json<Value> {
    Json(json!({ "version": "2008" }))
}

async fn site_recode(Query(params): Params) -> Result<Json<Value>, ApiFailure> {
    let (Some(site), Some(hist)) = (param(&params, "site"), param(&params, "hist")) else {
        return Err(ApiFailure::bad_request("Site and histology must be supplied"));
    };
    let group = match (site_number(site), histology_number(hist)) {
        (Some(s), Some(h)) if (500..=509).contains(&s) && h < 9590 => "26000",
        (Some(_), Some(h)) if (9590..=9699).contains(&h) => "33011",
        _ => "99999",
    };
    Ok(Json(json!({ "site": site, "hist": hist, "site_group": group })))
}
