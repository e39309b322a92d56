use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use seerapi_mock::{app, TEST_API_KEY};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("X-SEERAPI-Key", TEST_API_KEY)
        .body(String::new())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_key_returns_401_with_error_body() {
    let resp = app()
        .oneshot(Request::builder().uri("/staging/algorithms").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["code"], 401);
    assert_eq!(body["message"], "Missing API key");
}

#[tokio::test]
async fn wrong_key_returns_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/staging/algorithms")
                .header("X-SEERAPI-Key", "nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- staging ---

#[tokio::test]
async fn list_algorithms() {
    let resp = app().oneshot(get("/staging/algorithms")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn schema_lookup_site_and_histology() {
    let resp = app()
        .oneshot(get("/staging/cs/02.05.50/schemas/lookup?site=C509&hist=8000"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let schemas = body.as_array().unwrap();
    assert_eq!(schemas.len(), 1);
    assert_eq!(schemas[0]["id"], "breast");
}

#[tokio::test]
async fn schema_lookup_without_site_is_400() {
    let resp = app()
        .oneshot(get("/staging/cs/02.05.50/schemas/lookup?hist=8000"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["code"], 400);
    assert_eq!(body["message"], "Primary site is required");
}

#[tokio::test]
async fn unknown_version_is_404() {
    let resp = app()
        .oneshot(get("/staging/cs/01.00.00/schemas/lookup?site=C509"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stage_reports_schema_and_missing_inputs() {
    let resp = app()
        .oneshot(get("/staging/cs/02.05.50/stage?site=C680&hist=8000&year_dx=2013&extension=100"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["result"], "STAGED");
    assert_eq!(body["schema_id"], "urethra");
    assert_eq!(body["output"]["schema_number"], "129");
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn stage_without_year_fails() {
    let resp = app()
        .oneshot(get("/staging/cs/02.05.50/stage?site=C680&hist=8000"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["result"], "FAILED_INVALID_YEAR_DX");
}

// --- search ---

#[tokio::test]
async fn disease_search_default_page_size() {
    let resp = app().oneshot(get("/disease/latest?q=lymphoma")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["count"], 25);
    assert_eq!(body["total"], 60);
    assert_eq!(body["results"].as_array().unwrap().len(), 25);
    assert_eq!(body["terms"], serde_json::json!(["lymphoma"]));
}

#[tokio::test]
async fn disease_search_last_page_is_short() {
    let resp = app()
        .oneshot(get("/disease/latest?q=lymphoma&count=25&offset=50"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn disease_search_zero_total_omits_results() {
    let resp = app()
        .oneshot(get("/disease/latest?q=basophilic&site_category=BAD_VALUE&count=100"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["total"], 0);
    assert!(body.get("results").is_none());
}

#[tokio::test]
async fn disease_search_rejects_large_count() {
    let resp = app().oneshot(get("/disease/latest?count=500")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn glossary_search_filters_by_category() {
    let resp = app()
        .oneshot(get("/glossary/latest?q=lymph&category=LYMPH_NODES"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["total"], 2);
}

// --- entities ---

#[tokio::test]
async fn disease_by_id_not_found() {
    let resp = app().oneshot(get("/disease/latest/id/missing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn reportability_fills_in_range() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/disease/reportability")
                .header("X-SEERAPI-Key", TEST_API_KEY)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"type":"HEMATO","icd_o3_morphology":"9840/3","primary_site":[{"low":"C421","high":"C421"}]}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["reportable"][0]["start"], 2001);
    assert_eq!(body["primary_site"][0]["low"], "C421");
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn site_recode_breast() {
    let resp = app().oneshot(get("/recode/sitegroup?site=C509&hist=8000")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["site_group"], "26000");
}

#[tokio::test]
async fn site_recode_requires_both_codes() {
    let resp = app().oneshot(get("/recode/sitegroup?site=C509")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Site and histology must be supplied");
}

#[tokio::test]
async fn site_recode_version() {
    let resp = app().oneshot(get("/recode/version")).await.unwrap();
    assert_eq!(body_json(resp).await["version"], "2008");
}

// --- staging listings ---

#[tokio::test]
async fn schema_listing_filters_by_search() {
    let resp = app().oneshot(get("/staging/cs/02.05.50/schemas")).await.unwrap();
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 5);

    let resp = app()
        .oneshot(get("/staging/cs/02.05.50/schemas?search=TONSIL"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let ids: Vec<&str> = body.as_array().unwrap().iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["pharyngeal_tonsil"]);

    let resp = app().oneshot(get("/staging/cs/02.05.50/schemas?search=skin")).await.unwrap();
    assert!(body_json(resp).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn table_by_id_and_involved_schemas() {
    let resp = app()
        .oneshot(get("/staging/tnm/1.9/table/extension_baa"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["title"], "CS Extension");

    let resp = app()
        .oneshot(get("/staging/tnm/1.9/table/extension_baa/schemas"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let ids: Vec<&str> = body.as_array().unwrap().iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["breast", "urethra"]);
}

#[tokio::test]
async fn schema_involved_tables() {
    let resp = app()
        .oneshot(get("/staging/cs/02.05.50/schema/nasopharynx/tables"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let ids: Vec<&str> = body.as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec!["primary_site", "histology", "schema_selection_nasopharynx", "year_dx_validation"]
    );
}

#[tokio::test]
async fn unknown_table_is_404() {
    let resp = app().oneshot(get("/staging/cs/02.05.50/table/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = app()
        .oneshot(get("/staging/cs/02.05.50/schema/nope/tables"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- disease reference data ---

#[tokio::test]
async fn disease_versions_route_is_not_a_search() {
    let resp = app().oneshot(get("/disease/versions")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body[0]["name"], "latest");
    assert_eq!(body[0]["count"], 76);
}

#[tokio::test]
async fn primary_site_by_code() {
    let resp = app().oneshot(get("/disease/primary_site/c021")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body[0]["label"], "Border of tongue");

    let resp = app().oneshot(get("/disease/primary_site/C999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn site_categories_carry_ranges() {
    let resp = app().oneshot(get("/disease/site_categories")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body[0]["id"], "head-and-neck");
    assert_eq!(body[0]["sites"][1]["low"], "C300");
}

#[tokio::test]
async fn same_primary_needs_every_param() {
    let resp = app()
        .oneshot(get("/disease/latest/same_primary?d1=9870%2F3&d2=9870%2F3&year=2010"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["is_same"], true);
    assert_eq!(body["year"], 2010);

    let resp = app()
        .oneshot(get("/disease/latest/same_primary?d1=9870%2F3&d2=9872%2F3"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn changelog_respects_date_bounds_and_count() {
    let resp = app().oneshot(get("/disease/latest/changelog")).await.unwrap();
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 3);

    let resp = app()
        .oneshot(get("/disease/latest/changelog?to=2014-06-01&count=1"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let logs = body.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["id"], "c-2");
    assert!(logs[0].get("mods").is_none());

    let resp = app()
        .oneshot(get("/disease/latest/changelog?from=2014-06-02"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body[0]["description"], "Revised lymphoma variants");
}

// --- naaccr ---

#[tokio::test]
async fn naaccr_field_layout() {
    let resp = app().oneshot(get("/naaccr/16/item/390")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["name"], "Date of Diagnosis");
    assert_eq!(body["length"], 8);

    let resp = app().oneshot(get("/naaccr/16/item/9999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = app().oneshot(get("/naaccr/12")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
