use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app("health_check_works").await;

    let response = app
        .client
        .get(app.url("/api/v1/health_check"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn choices_are_sorted_with_any_first() {
    let app = spawn_app("choices_are_sorted_with_any_first").await;

    let body: Value = app
        .client
        .get(app.url("/api/v1/filters/choices"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let regions: Vec<&str> = body["regions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["value"].as_str().unwrap())
        .collect();
    assert_eq!(regions, vec!["Any", "Africa", "Asia", "Europe"]);
    assert_eq!(body["regions"][0]["label"], "Any Region");

    let families: Vec<&str> = body["families"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        families,
        vec!["Any Family", "Corvidae", "Passeridae", "Ploceidae", "Turdidae"]
    );
}

#[tokio::test]
async fn home_page_renders_filter_form() {
    let app = spawn_app("home_page_renders_filter_form").await;

    let response = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await.unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"<select id="id_region" name="region" class="form-control">"#));
    assert!(html.contains(r#"<option value="Any">Any Region</option>"#));
    assert!(html.contains(r#"name="allow_list""#));
}

#[tokio::test]
async fn validate_accepts_populated_regions() {
    let app = spawn_app("validate_accepts_populated_regions").await;

    for region in ["Europe", "Africa"] {
        let response = app
            .client
            .post(app.url("/api/v1/filters/validate"))
            .json(&json!({ "region": region, "family": "Any", "allow_list": "Any" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["region"], region);
        assert_eq!(body["family"], "Any");
        assert_eq!(body["allow_list"], "Any");
    }
}

#[tokio::test]
async fn validate_rejects_region_without_sightings() {
    let app = spawn_app("validate_rejects_region_without_sightings").await;

    let response = app
        .client
        .post(app.url("/api/v1/filters/validate"))
        .json(&json!({ "region": "Asia", "family": "Any", "allow_list": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"]["non_field_errors"][0],
        "Any have not been found in the Asia region."
    );
}

#[tokio::test]
async fn validate_rejects_allow_list_without_matches() {
    let app = spawn_app("validate_rejects_allow_list_without_matches").await;

    let response = app
        .client
        .post(app.url("/api/v1/filters/validate"))
        .json(&json!({ "region": "Africa", "family": "Any", "allow_list": "Robin, Jay" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"]["non_field_errors"][0],
        "None of the specified birds in Any have been found in the Africa region."
    );
}

#[tokio::test]
async fn validate_accepts_allow_list_with_one_match() {
    let app = spawn_app("validate_accepts_allow_list_with_one_match").await;

    let response = app
        .client
        .post(app.url("/api/v1/filters/validate"))
        .json(&json!({ "region": "Africa", "family": "Any", "allow_list": "Robin, House Sparrow" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn validate_reports_field_errors() {
    let app = spawn_app("validate_reports_field_errors").await;

    let response = app
        .client
        .post(app.url("/api/v1/filters/validate"))
        .json(&json!({ "region": "Atlantis" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"]["region"][0],
        "Select a valid choice. Atlantis is not one of the available choices."
    );
    assert_eq!(body["errors"]["family"][0], "This field is required.");
    assert!(body["errors"].get("non_field_errors").is_none());
}

#[tokio::test]
async fn choices_follow_the_store() {
    let app = spawn_app("choices_follow_the_store").await;

    sqlx::query("INSERT INTO bird (id, name, family) VALUES (5, 'Azure-winged Magpie', 'Corvidae')")
        .execute(app.db.write())
        .await
        .unwrap();
    sqlx::query("INSERT INTO bird_region (bird_id, region_id) VALUES (5, 3)")
        .execute(app.db.write())
        .await
        .unwrap();

    let response = app
        .client
        .post(app.url("/api/v1/filters/validate"))
        .json(&json!({ "region": "Asia", "family": "Corvidae", "allow_list": "Azure-winged Magpie" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn form_submit_renders_errors_in_fragment() {
    let app = spawn_app("form_submit_renders_errors_in_fragment").await;

    let response = app
        .client
        .post(app.url("/filter"))
        .header("HX-Request", "true")
        .form(&[("region", "Europe"), ("family", "Ploceidae"), ("allow_list", "")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(!html.contains("<!DOCTYPE html>"));
    assert!(html.contains("Ploceidae have not been found in the Europe region."));
    assert!(html.contains(r#"<option value="Europe" selected>Europe</option>"#));
}

#[tokio::test]
async fn form_submit_renders_accepted_filter_page() {
    let app = spawn_app("form_submit_renders_accepted_filter_page").await;

    let response = app
        .client
        .post(app.url("/filter"))
        .form(&[("region", "Europe"), ("family", "Turdidae"), ("allow_list", "Dodo, Robin")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("is-success"));
    assert!(html.contains("Dodo, Robin"));
}

#[tokio::test]
async fn validate_handles_long_allow_list() {
    let app = spawn_app("validate_handles_long_allow_list").await;

    let mut names: Vec<String> = (0..1500).map(|i| format!("Dodo{}", i)).collect();
    let unmatched = names.join(", ");
    names.push("Robin".to_string());
    let with_robin = names.join(", ");

    let response = app
        .client
        .post(app.url("/api/v1/filters/validate"))
        .json(&json!({ "region": "Europe", "family": "Any", "allow_list": with_robin }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .client
        .post(app.url("/api/v1/filters/validate"))
        .json(&json!({ "region": "Europe", "family": "Any", "allow_list": unmatched }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let commas = ",".repeat(2000);
    let response = app
        .client
        .post(app.url("/api/v1/filters/validate"))
        .json(&json!({ "region": "Europe", "family": "Any", "allow_list": commas }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn validate_strips_allow_list_whitespace() {
    let app = spawn_app("validate_strips_allow_list_whitespace").await;

    let response = app
        .client
        .post(app.url("/api/v1/filters/validate"))
        .json(&json!({ "region": "Europe", "family": "Any", "allow_list": " Robin " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["allow_list"], "Robin");

    // padded sentinel still means no restriction
    let response = app
        .client
        .post(app.url("/api/v1/filters/validate"))
        .json(&json!({ "region": "Africa", "family": "Any", "allow_list": "Any " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["allow_list"], "Any");
}
