use std::net::SocketAddr;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use travelbot_api::{build_app, AppConfig};

fn offline_app() -> Router {
    build_app(AppConfig::offline()).expect("app should build")
}

fn plan_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/plan")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_reports_offline_capabilities() {
    let response = offline_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-content-type-options")
            .and_then(|value| value.to_str().ok()),
        Some("nosniff")
    );
    assert!(response.headers().get("x-request-id").is_some());

    let parsed = json_body(response).await;
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["capabilities"]["llm"], false);
    assert_eq!(parsed["capabilities"]["maps"], false);
    assert_eq!(parsed["metrics"]["plan_requests_total"], 0);
}

#[tokio::test]
async fn cities_lists_builtin_catalog() {
    let response = offline_app()
        .oneshot(Request::builder().uri("/cities").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    let codes = parsed["cities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|city| city["code"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(codes, vec!["osaka", "seoul"]);
    assert_eq!(parsed["cities"][0]["label"], "Osaka");
}

#[tokio::test]
async fn night_view_day_puts_scenic_spots_in_the_evening() {
    let response = offline_app()
        .oneshot(plan_request(json!({
            "city": "osaka",
            "days": 1,
            "interests": ["night-view"],
            "max_walk_min": 20,
            "travel_style": "mixed"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    let plans = parsed["plans"].as_array().unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0]["id"], "A");

    let day = plans[0]["draft"]["itinerary"]["Day 1"].as_array().unwrap();
    assert_eq!(day.len(), 2);
    assert_eq!(day[0]["slot"], "Night");
    assert_eq!(day[0]["name"], "Dōtonbori");
    assert_eq!(day[1]["slot"], "Dinner");
    assert_eq!(day[1]["name"], "Umeda Sky Building");

    let maps_url = day[0]["maps_url"].as_str().unwrap();
    assert_eq!(
        maps_url,
        "https://www.google.com/maps/search/?api=1&query=D%C5%8Dtonbori%20osaka"
    );
    assert!(day[0].get("lat").is_none());
    assert!(day[0].get("lng").is_none());

    assert!(!plans[0]["narrative"].as_str().unwrap().is_empty());
    assert_eq!(plans[0]["summary"]["highlights"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["draft"], plans[0]["draft"]);
    assert_eq!(parsed["narrative"], plans[0]["narrative"]);
    assert_eq!(parsed["pref"]["city"], "osaka");
}

#[tokio::test]
async fn plan_count_is_clamped_to_three_variants() {
    let response = offline_app()
        .oneshot(plan_request(json!({
            "city": "osaka",
            "days": 1,
            "interests": ["night-view"],
            "num_plans": 5
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    let plans = parsed["plans"].as_array().unwrap();
    let ids = plans
        .iter()
        .map(|plan| plan["id"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["A", "B", "C"]);

    let first = &plans[1]["draft"]["itinerary"]["Day 1"][0];
    assert_eq!(first["name"], "Umeda Sky Building");
    assert_eq!(first["slot"], "Night");
}

#[tokio::test]
async fn defaults_fill_an_empty_request() {
    let response = offline_app()
        .oneshot(plan_request(json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    assert_eq!(parsed["pref"]["city"], "osaka");
    assert_eq!(parsed["pref"]["days"], 2);
    assert_eq!(parsed["pref"]["travel_style"], "mixed");

    let labels = parsed["draft"]["itinerary"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["Day 1", "Day 2"]);
}

#[tokio::test]
async fn zero_days_is_rejected() {
    let response = offline_app()
        .oneshot(plan_request(json!({ "city": "osaka", "days": 0 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let parsed = json_body(response).await;
    assert_eq!(parsed["error"], "invalid_preference");
}

#[tokio::test]
async fn negative_walk_limit_is_rejected() {
    let response = offline_app()
        .oneshot(plan_request(json!({ "max_walk_min": -5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_city_yields_empty_days() {
    let response = offline_app()
        .oneshot(plan_request(json!({ "city": "atlantis", "days": 3 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    let itinerary = parsed["plans"][0]["draft"]["itinerary"].as_object().unwrap();
    assert_eq!(itinerary.len(), 3);
    assert!(itinerary
        .values()
        .all(|items| items.as_array().unwrap().is_empty()));
}

#[tokio::test]
async fn custom_catalog_is_loaded_from_disk() {
    let path = std::env::temp_dir().join(format!("travelbot-catalog-{}.json", std::process::id()));
    std::fs::write(
        &path,
        json!([
            {
                "city": "Kyoto",
                "name": "Fushimi Inari",
                "tags": ["traditional", "walk"],
                "avg_stay": 120,
                "walk_min": 10,
                "price": "$"
            }
        ])
        .to_string(),
    )
    .unwrap();

    let mut config = AppConfig::offline();
    config.catalog_path = Some(path.clone());
    let app = build_app(config).expect("app should build");

    let response = app
        .oneshot(plan_request(json!({
            "city": "kyoto",
            "days": 1,
            "interests": ["walk"]
        })))
        .await
        .unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    let day = parsed["draft"]["itinerary"]["Day 1"].as_array().unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0]["name"], "Fushimi Inari");
    assert_eq!(day[0]["slot"], "Morning");
    assert_eq!(day[0]["eta_min"], 120);
}

#[tokio::test]
async fn missing_catalog_fails_startup() {
    let mut config = AppConfig::offline();
    config.catalog_path = Some("/nonexistent/travelbot/catalog.json".into());
    assert!(build_app(config).is_err());
}

#[tokio::test]
async fn rate_limit_applies_per_client_but_not_to_health() {
    let mut config = AppConfig::offline();
    config.rate_limit_max = 1;
    config.rate_limit_window = Duration::from_secs(60);
    let app = build_app(config).expect("app should build");

    let cities = || {
        Request::builder()
            .uri("/cities")
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap()
    };

    let first = app.clone().oneshot(cities()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.clone().oneshot(cities()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    let health = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-forwarded-for", "203.0.113.7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let padding = "x".repeat(70 * 1024);
    let body = json!({ "city": padding }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/plan")
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap();

    let response = offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn peers_without_forwarded_header_get_their_own_quota() {
    let mut config = AppConfig::offline();
    config.rate_limit_max = 1;
    let app = build_app(config).expect("app should build");

    let from_peer = |octet: u8| {
        let mut request = Request::builder()
            .uri("/cities")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, octet], 50000))));
        request
    };

    let first = app.clone().oneshot(from_peer(1)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let other_peer = app.clone().oneshot(from_peer(2)).await.unwrap();
    assert_eq!(other_peer.status(), StatusCode::OK);

    let repeat = app.oneshot(from_peer(1)).await.unwrap();
    assert_eq!(repeat.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn summary_is_returned_when_flag_is_off() {
    let response = offline_app()
        .oneshot(plan_request(json!({ "with_summary": false })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    let summary = &parsed["plans"][0]["summary"];
    assert_eq!(summary["highlights"].as_array().unwrap().len(), 3);
    assert_eq!(summary["warnings"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn plan_accepts_body_without_content_type() {
    let request = Request::builder()
        .method("POST")
        .uri("/plan")
        .body(Body::from(json!({ "city": "seoul", "days": 1 }).to_string()))
        .unwrap();

    let response = offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    assert_eq!(parsed["pref"]["city"], "seoul");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/plan")
        .header("content-type", "application/json")
        .body(Body::from("{\"city\": "))
        .unwrap();

    let response = offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let parsed = json_body(response).await;
    assert_eq!(parsed["error"], "invalid_json");
}
