use actix_web::http::StatusCode;
use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
use actix_web::{web, App};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use trip_price::adapters::http_server::{not_found, routes, run_on};
use trip_price::{
    ClientConfig, FormOutcome, FormRunner, HealthOutcome, HttpPredictionClient, PricePredictor,
    TripForm, TripPricePredictor,
};

fn artifact(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("artifacts")
        .join(name)
}

fn load_predictor() -> Arc<dyn PricePredictor> {
    let predictor =
        TripPricePredictor::load(artifact("best_xgb.json"), artifact("preprocessor.json"))
            .expect("bundled artifacts should load");
    Arc::new(predictor)
}

fn payload() -> serde_json::Value {
    serde_json::to_value(TripForm::defaults()).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_bundled_artifacts_are_consistent() {
    let predictor =
        TripPricePredictor::load(artifact("best_xgb.json"), artifact("preprocessor.json"))
            .unwrap();
    assert_eq!(predictor.num_features(), 48);
    assert_eq!(predictor.num_trees(), 4);
}

#[test]
fn test_bundled_model_predictions() {
    let predictor = load_predictor();

    assert_close(predictor.predict(&TripForm::defaults()).unwrap(), 24.5);

    let mut premium = TripForm::defaults();
    premium.distance = 0.5;
    premium.surge_multiplier = 1.25;
    premium.cab_type = "Lyft".to_string();
    premium.name = "Lux Black XL".to_string();
    assert_close(predictor.predict(&premium).unwrap(), 34.1);
}

#[actix_web::test]
async fn test_predict_endpoint_with_bundled_artifacts() {
    let app = init_service(
        App::new()
            .app_data(web::Data::from(load_predictor()))
            .configure(routes)
            .default_service(web::to(not_found)),
    )
    .await;

    let req = TestRequest::post()
        .uri("/predict")
        .set_json(payload())
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = read_body_json(resp).await;
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert_close(object["Predicted Price"].as_f64().unwrap(), 24.5);
}

#[actix_web::test]
async fn test_every_constraint_violation_is_4xx() {
    let app = init_service(
        App::new()
            .app_data(web::Data::from(load_predictor()))
            .configure(routes),
    )
    .await;

    let violations = [
        ("distance", serde_json::json!(0.0)),
        ("distance", serde_json::json!(-3.5)),
        ("surge_multiplier", serde_json::json!(0.75)),
        ("hour", serde_json::json!(-1)),
        ("hour", serde_json::json!(24)),
        ("month", serde_json::json!(0)),
        ("month", serde_json::json!(13)),
        ("day", serde_json::json!(0)),
        ("day", serde_json::json!(32)),
        ("hour", serde_json::json!("noon")),
        ("cab_type", serde_json::json!(null)),
    ];

    for (field, value) in violations {
        let mut body = payload();
        body[field] = value.clone();

        let req = TestRequest::post()
            .uri("/predict")
            .set_json(body)
            .to_request();
        let resp = call_service(&app, req).await;
        assert!(
            resp.status().is_client_error(),
            "{} = {} returned {}",
            field,
            value,
            resp.status()
        );
    }
}

#[actix_web::test]
async fn test_malformed_json_is_rejected() {
    let app = init_service(
        App::new()
            .app_data(web::Data::from(load_predictor()))
            .configure(routes),
    )
    .await;

    let req = TestRequest::post()
        .uri("/predict")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"distance\": ")
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_integer_fields_accept_whole_number_floats() {
    let app = init_service(
        App::new()
            .app_data(web::Data::from(load_predictor()))
            .configure(routes),
    )
    .await;

    let mut body = payload();
    body["hour"] = serde_json::json!(14.0);
    body["month"] = serde_json::json!(2.0);
    body["day"] = serde_json::json!(5.0);
    let req = TestRequest::post()
        .uri("/predict")
        .set_json(body)
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let prediction: serde_json::Value = read_body_json(resp).await;
    assert_close(prediction["Predicted Price"].as_f64().unwrap(), 24.5);

    let mut body = payload();
    body["hour"] = serde_json::json!(14.5);
    let req = TestRequest::post()
        .uri("/predict")
        .set_json(body)
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_predict_without_content_type() {
    let app = init_service(
        App::new()
            .app_data(web::Data::from(load_predictor()))
            .configure(routes),
    )
    .await;

    let req = TestRequest::post()
        .uri("/predict")
        .set_payload(serde_json::to_vec(&payload()).unwrap())
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = read_body_json(resp).await;
    assert_close(body["Predicted Price"].as_f64().unwrap(), 24.5);
}

#[actix_web::test]
async fn test_form_against_running_server() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    let server = run_on(listener, Some(1), load_predictor()).unwrap();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let runner = FormRunner::new(HttpPredictionClient::new(ClientConfig::new(format!(
        "http://{}",
        address
    ))));

    match runner.submit(&TripForm::defaults()).await {
        FormOutcome::Price(price) => assert_close(price, 24.5),
        other => panic!("unexpected outcome: {}", other),
    }

    match runner.health_check().await {
        HealthOutcome::Up(body) => {
            assert_eq!(body, serde_json::json!({"status": "API is running"}))
        }
        other => panic!("unexpected health outcome: {}", other),
    }

    handle.stop(true).await;
}
