use crate::config::toml_config::ServiceConfig;
use crate::domain::model::{ErrorDetail, HealthStatus, PredictionResponse, TripFeatures};
use crate::domain::ports::PricePredictor;
use crate::utils::error::TripPriceError;
use crate::utils::validation::Validate;
use actix_web::dev::Server;
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::web;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::ResponseError;
use std::net::TcpListener;
use std::sync::Arc;

/// 欄位檢查失敗回 422，其餘錯誤一律 400，body 皆為 `{"detail": ...}`
impl ResponseError for TripPriceError {
    fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::BAD_REQUEST
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail::new(self.to_string()))
    }
}

pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus::running())
}

pub async fn predict(
    predictor: web::Data<dyn PricePredictor>,
    trip: web::Json<TripFeatures>,
) -> HttpResponse {
    let trip = trip.into_inner();

    if let Err(e) = trip.validate() {
        tracing::debug!("Rejected trip features: {}", e);
        return e.error_response();
    }

    match predictor.predict(&trip) {
        Ok(price) => HttpResponse::Ok().json(PredictionResponse {
            predicted_price: price,
        }),
        Err(e) => {
            // 推論過程中的任何錯誤都以 400 回傳錯誤字串
            tracing::warn!("❌ Prediction failed: {}", e);
            HttpResponse::BadRequest().json(ErrorDetail::new(e.to_string()))
        }
    }
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorDetail::new("Not Found"))
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorDetail::new("Method Not Allowed"))
}

/// 不要求 `Content-Type: application/json`，沒有標頭的請求照樣解析
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req: &HttpRequest| {
            let detail = ErrorDetail::new(err.to_string());
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::UnprocessableEntity().json(detail),
            )
            .into()
        })
}

/// Registers `GET /` and `POST /predict`. The predictor is expected as
/// `web::Data<dyn PricePredictor>` app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(root))
        .service(
            web::resource("/predict")
                .route(web::post().to(predict))
                .default_service(web::to(method_not_allowed)),
        );
}

pub fn run_on(
    listener: TcpListener,
    workers: Option<usize>,
    predictor: Arc<dyn PricePredictor>,
) -> std::io::Result<Server> {
    let predictor: web::Data<dyn PricePredictor> = web::Data::from(predictor);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .app_data(predictor.clone())
            .configure(routes)
            .default_service(web::to(not_found))
    });
    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    Ok(server.listen(listener)?.run())
}

pub async fn serve(config: &ServiceConfig, predictor: Arc<dyn PricePredictor>) -> std::io::Result<()> {
    let (host, port) = config.bind_address();
    let listener = TcpListener::bind((host.as_str(), port))?;
    tracing::info!("🚀 Trip Price Prediction API listening on {}", listener.local_addr()?);

    run_on(listener, config.server.workers, predictor)?.await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::Result;
    use actix_web::test;

    struct FixedPredictor(f64);

    impl PricePredictor for FixedPredictor {
        fn predict(&self, _trip: &TripFeatures) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct FailingPredictor;

    impl PricePredictor for FailingPredictor {
        fn predict(&self, _trip: &TripFeatures) -> Result<f64> {
            Err(TripPriceError::UnknownCategoryError {
                column: "name".to_string(),
                value: "Rickshaw".to_string(),
            })
        }
    }

    fn payload() -> serde_json::Value {
        serde_json::json!({
            "distance": 2.0,
            "cab_type": "Lyft",
            "source": "Fenway",
            "destination": "Back Bay",
            "surge_multiplier": 1.25,
            "name": "Lyft XL",
            "hour": 22,
            "temp": 38.5,
            "clouds": 0.6,
            "pressure": 1002.0,
            "humidity": 0.75,
            "wind": 8.0,
            "month": 11,
            "day": 27
        })
    }

    macro_rules! app_with {
        ($predictor:expr) => {{
            let predictor: Arc<dyn PricePredictor> = Arc::new($predictor);
            test::init_service(
                App::new()
                    .app_data(web::Data::from(predictor))
                    .configure(routes)
                    .default_service(web::to(not_found)),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_root_reports_running() {
        let app = app_with!(FixedPredictor(1.0));
        let req = test::TestRequest::get().uri("/").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!({"status": "API is running"}));
    }

    #[actix_web::test]
    async fn test_predict_success() {
        let app = app_with!(FixedPredictor(17.25));
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(payload())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({"Predicted Price": 17.25}));
    }

    #[actix_web::test]
    async fn test_predict_constraint_violation() {
        let app = app_with!(FixedPredictor(1.0));
        let mut bad = payload();
        bad["hour"] = serde_json::json!(24);

        let req = test::TestRequest::post().uri("/predict").set_json(bad).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: ErrorDetail = test::read_body_json(resp).await;
        assert!(body.detail.starts_with("hour:"), "{}", body.detail);
    }

    #[actix_web::test]
    async fn test_predict_missing_field() {
        let app = app_with!(FixedPredictor(1.0));
        let mut bad = payload();
        bad.as_object_mut().unwrap().remove("distance");

        let req = test::TestRequest::post().uri("/predict").set_json(bad).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: ErrorDetail = test::read_body_json(resp).await;
        assert!(body.detail.contains("distance"), "{}", body.detail);
    }

    #[actix_web::test]
    async fn test_predict_inference_failure_is_bad_request() {
        let app = app_with!(FailingPredictor);
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(payload())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorDetail = test::read_body_json(resp).await;
        assert_eq!(
            body.detail,
            "Found unknown category 'Rickshaw' in column 'name'"
        );
    }

    #[actix_web::test]
    async fn test_unknown_route_and_method() {
        let app = app_with!(FixedPredictor(1.0));

        let req = test::TestRequest::get().uri("/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/predict").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
