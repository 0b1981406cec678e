use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use actix_cors::Cors;
use recx_core::{
    Error, Recommender, DEFAULT_CATEGORY_TOP_N, DEFAULT_HOME_TOP_N, DEFAULT_SIMILAR_TOP_N,
    DEFAULT_SUBSCRIBED_TOP_N,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
struct ForYouSubscribedRequest {
    #[serde(default)]
    brand_names: Option<Vec<String>>,
    #[serde(default)]
    category_names: Option<Vec<String>>,
    #[serde(default)]
    top_n: Option<usize>,
}

#[derive(Deserialize)]
struct TopNQuery {
    top_n: Option<usize>,
}

#[derive(Deserialize)]
struct CategoryQuery {
    category: String,
    top_n: Option<usize>,
}

#[derive(Serialize)]
struct HealthInfo {
    title: &'static str,
    version: &'static str,
    products: usize,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        recommender: Arc<Recommender>,
        host: String,
        port: u16,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .configure(Self::configure(recommender.clone()))
        })
        .bind((host.as_str(), port))?
        .run()
        .await
    }

    /// Registers the routes and shared recommender on an app
    pub fn configure(recommender: Arc<Recommender>) -> impl FnOnce(&mut web::ServiceConfig) {
        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(web::Data::from(recommender))
                .route("/", web::get().to(health))
                .route("/recommendations/for-you-subscribed", web::post().to(for_you_subscribed))
                .route("/recommend/{product_id}", web::get().to(recommend))
                .route("/recommendations/home", web::get().to(home))
                .route("/recommendations/category", web::get().to(by_category));
        }
    }
}

fn error_response(err: &Error) -> HttpResponse {
    match err {
        Error::ProductNotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
            "detail": "Product not found"
        })),
        Error::SampleSize { .. } => HttpResponse::BadRequest().json(serde_json::json!({
            "detail": err.to_string()
        })),
        _ => {
            tracing::error!("Request failed: {}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "detail": err.to_string()
            }))
        }
    }
}

async fn health(recommender: web::Data<Recommender>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthInfo {
        title: "recx",
        version: env!("CARGO_PKG_VERSION"),
        products: recommender.catalog().len(),
    }))
}

async fn for_you_subscribed(
    recommender: web::Data<Recommender>,
    req: web::Json<ForYouSubscribedRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let brands = req.brand_names.unwrap_or_default();
    let categories = req.category_names.unwrap_or_default();
    // a zero top_n falls back to the default
    let top_n = req.top_n.filter(|&n| n > 0).unwrap_or(DEFAULT_SUBSCRIBED_TOP_N);

    match recommender.for_you_subscribed(&brands, &categories, top_n, &mut rand::rng()) {
        Ok(products) => Ok(HttpResponse::Ok().json(products)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn recommend(
    recommender: web::Data<Recommender>,
    path: web::Path<String>,
    query: web::Query<TopNQuery>,
) -> ActixResult<HttpResponse> {
    let product_id = path.into_inner();
    let top_n = query.top_n.unwrap_or(DEFAULT_SIMILAR_TOP_N);

    match recommender.similar_to(&product_id, top_n) {
        Ok(products) => Ok(HttpResponse::Ok().json(products)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn home(
    recommender: web::Data<Recommender>,
    query: web::Query<TopNQuery>,
) -> ActixResult<HttpResponse> {
    let top_n = query.top_n.unwrap_or(DEFAULT_HOME_TOP_N);

    match recommender.home(top_n, &mut rand::rng()) {
        Ok(products) => Ok(HttpResponse::Ok().json(products)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn by_category(
    recommender: web::Data<Recommender>,
    query: web::Query<CategoryQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();
    let top_n = query.top_n.unwrap_or(DEFAULT_CATEGORY_TOP_N);

    let products = recommender.by_category(&query.category, top_n, &mut rand::rng());
    Ok(HttpResponse::Ok().json(products))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use recx_core::{ProductRecord, RecommenderConfig};
    use serde_json::{json, Value};

    fn recommender() -> Arc<Recommender> {
        let records = vec![
            ProductRecord::new("1")
                .with_description("red shoe")
                .with_name("Shoe A")
                .with_brand("Nike")
                .with_category("Shoes")
                .with_price(json!(49.5)),
            ProductRecord::new("2")
                .with_description("blue shoe")
                .with_name("Shoe B")
                .with_brand("Adidas")
                .with_category("Shoes"),
            ProductRecord::new("3")
                .with_description("canvas tent")
                .with_name("Tent")
                .with_brand("REI")
                .with_category("Outdoor Gear"),
        ];
        Arc::new(Recommender::build(records, RecommenderConfig::default()).unwrap())
    }

    fn keys(record: &Value) -> Vec<String> {
        let mut keys: Vec<String> = record.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[actix_web::test]
    async fn test_recommend_similar() {
        let app = test::init_service(App::new().configure(RestApi::configure(recommender()))).await;
        let req = test::TestRequest::get().uri("/recommend/1?top_n=1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "2");
        assert_eq!(keys(&items[0]), vec!["description", "id", "image", "name", "price"]);
    }

    #[actix_web::test]
    async fn test_recommend_unknown_product() {
        let app = test::init_service(App::new().configure(RestApi::configure(recommender()))).await;
        let req = test::TestRequest::get().uri("/recommend/999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Product not found");
    }

    #[actix_web::test]
    async fn test_for_you_subscribed() {
        let app = test::init_service(App::new().configure(RestApi::configure(recommender()))).await;
        let req = test::TestRequest::post()
            .uri("/recommendations/for-you-subscribed")
            .set_json(json!({"brand_names": ["nike"], "top_n": 5}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "1");
        assert_eq!(
            keys(&items[0]),
            vec!["brand", "category", "description", "id", "image", "name", "price"]
        );
    }

    #[actix_web::test]
    async fn test_for_you_subscribed_empty_body() {
        let app = test::init_service(App::new().configure(RestApi::configure(recommender()))).await;
        let req = test::TestRequest::post()
            .uri("/recommendations/for-you-subscribed")
            .set_json(json!({}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn test_home() {
        let app = test::init_service(App::new().configure(RestApi::configure(recommender()))).await;
        let req = test::TestRequest::get().uri("/recommendations/home?top_n=2").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 2);

        let req = test::TestRequest::get().uri("/recommendations/home").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_category() {
        let app = test::init_service(App::new().configure(RestApi::configure(recommender()))).await;
        let req = test::TestRequest::get()
            .uri("/recommendations/category?category=door")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "3");

        let req = test::TestRequest::get()
            .uri("/recommendations/category?category=garden")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(RestApi::configure(recommender()))).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["title"], "recx");
        assert_eq!(body["products"], 3);
    }
}
