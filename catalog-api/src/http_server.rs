use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

use crate::catalog::{CategoryTile, City, CuisineRanking, CuisineTile, DishDetail, RestaurantDetail};
use crate::engine::CatalogEngine;
use crate::error::CatalogError;
use crate::ranking::Ranked;

pub struct HttpServer {
    engine: Arc<CatalogEngine>,
    cors_origin: String,
}

#[derive(Debug, Deserialize)]
pub struct DishQuery {
    #[serde(default)]
    pub category: Option<String>,
}

impl HttpServer {
    pub fn new(engine: Arc<CatalogEngine>, cors_origin: String) -> Self {
        Self {
            engine,
            cors_origin,
        }
    }

    pub fn router(&self) -> Result<Router, CatalogError> {
        let origin =
            HeaderValue::from_str(&self.cors_origin).map_err(|e| CatalogError::ConfigError {
                message: format!("Invalid CORS origin '{}': {}", self.cors_origin, e),
            })?;

        let cors = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .allow_credentials(true);

        Ok(routes(self.engine.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http()))
    }

    pub async fn start(
        &self,
        addr: SocketAddr,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), CatalogError> {
        info!("Starting HTTP server on {}", addr);

        let app = self.router()?;
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

/// Catalog routes without middleware.
pub fn routes(engine: Arc<CatalogEngine>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/cities", get(list_cities))
        .route("/cities/{slug}", get(get_city))
        .route("/cities/{slug}/restaurants", get(restaurants_for_city))
        .route("/cities/{slug}/dishes", get(dishes_for_city))
        .route("/cities/{slug}/best-dishes", get(best_dishes))
        .route("/cities/{slug}/categories", get(categories_for_city))
        .route("/cities/{slug}/cuisines", get(cuisines_for_city))
        .route("/cities/{slug}/cuisines/{cuisine}", get(cuisine_ranking))
        .route(
            "/cities/restaurants/{restaurant_id}/dishes",
            get(dishes_for_restaurant),
        )
        .with_state(engine)
}

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "message": "Dubite API",
        "endpoints": {
            "cities": "/cities",
            "cityBySlug": "/cities/:slug (e.g. /cities/dubai)",
            "restaurants": "/cities/:slug/restaurants",
            "dishes": "/cities/:slug/dishes?category=:category",
            "bestDishes": "/cities/:slug/best-dishes",
            "categories": "/cities/:slug/categories",
            "cuisines": "/cities/:slug/cuisines",
            "cuisineRanking": "/cities/:slug/cuisines/:type",
            "restaurantDishes": "/cities/restaurants/:restaurantId/dishes"
        }
    }))
}

async fn health_check(
    State(engine): State<Arc<CatalogEngine>>,
) -> Result<Json<serde_json::Value>, CatalogError> {
    engine.health_check().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

async fn list_cities(
    State(engine): State<Arc<CatalogEngine>>,
) -> Result<Json<Vec<City>>, CatalogError> {
    Ok(Json(engine.list_cities().await?))
}

async fn get_city(
    State(engine): State<Arc<CatalogEngine>>,
    Path(slug): Path<String>,
) -> Result<Json<City>, CatalogError> {
    Ok(Json(engine.get_city(&slug).await?))
}

async fn restaurants_for_city(
    State(engine): State<Arc<CatalogEngine>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<RestaurantDetail>>, CatalogError> {
    Ok(Json(engine.restaurants_for_city(&slug).await?))
}

async fn dishes_for_city(
    State(engine): State<Arc<CatalogEngine>>,
    Path(slug): Path<String>,
    Query(query): Query<DishQuery>,
) -> Result<Json<Vec<Ranked<DishDetail>>>, CatalogError> {
    Ok(Json(
        engine
            .dishes_for_city(&slug, query.category.as_deref())
            .await?,
    ))
}

async fn best_dishes(
    State(engine): State<Arc<CatalogEngine>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Ranked<DishDetail>>>, CatalogError> {
    Ok(Json(engine.best_dishes(&slug).await?))
}

async fn categories_for_city(
    State(engine): State<Arc<CatalogEngine>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<CategoryTile>>, CatalogError> {
    Ok(Json(engine.categories_for_city(&slug).await?))
}

async fn cuisines_for_city(
    State(engine): State<Arc<CatalogEngine>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<CuisineTile>>, CatalogError> {
    Ok(Json(engine.cuisines_for_city(&slug).await?))
}

async fn cuisine_ranking(
    State(engine): State<Arc<CatalogEngine>>,
    Path((slug, cuisine)): Path<(String, String)>,
) -> Result<Json<CuisineRanking>, CatalogError> {
    Ok(Json(engine.cuisine_ranking(&slug, &cuisine).await?))
}

async fn dishes_for_restaurant(
    State(engine): State<Arc<CatalogEngine>>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<Vec<Ranked<DishDetail>>>, CatalogError> {
    Ok(Json(engine.dishes_for_restaurant(restaurant_id).await?))
}
