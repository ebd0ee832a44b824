use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::{
    Category, City, Cuisine, DishCategoryImage, DishDetail, Restaurant, RestaurantCuisineImage,
    RestaurantDetail,
};
use crate::error::CatalogError;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Which restaurants to load, and how much of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestaurantFilter {
    pub city_id: Uuid,
    pub cuisine_id: Option<Uuid>,
    /// Attach each restaurant's active dishes with category and stats.
    pub with_dishes: bool,
}

/// Which active dishes to load. `None` fields do not constrain the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DishFilter {
    pub city_id: Option<Uuid>,
    pub restaurant_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

impl DishFilter {
    pub fn city(city_id: Uuid) -> Self {
        Self {
            city_id: Some(city_id),
            ..Self::default()
        }
    }

    pub fn restaurant(restaurant_id: Uuid) -> Self {
        Self {
            restaurant_id: Some(restaurant_id),
            ..Self::default()
        }
    }

    pub fn with_category(self, category_id: Option<Uuid>) -> Self {
        Self {
            category_id,
            ..self
        }
    }
}

/// Read access to the catalog tables.
///
/// Implementations fetch and stitch related records; ordering beyond what
/// each method documents, ranking and aggregation are left to the caller.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_city_by_slug(&self, slug: &str) -> Result<Option<City>>;

    /// All cities ordered by name ascending.
    async fn list_cities(&self) -> Result<Vec<City>>;

    /// First category whose slug equals the lower-cased token or whose name
    /// equals the token case-insensitively.
    async fn find_category(&self, token: &str) -> Result<Option<Category>>;

    /// Same matching rule as [`CatalogRepository::find_category`].
    async fn find_cuisine(&self, token: &str) -> Result<Option<Cuisine>>;

    async fn find_restaurant(&self, restaurant_id: Uuid) -> Result<Option<Restaurant>>;

    /// Restaurants with city, cuisine, stats and dish count, newest first.
    async fn restaurants(&self, filter: RestaurantFilter) -> Result<Vec<RestaurantDetail>>;

    /// Active dishes with restaurant summary, category and stats, newest first.
    async fn active_dishes(&self, filter: DishFilter) -> Result<Vec<DishDetail>>;

    /// Categories of a city's active dishes that carry an image, one row per
    /// dish, newest dish first.
    async fn dish_category_images(&self, city_id: Uuid) -> Result<Vec<DishCategoryImage>>;

    /// Cuisines of a city's restaurants, one row per restaurant, storage order.
    async fn restaurant_cuisine_images(
        &self,
        city_id: Uuid,
    ) -> Result<Vec<RestaurantCuisineImage>>;

    async fn health_check(&self) -> Result<()>;
}
