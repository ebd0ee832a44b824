use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregate::{distinct_categories, distinct_cuisines, summarize};
use crate::catalog::{
    CategoryTile, City, CuisineRanking, CuisineTile, DishDetail, EntityRef, RestaurantDetail,
};
use crate::error::CatalogError;
use crate::ranking::{rank_dishes, sort_restaurants, Ranked};
use crate::repository::{CatalogRepository, DishFilter, RestaurantFilter};

/// City-scoped catalog queries.
///
/// Holds no state beyond its repository handle; one instance serves every
/// request for the lifetime of the process.
pub struct CatalogEngine {
    repository: Arc<dyn CatalogRepository>,
}

impl CatalogEngine {
    pub fn new(repository: Arc<dyn CatalogRepository>) -> Self {
        Self { repository }
    }

    async fn resolve_city(&self, slug: &str) -> Result<City, CatalogError> {
        self.repository
            .find_city_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::CityNotFound {
                slug: slug.to_string(),
            })
    }

    pub async fn list_cities(&self) -> Result<Vec<City>, CatalogError> {
        self.repository.list_cities().await
    }

    pub async fn get_city(&self, slug: &str) -> Result<City, CatalogError> {
        self.resolve_city(slug).await
    }

    pub async fn restaurants_for_city(
        &self,
        slug: &str,
    ) -> Result<Vec<RestaurantDetail>, CatalogError> {
        let city = self.resolve_city(slug).await?;

        let mut restaurants = self
            .repository
            .restaurants(RestaurantFilter {
                city_id: city.id,
                cuisine_id: None,
                with_dishes: false,
            })
            .await?;
        sort_restaurants(&mut restaurants);

        info!("Listing {} restaurants in '{}'", restaurants.len(), slug);
        Ok(restaurants)
    }

    /// Ranked active dishes of a city.
    ///
    /// A category token that matches nothing is ignored and the whole city is
    /// ranked; an empty token counts as no token.
    pub async fn dishes_for_city(
        &self,
        slug: &str,
        category: Option<&str>,
    ) -> Result<Vec<Ranked<DishDetail>>, CatalogError> {
        let city = self.resolve_city(slug).await?;

        let category_id = match category.filter(|token| !token.is_empty()) {
            Some(token) => {
                let found = self.repository.find_category(token).await?;
                if found.is_none() {
                    warn!(
                        "Category '{}' not found, listing all dishes in '{}'",
                        token, slug
                    );
                }
                found.map(|c| c.id)
            }
            None => None,
        };

        let dishes = self
            .repository
            .active_dishes(DishFilter::city(city.id).with_category(category_id))
            .await?;

        info!("Ranking {} dishes in '{}'", dishes.len(), slug);
        Ok(rank_dishes(dishes))
    }

    pub async fn best_dishes(&self, slug: &str) -> Result<Vec<Ranked<DishDetail>>, CatalogError> {
        self.dishes_for_city(slug, None).await
    }

    pub async fn cuisine_ranking(
        &self,
        slug: &str,
        cuisine: &str,
    ) -> Result<CuisineRanking, CatalogError> {
        let city = self.resolve_city(slug).await?;
        let cuisine = self
            .repository
            .find_cuisine(cuisine)
            .await?
            .ok_or_else(|| CatalogError::CuisineNotFound {
                cuisine: cuisine.to_string(),
            })?;

        let mut restaurants = self
            .repository
            .restaurants(RestaurantFilter {
                city_id: city.id,
                cuisine_id: Some(cuisine.id),
                with_dishes: true,
            })
            .await?;
        sort_restaurants(&mut restaurants);

        let stats = summarize(&restaurants);
        info!(
            "Cuisine '{}' in '{}': {} restaurants, avg score {:.2}",
            cuisine.slug, slug, stats.restaurant_count, stats.avg_score
        );

        Ok(CuisineRanking {
            cuisine: EntityRef::from(&cuisine),
            city: EntityRef::from(&city),
            stats,
            restaurants,
        })
    }

    pub async fn categories_for_city(&self, slug: &str) -> Result<Vec<CategoryTile>, CatalogError> {
        let city = self.resolve_city(slug).await?;
        let rows = self.repository.dish_category_images(city.id).await?;

        let tiles = distinct_categories(rows);
        info!("Found {} categories in '{}'", tiles.len(), slug);
        Ok(tiles)
    }

    pub async fn cuisines_for_city(&self, slug: &str) -> Result<Vec<CuisineTile>, CatalogError> {
        let city = self.resolve_city(slug).await?;
        let rows = self.repository.restaurant_cuisine_images(city.id).await?;

        let tiles = distinct_cuisines(rows);
        info!("Found {} cuisines in '{}'", tiles.len(), slug);
        Ok(tiles)
    }

    pub async fn dishes_for_restaurant(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Vec<Ranked<DishDetail>>, CatalogError> {
        let restaurant = self
            .repository
            .find_restaurant(restaurant_id)
            .await?
            .ok_or(CatalogError::RestaurantNotFound { restaurant_id })?;

        let dishes = self
            .repository
            .active_dishes(DishFilter::restaurant(restaurant.id))
            .await?;

        info!("Ranking {} dishes of '{}'", dishes.len(), restaurant.slug);
        Ok(rank_dishes(dishes))
    }

    pub async fn health_check(&self) -> Result<(), CatalogError> {
        self.repository.health_check().await
    }
}
