#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Once};

use async_trait::async_trait;
use catalog_api_service::catalog::{
    Category, CategorySummary, City, Cuisine, Dish, DishCategoryImage,
    DishCount, DishDetail, DishRestaurant, Restaurant, RestaurantCuisineImage, RestaurantDetail,
    RestaurantDish, Stats,
};
use catalog_api_service::repository::{DishFilter, RestaurantFilter};
use catalog_api_service::{CatalogEngine, CatalogError, CatalogRepository};
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

static INIT: Once = Once::new();

// Same rule as the SQL lookup: slug equals the lower-cased token, or the
// lower-cased name does.
pub fn matches_slug_or_name(token: &str, slug: &str, name: &str) -> bool {
    let token = token.to_lowercase();
    slug == token || name.to_lowercase() == token
}

pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn scored(score: f64) -> Stats {
    Stats {
        score: Some(score),
        avg_rating: None,
        total_reviews: None,
    }
}

/// Catalog held in memory, answering the same questions as the database.
#[derive(Default)]
pub struct InMemoryCatalog {
    pub cities: Vec<City>,
    pub cuisines: Vec<Cuisine>,
    pub categories: Vec<Category>,
    pub restaurants: Vec<Restaurant>,
    pub dishes: Vec<Dish>,
    pub restaurant_stats: HashMap<Uuid, Stats>,
    pub dish_stats: HashMap<Uuid, Stats>,
    pub unavailable: bool,
}

impl InMemoryCatalog {
    pub fn add_city(&mut self, name: &str, slug: &str) -> City {
        let city = City {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
        };
        self.cities.push(city.clone());
        city
    }

    pub fn add_cuisine(&mut self, name: &str, slug: &str, image_url: Option<&str>) -> Cuisine {
        let cuisine = Cuisine {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            image_url: image_url.map(str::to_string),
        };
        self.cuisines.push(cuisine.clone());
        cuisine
    }

    pub fn add_category(&mut self, name: &str, slug: &str, image_url: Option<&str>) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            image_url: image_url.map(str::to_string),
        };
        self.categories.push(category.clone());
        category
    }

    pub fn add_restaurant(
        &mut self,
        name: &str,
        city: &City,
        cuisine: &Cuisine,
        created_at: DateTime<Utc>,
        image_url: Option<&str>,
    ) -> Restaurant {
        let restaurant = Restaurant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            city_id: city.id,
            cuisine_id: cuisine.id,
            image_url: image_url.map(str::to_string),
            created_at,
        };
        self.restaurants.push(restaurant.clone());
        restaurant
    }

    pub fn add_dish(
        &mut self,
        name: &str,
        restaurant: &Restaurant,
        category: &Category,
        created_at: DateTime<Utc>,
        image_url: Option<&str>,
    ) -> Dish {
        let dish = Dish {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city_id: restaurant.city_id,
            restaurant_id: restaurant.id,
            category_id: category.id,
            is_active: true,
            image_url: image_url.map(str::to_string),
            created_at,
        };
        self.dishes.push(dish.clone());
        dish
    }

    pub fn deactivate(&mut self, dish: &Dish) {
        if let Some(stored) = self.dishes.iter_mut().find(|d| d.id == dish.id) {
            stored.is_active = false;
        }
    }

    pub fn into_engine(self) -> CatalogEngine {
        CatalogEngine::new(Arc::new(self))
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.unavailable {
            return Err(CatalogError::DatabaseError {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn city(&self, id: Uuid) -> City {
        self.cities.iter().find(|c| c.id == id).cloned().unwrap()
    }

    fn cuisine(&self, id: Uuid) -> Cuisine {
        self.cuisines.iter().find(|c| c.id == id).cloned().unwrap()
    }

    fn category(&self, id: Uuid) -> Category {
        self.categories.iter().find(|c| c.id == id).cloned().unwrap()
    }

    fn newest_first<T: Clone>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
        let mut items: Vec<T> = items.collect();
        items.sort_by_key(|item| std::cmp::Reverse(key(item)));
        items
    }

    fn restaurant_dishes(&self, restaurant_id: Uuid) -> Vec<RestaurantDish> {
        let dishes = self
            .dishes
            .iter()
            .filter(|d| d.restaurant_id == restaurant_id && d.is_active)
            .cloned();

        Self::newest_first(dishes, |d| d.created_at)
            .into_iter()
            .map(|dish| RestaurantDish {
                category: self.category(dish.category_id),
                stats: self.dish_stats.get(&dish.id).cloned(),
                dish,
            })
            .collect()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn find_city_by_slug(&self, slug: &str) -> Result<Option<City>, CatalogError> {
        self.check()?;
        Ok(self.cities.iter().find(|c| c.slug == slug).cloned())
    }

    async fn list_cities(&self) -> Result<Vec<City>, CatalogError> {
        self.check()?;
        let mut cities = self.cities.clone();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cities)
    }

    async fn find_category(&self, token: &str) -> Result<Option<Category>, CatalogError> {
        self.check()?;
        Ok(self
            .categories
            .iter()
            .find(|c| matches_slug_or_name(token, &c.slug, &c.name))
            .cloned())
    }

    async fn find_cuisine(&self, token: &str) -> Result<Option<Cuisine>, CatalogError> {
        self.check()?;
        Ok(self
            .cuisines
            .iter()
            .find(|c| matches_slug_or_name(token, &c.slug, &c.name))
            .cloned())
    }

    async fn find_restaurant(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Option<Restaurant>, CatalogError> {
        self.check()?;
        Ok(self
            .restaurants
            .iter()
            .find(|r| r.id == restaurant_id)
            .cloned())
    }

    async fn restaurants(
        &self,
        filter: RestaurantFilter,
    ) -> Result<Vec<RestaurantDetail>, CatalogError> {
        self.check()?;
        let matching = self.restaurants.iter().filter(|r| {
            r.city_id == filter.city_id
                && filter.cuisine_id.map_or(true, |id| r.cuisine_id == id)
        });

        Ok(Self::newest_first(matching.cloned(), |r| r.created_at)
            .into_iter()
            .map(|restaurant| RestaurantDetail {
                city: self.city(restaurant.city_id),
                cuisine: self.cuisine(restaurant.cuisine_id),
                stats: self.restaurant_stats.get(&restaurant.id).cloned(),
                dishes: filter
                    .with_dishes
                    .then(|| self.restaurant_dishes(restaurant.id)),
                count: DishCount {
                    dishes: self
                        .dishes
                        .iter()
                        .filter(|d| d.restaurant_id == restaurant.id)
                        .count() as i64,
                },
                restaurant,
            })
            .collect())
    }

    async fn active_dishes(&self, filter: DishFilter) -> Result<Vec<DishDetail>, CatalogError> {
        self.check()?;
        let matching = self.dishes.iter().filter(|d| {
            d.is_active
                && filter.city_id.map_or(true, |id| d.city_id == id)
                && filter.restaurant_id.map_or(true, |id| d.restaurant_id == id)
                && filter.category_id.map_or(true, |id| d.category_id == id)
        });

        Ok(Self::newest_first(matching.cloned(), |d| d.created_at)
            .into_iter()
            .map(|dish| {
                let owner = self
                    .restaurants
                    .iter()
                    .find(|r| r.id == dish.restaurant_id)
                    .unwrap();
                DishDetail {
                    restaurant: DishRestaurant {
                        id: owner.id,
                        name: owner.name.clone(),
                        slug: owner.slug.clone(),
                        cuisine: self.cuisine(owner.cuisine_id),
                        city: self.city(owner.city_id),
                    },
                    category: CategorySummary::from(&self.category(dish.category_id)),
                    stats: self.dish_stats.get(&dish.id).cloned(),
                    dish,
                }
            })
            .collect())
    }

    async fn dish_category_images(
        &self,
        city_id: Uuid,
    ) -> Result<Vec<DishCategoryImage>, CatalogError> {
        self.check()?;
        let matching = self
            .dishes
            .iter()
            .filter(|d| d.city_id == city_id && d.is_active && d.image_url.is_some())
            .cloned();

        Ok(Self::newest_first(matching, |d| d.created_at)
            .into_iter()
            .map(|dish| DishCategoryImage {
                category: self.category(dish.category_id),
                dish_image: dish.image_url,
            })
            .collect())
    }

    async fn restaurant_cuisine_images(
        &self,
        city_id: Uuid,
    ) -> Result<Vec<RestaurantCuisineImage>, CatalogError> {
        self.check()?;
        Ok(self
            .restaurants
            .iter()
            .filter(|r| r.city_id == city_id)
            .map(|r| RestaurantCuisineImage {
                cuisine: self.cuisine(r.cuisine_id),
                restaurant_image: r.image_url.clone(),
            })
            .collect())
    }

    async fn health_check(&self) -> Result<(), CatalogError> {
        self.check()
    }
}
