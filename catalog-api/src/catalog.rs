use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cuisine {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub city_id: Uuid,
    pub cuisine_id: Uuid,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    pub city_id: Uuid,
    pub restaurant_id: Uuid,
    pub category_id: Uuid,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Precomputed metrics attached to a restaurant or a dish.
///
/// Every field is nullable in storage. Comparisons and aggregates read them
/// through [`Stats::score_of`], [`Stats::avg_rating_of`] and
/// [`Stats::total_reviews_of`], which treat a missing record or a missing
/// value as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub score: Option<f64>,
    pub avg_rating: Option<f64>,
    pub total_reviews: Option<i32>,
}

impl Stats {
    pub fn score_of(stats: Option<&Stats>) -> f64 {
        metric(stats.and_then(|s| s.score))
    }

    pub fn avg_rating_of(stats: Option<&Stats>) -> f64 {
        metric(stats.and_then(|s| s.avg_rating))
    }

    pub fn total_reviews_of(stats: Option<&Stats>) -> i64 {
        stats.and_then(|s| s.total_reviews).map(i64::from).unwrap_or(0)
    }
}

// Non-finite values count as missing; `+ 0.0` folds -0.0 into 0.0.
fn metric(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).map_or(0.0, |v| v + 0.0)
}

/// `_count` block of a restaurant listing entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DishCount {
    pub dishes: i64,
}

/// A dish nested under its restaurant in a cuisine ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantDish {
    #[serde(flatten)]
    pub dish: Dish,
    pub category: Category,
    pub stats: Option<Stats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub city: City,
    pub cuisine: Cuisine,
    pub stats: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dishes: Option<Vec<RestaurantDish>>,
    #[serde(rename = "_count")]
    pub count: DishCount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DishRestaurant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub cuisine: Cuisine,
    pub city: City,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DishDetail {
    #[serde(flatten)]
    pub dish: Dish,
    pub restaurant: DishRestaurant,
    pub category: CategorySummary,
    pub stats: Option<Stats>,
}

/// Identity triple used in the cuisine ranking response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&City> for EntityRef {
    fn from(city: &City) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            slug: city.slug.clone(),
        }
    }
}

impl From<&Cuisine> for EntityRef {
    fn from(cuisine: &Cuisine) -> Self {
        Self {
            id: cuisine.id,
            name: cuisine.name.clone(),
            slug: cuisine.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuisineSummary {
    pub restaurant_count: usize,
    pub total_reviews: i64,
    pub avg_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuisineRanking {
    pub cuisine: EntityRef,
    pub city: EntityRef,
    pub stats: CuisineSummary,
    pub restaurants: Vec<RestaurantDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTile {
    pub id: Uuid,
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuisineTile {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image: String,
}

/// An active, imaged dish's category as seen during the category scan.
#[derive(Debug, Clone, PartialEq)]
pub struct DishCategoryImage {
    pub category: Category,
    pub dish_image: Option<String>,
}

/// A restaurant's cuisine as seen during the cuisine scan.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantCuisineImage {
    pub cuisine: Cuisine,
    pub restaurant_image: Option<String>,
}
