use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::catalog::{Category, City, Cuisine, Dish, Restaurant, Stats};
use crate::schema::{categories, cities, cuisines, dishes, restaurants, stats};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = cities)]
#[diesel(primary_key(id))]
pub struct CityRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = cuisines)]
#[diesel(primary_key(id))]
pub struct CuisineRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = categories)]
#[diesel(primary_key(id))]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = restaurants)]
#[diesel(primary_key(id))]
pub struct RestaurantRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub city_id: Uuid,
    pub cuisine_id: Uuid,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(table_name = dishes)]
#[diesel(belongs_to(RestaurantRow, foreign_key = restaurant_id))]
#[diesel(primary_key(id))]
pub struct DishRow {
    pub id: Uuid,
    pub name: String,
    pub city_id: Uuid,
    pub restaurant_id: Uuid,
    pub category_id: Uuid,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = stats)]
#[diesel(primary_key(id))]
pub struct StatsRow {
    pub id: Uuid,
    pub restaurant_id: Option<Uuid>,
    pub dish_id: Option<Uuid>,
    pub score: Option<f64>,
    pub avg_rating: Option<f64>,
    pub total_reviews: Option<i32>,
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        City {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

impl From<CuisineRow> for Cuisine {
    fn from(row: CuisineRow) -> Self {
        Cuisine {
            id: row.id,
            name: row.name,
            slug: row.slug,
            image_url: row.image_url,
        }
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            image_url: row.image_url,
        }
    }
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Restaurant {
            id: row.id,
            name: row.name,
            slug: row.slug,
            city_id: row.city_id,
            cuisine_id: row.cuisine_id,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        Dish {
            id: row.id,
            name: row.name,
            city_id: row.city_id,
            restaurant_id: row.restaurant_id,
            category_id: row.category_id,
            is_active: row.is_active,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

impl From<StatsRow> for Stats {
    fn from(row: StatsRow) -> Self {
        Stats {
            score: row.score,
            avg_rating: row.avg_rating,
            total_reviews: row.total_reviews,
        }
    }
}
