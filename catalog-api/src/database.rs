use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::{
    pooled_connection::{
        deadpool::{Object, Pool},
        AsyncDieselConnectionManager,
    },
    AsyncPgConnection, RunQueryDsl,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{
    Category, CategorySummary, City, Cuisine, DishCategoryImage, DishDetail, DishCount,
    DishRestaurant, Restaurant, RestaurantCuisineImage, RestaurantDetail, RestaurantDish, Stats,
};
use crate::error::CatalogError;
use crate::models::*;
use crate::repository::{CatalogRepository, DishFilter, RestaurantFilter};
use crate::schema::*;

diesel::define_sql_function! {
    #[sql_name = "lower"]
    fn text_lower(x: Text) -> Text;
}

#[derive(Clone)]
pub struct DatabaseManager {
    pool: Pool<AsyncPgConnection>,
}

impl DatabaseManager {
    pub fn new(database_url: &str, max_connections: usize) -> Result<Self, CatalogError> {
        let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder(config)
            .max_size(max_connections)
            .build()
            .map_err(|e| CatalogError::ConfigError {
                message: format!("Failed to create database pool: {}", e),
            })?;

        info!("Database pool created (max {} connections)", max_connections);

        Ok(Self { pool })
    }

    async fn connection(&self) -> Result<Object<AsyncPgConnection>, CatalogError> {
        self.pool
            .get()
            .await
            .map_err(|e| CatalogError::DatabaseError {
                message: format!("Failed to get database connection: {}", e),
            })
    }
}

#[async_trait]
impl CatalogRepository for DatabaseManager {
    async fn find_city_by_slug(&self, slug: &str) -> Result<Option<City>, CatalogError> {
        let mut conn = self.connection().await?;

        let city = cities::table
            .filter(cities::slug.eq(slug))
            .select(CityRow::as_select())
            .first::<CityRow>(&mut conn)
            .await
            .optional()?;

        Ok(city.map(City::from))
    }

    async fn list_cities(&self) -> Result<Vec<City>, CatalogError> {
        let mut conn = self.connection().await?;

        let rows = cities::table
            .order(cities::name.asc())
            .select(CityRow::as_select())
            .load::<CityRow>(&mut conn)
            .await?;

        Ok(rows.into_iter().map(City::from).collect())
    }

    async fn find_category(&self, token: &str) -> Result<Option<Category>, CatalogError> {
        let mut conn = self.connection().await?;

        let category = category_lookup(token)
            .select(CategoryRow::as_select())
            .first::<CategoryRow>(&mut conn)
            .await
            .optional()?;

        Ok(category.map(Category::from))
    }

    async fn find_cuisine(&self, token: &str) -> Result<Option<Cuisine>, CatalogError> {
        let mut conn = self.connection().await?;

        let cuisine = cuisine_lookup(token)
            .select(CuisineRow::as_select())
            .first::<CuisineRow>(&mut conn)
            .await
            .optional()?;

        Ok(cuisine.map(Cuisine::from))
    }

    async fn find_restaurant(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Option<Restaurant>, CatalogError> {
        let mut conn = self.connection().await?;

        let restaurant = restaurants::table
            .filter(restaurants::id.eq(restaurant_id))
            .select(RestaurantRow::as_select())
            .first::<RestaurantRow>(&mut conn)
            .await
            .optional()?;

        Ok(restaurant.map(Restaurant::from))
    }

    async fn restaurants(
        &self,
        filter: RestaurantFilter,
    ) -> Result<Vec<RestaurantDetail>, CatalogError> {
        let mut conn = self.connection().await?;

        let rows = match filter.cuisine_id {
            Some(cuisine_id) => {
                restaurants::table
                    .filter(restaurants::city_id.eq(filter.city_id))
                    .filter(restaurants::cuisine_id.eq(cuisine_id))
                    .order(restaurants::created_at.desc())
                    .select(RestaurantRow::as_select())
                    .load::<RestaurantRow>(&mut conn)
                    .await?
            }
            None => {
                restaurants::table
                    .filter(restaurants::city_id.eq(filter.city_id))
                    .order(restaurants::created_at.desc())
                    .select(RestaurantRow::as_select())
                    .load::<RestaurantRow>(&mut conn)
                    .await?
            }
        };

        debug!("Loaded {} restaurants for city {}", rows.len(), filter.city_id);

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let restaurant_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let cities = load_cities(&mut conn, &unique(rows.iter().map(|r| r.city_id))).await?;
        let cuisines = load_cuisines(&mut conn, &unique(rows.iter().map(|r| r.cuisine_id))).await?;
        let stats = load_restaurant_stats(&mut conn, &restaurant_ids).await?;
        let counts = load_dish_counts(&mut conn, &restaurant_ids).await?;

        let dishes: Vec<Option<Vec<RestaurantDish>>> = if filter.with_dishes {
            load_restaurant_dishes(&mut conn, &rows)
                .await?
                .into_iter()
                .map(Some)
                .collect()
        } else {
            vec![None; rows.len()]
        };

        rows.into_iter()
            .zip(dishes)
            .map(|(row, dishes)| -> Result<RestaurantDetail, CatalogError> {
                let city = lookup(&cities, row.city_id, "city")?;
                let cuisine = lookup(&cuisines, row.cuisine_id, "cuisine")?;
                let stats = stats.get(&row.id).cloned();
                let count = DishCount {
                    dishes: counts.get(&row.id).copied().unwrap_or(0),
                };

                Ok(RestaurantDetail {
                    restaurant: row.into(),
                    city,
                    cuisine,
                    stats,
                    dishes,
                    count,
                })
            })
            .collect()
    }

    async fn active_dishes(&self, filter: DishFilter) -> Result<Vec<DishDetail>, CatalogError> {
        let mut conn = self.connection().await?;

        let mut query: dishes::BoxedQuery<'_, Pg> =
            dishes::table.filter(dishes::is_active.eq(true)).into_boxed();
        if let Some(city_id) = filter.city_id {
            query = query.filter(dishes::city_id.eq(city_id));
        }
        if let Some(restaurant_id) = filter.restaurant_id {
            query = query.filter(dishes::restaurant_id.eq(restaurant_id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(dishes::category_id.eq(category_id));
        }

        let rows = query
            .order(dishes::created_at.desc())
            .load::<DishRow>(&mut conn)
            .await?;

        debug!("Loaded {} active dishes for {:?}", rows.len(), filter);

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let restaurants =
            load_restaurants(&mut conn, &unique(rows.iter().map(|d| d.restaurant_id))).await?;
        let cuisines =
            load_cuisines(&mut conn, &unique(restaurants.values().map(|r| r.cuisine_id))).await?;
        let cities =
            load_cities(&mut conn, &unique(restaurants.values().map(|r| r.city_id))).await?;
        let categories =
            load_categories(&mut conn, &unique(rows.iter().map(|d| d.category_id))).await?;
        let dish_ids: Vec<Uuid> = rows.iter().map(|d| d.id).collect();
        let stats = load_dish_stats(&mut conn, &dish_ids).await?;

        rows.into_iter()
            .map(|row| -> Result<DishDetail, CatalogError> {
                let owner = restaurants.get(&row.restaurant_id).ok_or_else(|| {
                    missing_relation("restaurant", row.restaurant_id)
                })?;
                let restaurant = DishRestaurant {
                    id: owner.id,
                    name: owner.name.clone(),
                    slug: owner.slug.clone(),
                    cuisine: lookup(&cuisines, owner.cuisine_id, "cuisine")?,
                    city: lookup(&cities, owner.city_id, "city")?,
                };
                let category = lookup(&categories, row.category_id, "category")?;
                let stats = stats.get(&row.id).cloned();

                Ok(DishDetail {
                    dish: row.into(),
                    restaurant,
                    category: CategorySummary::from(&category),
                    stats,
                })
            })
            .collect()
    }

    async fn dish_category_images(
        &self,
        city_id: Uuid,
    ) -> Result<Vec<DishCategoryImage>, CatalogError> {
        let mut conn = self.connection().await?;

        let rows = dishes::table
            .inner_join(categories::table)
            .filter(dishes::city_id.eq(city_id))
            .filter(dishes::is_active.eq(true))
            .filter(dishes::image_url.is_not_null())
            .order(dishes::created_at.desc())
            .select((CategoryRow::as_select(), dishes::image_url))
            .load::<(CategoryRow, Option<String>)>(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(category, dish_image)| DishCategoryImage {
                category: category.into(),
                dish_image,
            })
            .collect())
    }

    async fn restaurant_cuisine_images(
        &self,
        city_id: Uuid,
    ) -> Result<Vec<RestaurantCuisineImage>, CatalogError> {
        let mut conn = self.connection().await?;

        let rows = restaurants::table
            .inner_join(cuisines::table)
            .filter(restaurants::city_id.eq(city_id))
            .select((CuisineRow::as_select(), restaurants::image_url))
            .load::<(CuisineRow, Option<String>)>(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(cuisine, restaurant_image)| RestaurantCuisineImage {
                cuisine: cuisine.into(),
                restaurant_image,
            })
            .collect())
    }

    async fn health_check(&self) -> Result<(), CatalogError> {
        let mut conn = self.connection().await?;

        diesel::sql_query("SELECT 1").execute(&mut conn).await?;

        Ok(())
    }
}

/// Slug equal to the lower-cased token, or name equal to it ignoring case.
fn category_lookup(token: &str) -> categories::BoxedQuery<'static, Pg> {
    let lowered = token.to_lowercase();
    categories::table
        .filter(
            categories::slug
                .eq(lowered.clone())
                .or(text_lower(categories::name).eq(lowered)),
        )
        .into_boxed()
}

fn cuisine_lookup(token: &str) -> cuisines::BoxedQuery<'static, Pg> {
    let lowered = token.to_lowercase();
    cuisines::table
        .filter(
            cuisines::slug
                .eq(lowered.clone())
                .or(text_lower(cuisines::name).eq(lowered)),
        )
        .into_boxed()
}

fn unique(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

fn missing_relation(kind: &str, id: Uuid) -> CatalogError {
    CatalogError::InternalError {
        message: format!("Dangling reference to {} {}", kind, id),
    }
}

fn lookup<T: Clone>(map: &HashMap<Uuid, T>, id: Uuid, kind: &str) -> Result<T, CatalogError> {
    map.get(&id).cloned().ok_or_else(|| missing_relation(kind, id))
}

async fn load_cities(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, City>, CatalogError> {
    let rows = cities::table
        .filter(cities::id.eq_any(ids))
        .select(CityRow::as_select())
        .load::<CityRow>(conn)
        .await?;

    Ok(rows.into_iter().map(|row| (row.id, row.into())).collect())
}

async fn load_cuisines(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, Cuisine>, CatalogError> {
    let rows = cuisines::table
        .filter(cuisines::id.eq_any(ids))
        .select(CuisineRow::as_select())
        .load::<CuisineRow>(conn)
        .await?;

    Ok(rows.into_iter().map(|row| (row.id, row.into())).collect())
}

async fn load_categories(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, Category>, CatalogError> {
    let rows = categories::table
        .filter(categories::id.eq_any(ids))
        .select(CategoryRow::as_select())
        .load::<CategoryRow>(conn)
        .await?;

    Ok(rows.into_iter().map(|row| (row.id, row.into())).collect())
}

async fn load_restaurants(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, RestaurantRow>, CatalogError> {
    let rows = restaurants::table
        .filter(restaurants::id.eq_any(ids))
        .select(RestaurantRow::as_select())
        .load::<RestaurantRow>(conn)
        .await?;

    Ok(rows.into_iter().map(|row| (row.id, row)).collect())
}

async fn load_restaurant_stats(
    conn: &mut AsyncPgConnection,
    restaurant_ids: &[Uuid],
) -> Result<HashMap<Uuid, Stats>, CatalogError> {
    let rows = stats::table
        .filter(stats::restaurant_id.eq_any(restaurant_ids))
        .select(StatsRow::as_select())
        .load::<StatsRow>(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let owner = row.restaurant_id?;
            Some((owner, Stats::from(row)))
        })
        .collect())
}

async fn load_dish_stats(
    conn: &mut AsyncPgConnection,
    dish_ids: &[Uuid],
) -> Result<HashMap<Uuid, Stats>, CatalogError> {
    let rows = stats::table
        .filter(stats::dish_id.eq_any(dish_ids))
        .select(StatsRow::as_select())
        .load::<StatsRow>(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let owner = row.dish_id?;
            Some((owner, Stats::from(row)))
        })
        .collect())
}

// Counts every dish of the restaurant, active or not.
async fn load_dish_counts(
    conn: &mut AsyncPgConnection,
    restaurant_ids: &[Uuid],
) -> Result<HashMap<Uuid, i64>, CatalogError> {
    let rows = dishes::table
        .filter(dishes::restaurant_id.eq_any(restaurant_ids))
        .group_by(dishes::restaurant_id)
        .select((dishes::restaurant_id, diesel::dsl::count_star()))
        .load::<(Uuid, i64)>(conn)
        .await?;

    Ok(rows.into_iter().collect())
}

/// Active dishes of each restaurant, aligned with `parents`.
async fn load_restaurant_dishes(
    conn: &mut AsyncPgConnection,
    parents: &[RestaurantRow],
) -> Result<Vec<Vec<RestaurantDish>>, CatalogError> {
    let rows = DishRow::belonging_to(parents)
        .filter(dishes::is_active.eq(true))
        .order(dishes::created_at.desc())
        .select(DishRow::as_select())
        .load::<DishRow>(conn)
        .await?;

    let categories = load_categories(conn, &unique(rows.iter().map(|d| d.category_id))).await?;
    let dish_ids: Vec<Uuid> = rows.iter().map(|d| d.id).collect();
    let stats = load_dish_stats(conn, &dish_ids).await?;

    rows.grouped_by(parents)
        .into_iter()
        .map(|group| {
            group
                .into_iter()
                .map(|row| -> Result<RestaurantDish, CatalogError> {
                    let category = lookup(&categories, row.category_id, "category")?;
                    let stats = stats.get(&row.id).cloned();

                    Ok(RestaurantDish {
                        dish: row.into(),
                        category,
                        stats,
                    })
                })
                .collect::<Result<Vec<_>, CatalogError>>()
        })
        .collect()
}
