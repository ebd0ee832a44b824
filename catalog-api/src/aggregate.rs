use std::collections::HashSet;

use crate::catalog::{
    CategoryTile, CuisineSummary, CuisineTile, DishCategoryImage, RestaurantCuisineImage, Stats,
};
use crate::ranking::Rankable;

/// Count, review total and mean score over a cuisine's restaurants.
pub fn summarize<T: Rankable>(restaurants: &[T]) -> CuisineSummary {
    let total_reviews = restaurants
        .iter()
        .map(|r| Stats::total_reviews_of(r.stats()))
        .sum();

    let avg_score = if restaurants.is_empty() {
        0.0
    } else {
        let total: f64 = restaurants.iter().map(|r| Stats::score_of(r.stats())).sum();
        total / restaurants.len() as f64
    };

    CuisineSummary {
        restaurant_count: restaurants.len(),
        total_reviews,
        avg_score,
    }
}

/// First-seen category tiles, in scan order.
pub fn distinct_categories(rows: Vec<DishCategoryImage>) -> Vec<CategoryTile> {
    let mut seen = HashSet::new();
    let mut tiles = Vec::new();

    for row in rows {
        if !seen.insert(row.category.id) {
            continue;
        }

        let image = pick_image(row.category.image_url, row.dish_image);
        tiles.push(CategoryTile {
            id: row.category.id,
            name: row.category.name,
            image,
        });
    }

    tiles
}

/// First-seen cuisine tiles, in scan order.
pub fn distinct_cuisines(rows: Vec<RestaurantCuisineImage>) -> Vec<CuisineTile> {
    let mut seen = HashSet::new();
    let mut tiles = Vec::new();

    for row in rows {
        if !seen.insert(row.cuisine.id) {
            continue;
        }

        let image = pick_image(row.cuisine.image_url, row.restaurant_image);
        tiles.push(CuisineTile {
            id: row.cuisine.id,
            name: row.cuisine.name,
            slug: row.cuisine.slug,
            image,
        });
    }

    tiles
}

// An empty string counts as unset, same as null.
fn pick_image(own: Option<String>, fallback: Option<String>) -> String {
    own.filter(|url| !url.is_empty())
        .or(fallback.filter(|url| !url.is_empty()))
        .unwrap_or_default()
}
