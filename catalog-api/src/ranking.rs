//! Ordering of restaurant and dish listings.
//!
//! Restaurants sort by score, newest first on ties. Dishes sort by score,
//! then average rating, then newest first, and receive a dense 1-based rank
//! after sorting. Missing stats count as zero throughout.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{DishDetail, RestaurantDetail, RestaurantDish, Stats};

/// An entity that can be placed in a ranked listing.
pub trait Rankable {
    fn stats(&self) -> Option<&Stats>;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Rankable for RestaurantDetail {
    fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.restaurant.created_at
    }
}

impl Rankable for DishDetail {
    fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.dish.created_at
    }
}

impl Rankable for RestaurantDish {
    fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.dish.created_at
    }
}

/// A listing entry with its position attached.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Ranked<T> {
    #[serde(flatten)]
    pub item: T,
    pub rank: usize,
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Score descending, then `created_at` descending.
pub fn restaurant_order<T: Rankable>(a: &T, b: &T) -> Ordering {
    descending(Stats::score_of(a.stats()), Stats::score_of(b.stats()))
        .then_with(|| b.created_at().cmp(&a.created_at()))
}

/// Score descending, then average rating descending, then `created_at` descending.
pub fn dish_order<T: Rankable>(a: &T, b: &T) -> Ordering {
    descending(Stats::score_of(a.stats()), Stats::score_of(b.stats()))
        .then_with(|| {
            descending(
                Stats::avg_rating_of(a.stats()),
                Stats::avg_rating_of(b.stats()),
            )
        })
        .then_with(|| b.created_at().cmp(&a.created_at()))
}

pub fn sort_restaurants<T: Rankable>(items: &mut [T]) {
    items.sort_by(restaurant_order);
}

pub fn sort_dishes<T: Rankable>(items: &mut [T]) {
    items.sort_by(dish_order);
}

/// Sorts `items` with `compare` and numbers them 1..=N in the resulting order.
pub fn rank_by<T, F>(mut items: Vec<T>, compare: F) -> Vec<Ranked<T>>
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.sort_by(compare);
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| Ranked {
            item,
            rank: index + 1,
        })
        .collect()
}

pub fn rank_dishes<T: Rankable>(items: Vec<T>) -> Vec<Ranked<T>> {
    rank_by(items, dish_order)
}
