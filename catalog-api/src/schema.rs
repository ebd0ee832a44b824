diesel::table! {
    cities (id) {
        id -> Uuid,
        name -> Text,
        slug -> Text,
    }
}

diesel::table! {
    cuisines (id) {
        id -> Uuid,
        name -> Text,
        slug -> Text,
        image_url -> Nullable<Text>,
    }
}

diesel::table! {
    categories (id) {
        id -> Uuid,
        name -> Text,
        slug -> Text,
        image_url -> Nullable<Text>,
    }
}

diesel::table! {
    restaurants (id) {
        id -> Uuid,
        name -> Text,
        slug -> Text,
        city_id -> Uuid,
        cuisine_id -> Uuid,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    dishes (id) {
        id -> Uuid,
        name -> Text,
        city_id -> Uuid,
        restaurant_id -> Uuid,
        category_id -> Uuid,
        is_active -> Bool,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    stats (id) {
        id -> Uuid,
        restaurant_id -> Nullable<Uuid>,
        dish_id -> Nullable<Uuid>,
        score -> Nullable<Float8>,
        avg_rating -> Nullable<Float8>,
        total_reviews -> Nullable<Int4>,
    }
}

diesel::joinable!(restaurants -> cuisines (cuisine_id));
diesel::joinable!(dishes -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(
    cities,
    cuisines,
    categories,
    restaurants,
    dishes,
    stats,
);
