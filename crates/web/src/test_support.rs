use chrono::{Duration, NaiveDateTime};
use storage::dto::menu::SubmitMenuRequest;
use storage::models::{Course, Dish};
use uuid::Uuid;

/// A dish whose id and age follow `n`; higher numbers are newer
pub fn dish(course: Course, n: u128, name: &str) -> Dish {
    Dish {
        id: Uuid::from_u128(n),
        category: course,
        name: name.to_string(),
        subtitle: String::new(),
        ingredients: String::new(),
        preparation: String::new(),
        image_url: String::new(),
        created_at: NaiveDateTime::default() + Duration::minutes(n as i64),
    }
}

pub fn submission(user_name: &str, starter: u128, main: u128, dessert: u128) -> SubmitMenuRequest {
    SubmitMenuRequest {
        user_name: user_name.to_string(),
        starter_id: Uuid::from_u128(starter),
        main_id: Uuid::from_u128(main),
        dessert_id: Uuid::from_u128(dessert),
    }
}
