use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::models::{Course, Dish, DuelVote, ScoredDish, UserMenuWithDishes};
use crate::services::duels::DuelId;

pub fn dish(course: Course, n: u128, name: &str) -> Dish {
    Dish {
        id: Uuid::from_u128(n),
        category: course,
        name: name.to_string(),
        subtitle: String::new(),
        ingredients: String::new(),
        preparation: String::new(),
        image_url: format!("https://img.example/{}.jpg", n),
        created_at: NaiveDateTime::default(),
    }
}

pub fn scored(n: u128, score: u8) -> ScoredDish {
    ScoredDish::new(dish(Course::Hoofd, n, &format!("dish-{}", n)), score)
}

pub fn menu(user: &str, starter: &Dish, main: &Dish, dessert: &Dish) -> UserMenuWithDishes {
    UserMenuWithDishes {
        id: Uuid::new_v4(),
        user_name: user.to_string(),
        starter: Some(starter.clone()),
        main: Some(main.clone()),
        dessert: Some(dessert.clone()),
        created_at: NaiveDateTime::default(),
    }
}

pub fn vote(user: &str, course: Course, a: &Dish, b: &Dish, winner: &Dish) -> DuelVote {
    DuelVote {
        user_name: user.to_string(),
        course,
        duel_id: DuelId::new(course, a.id, b.id).into_string(),
        dish_a_id: a.id,
        dish_b_id: b.id,
        winner_id: winner.id,
    }
}
