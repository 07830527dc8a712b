mod course;
mod dish;
mod duel_vote;
mod final_menu;
mod user_menu;

pub use course::Course;
pub use dish::{Dish, ScoredDish};
pub use duel_vote::DuelVote;
pub use final_menu::{FinalMenuRecord, NewFinalMenu};
pub use user_menu::{UserMenu, UserMenuWithDishes};
