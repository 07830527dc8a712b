pub mod dish;
pub mod duel_vote;
pub mod final_menu;
pub mod store;
pub mod user_menu;
