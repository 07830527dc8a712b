pub mod consensus;
pub mod dishes;
pub mod drafts;
pub mod menus;
pub mod sessions;
pub mod tournament;
