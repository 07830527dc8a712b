pub mod candidates;
pub mod consensus;
pub mod draft;
pub mod duels;
pub mod progress;
pub mod session;
pub mod tournament;

#[cfg(test)]
pub(crate) mod fixtures;
