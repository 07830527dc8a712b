pub mod consensus;
pub mod dish;
pub mod draft;
pub mod menu;
pub mod session;
pub mod tournament;

/// Rejects names that are empty once surrounding whitespace is removed
pub(crate) fn validate_user_name(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().is_empty() {
        return Err(validator::ValidationError::new("blank_user_name"));
    }
    Ok(())
}
