use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<sea_orm::DbErr> for ModelError {
    fn from(e: sea_orm::DbErr) -> Self { ModelError::Db(e.to_string()) }
}

/// Length check on the trimmed value, counted in characters.
pub(crate) fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), ModelError> {
    let n = value.trim().chars().count();
    if n < min || n > max {
        return Err(ModelError::Validation(format!("{field} length must be between {min} and {max}")));
    }
    Ok(())
}
