use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The human-readable message without the variant prefix.
    ///
    /// Redirect-based flows carry this text in a query parameter, so it must
    /// be the plain message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::NotFound { entity, id } => {
                format!("{entity} con id {id} no existe")
            }
            CoreError::Validation(msg)
            | CoreError::Conflict(msg)
            | CoreError::Unauthorized(msg)
            | CoreError::Forbidden(msg)
            | CoreError::Internal(msg) => msg.clone(),
        }
    }
}
