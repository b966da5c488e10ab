use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The caller identity did not match any artist record.
    #[error("No artist registered for identity {external_id}")]
    ArtistNotFound { external_id: String },

    #[error("Print {print_id} is already a member of gallery {gallery_id}")]
    DuplicateMember { gallery_id: DbId, print_id: DbId },

    #[error("Print {print_id} does not belong to gallery {gallery_id}")]
    MemberNotInParent { gallery_id: DbId, print_id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
