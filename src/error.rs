use thiserror::Error;
use uuid::Uuid;

/// Failures raised by a storage backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("malformed {column} document: {source}")]
    Document {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("attempt key {source_key} already belongs to unit {unit_id}, student {student_uuid}")]
    AttemptKeyConflict {
        source_key: String,
        unit_id: Uuid,
        student_uuid: Uuid,
    },
}

/// Errors surfaced by aggregation and publishing.
#[derive(Error, Debug)]
pub enum PersonalizationError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("personalization record {0} is already published")]
    AlreadyPublished(Uuid),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl PersonalizationError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type Result<T, E = PersonalizationError> = std::result::Result<T, E>;
