//! Storage seam consumed by the personalization service.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    AttemptRecord, LessonPlan, NewPersonalizationRecord, PersonalizationRecord, PublishUpdate,
    StudentRef, Unit,
};

#[async_trait]
pub trait PersonalizationStore: Send + Sync {
    async fn find_unit(&self, unit_id: Uuid) -> Result<Option<Unit>, StoreError>;

    async fn find_lesson_plan(&self, plan_id: Uuid) -> Result<Option<LessonPlan>, StoreError>;

    /// Looks a student up by their student number.
    async fn find_student(&self, student_id: &str) -> Result<Option<StudentRef>, StoreError>;

    /// Completed attempts for a unit, each with its answers ordered by question.
    async fn list_completed_attempts(
        &self,
        unit_id: Uuid,
    ) -> Result<Vec<AttemptRecord>, StoreError>;

    /// Persist a new record; the store assigns `id` and `created_at`.
    async fn create_record(
        &self,
        record: &NewPersonalizationRecord,
    ) -> Result<PersonalizationRecord, StoreError>;

    async fn get_record(&self, id: Uuid) -> Result<Option<PersonalizationRecord>, StoreError>;

    /// Publish only if the record is still unpublished. Returns `None` when
    /// the record is missing or was already published.
    async fn mark_published(
        &self,
        id: Uuid,
        update: &PublishUpdate,
    ) -> Result<Option<PersonalizationRecord>, StoreError>;

    /// Records for a unit, newest first.
    async fn list_records(&self, unit_id: Uuid) -> Result<Vec<PersonalizationRecord>, StoreError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_object_safe() {
        fn _takes_boxed(_: Box<dyn PersonalizationStore>) {}
    }
}
