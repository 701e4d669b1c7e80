use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate;
use crate::error::{PersonalizationError, Result};
use crate::feedback;
use crate::models::{
    ClassSummary, NewPersonalizationRecord, PersonalizationRecord, PlanDelta, PublishUpdate,
    StudentFeedback,
};
use crate::store::PersonalizationStore;

/// Builds personalization records for a unit and moves them through review.
pub struct PersonalizationService<S> {
    store: S,
}

impl<S: PersonalizationStore> PersonalizationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Aggregate the unit's completed attempts into a new unpublished record.
    pub async fn aggregate(
        &self,
        unit_id: Uuid,
        lesson_plan_id: Option<Uuid>,
    ) -> Result<PersonalizationRecord> {
        let unit = self
            .store
            .find_unit(unit_id)
            .await?
            .ok_or_else(|| PersonalizationError::not_found("unit", unit_id))?;

        if let Some(plan_id) = lesson_plan_id {
            match self.store.find_lesson_plan(plan_id).await? {
                Some(plan) if plan.unit_id == unit_id => {}
                _ => return Err(PersonalizationError::not_found("lesson plan", plan_id)),
            }
        }

        info!(unit_id = %unit.id, title = %unit.title, "aggregating class data");

        let attempts = self.store.list_completed_attempts(unit_id).await?;
        let new_record = if attempts.is_empty() {
            warn!(unit_id = %unit.id, "no completed attempts found");
            NewPersonalizationRecord {
                unit_id,
                lesson_plan_id,
                class_summary: ClassSummary::empty(),
                plan_delta: PlanDelta::empty(),
                student_reports: Vec::new(),
            }
        } else {
            let class_summary = aggregate::summarize_class(&attempts);
            let student_reports = aggregate::student_reports(&attempts);
            let plan_delta = aggregate::generate_plan_delta(&class_summary, lesson_plan_id);
            debug!(
                attempts = attempts.len(),
                students = class_summary.total_students,
                overrides = plan_delta.group_overrides().len(),
                "class data aggregated"
            );
            NewPersonalizationRecord {
                unit_id,
                lesson_plan_id,
                class_summary,
                plan_delta,
                student_reports,
            }
        };

        let record = self.store.create_record(&new_record).await?;
        info!(record_id = %record.id, "personalization record created");
        Ok(record)
    }

    /// Mark a record as reviewed and published. A record publishes once;
    /// later calls fail with `AlreadyPublished`.
    pub async fn publish(
        &self,
        record_id: Uuid,
        reviewer: Option<String>,
    ) -> Result<PersonalizationRecord> {
        let record = self
            .store
            .get_record(record_id)
            .await?
            .ok_or_else(|| PersonalizationError::not_found("personalization record", record_id))?;

        if record.is_published {
            return Err(PersonalizationError::AlreadyPublished(record_id));
        }

        let update = PublishUpdate {
            reviewed_by: reviewer,
            published_at: Utc::now().max(record.created_at),
        };

        // Another writer can publish or delete the record between the read
        // and the update; re-read to tell which.
        let Some(published) = self.store.mark_published(record_id, &update).await? else {
            return Err(match self.store.get_record(record_id).await? {
                Some(_) => PersonalizationError::AlreadyPublished(record_id),
                None => PersonalizationError::not_found("personalization record", record_id),
            });
        };

        info!(record_id = %published.id, reviewer = ?published.reviewed_by, "personalization record published");
        Ok(published)
    }

    /// The record downstream consumers should use: the newest published
    /// record, or the newest draft when nothing has been published.
    pub async fn current_record(&self, unit_id: Uuid) -> Result<PersonalizationRecord> {
        let records = self.store.list_records(unit_id).await?;

        let published = records
            .iter()
            .filter(|record| record.is_published)
            .max_by_key(|record| record.published_at);

        published
            .or_else(|| records.first())
            .cloned()
            .ok_or_else(|| PersonalizationError::not_found("personalization record for unit", unit_id))
    }

    pub async fn list_records(&self, unit_id: Uuid) -> Result<Vec<PersonalizationRecord>> {
        Ok(self.store.list_records(unit_id).await?)
    }

    /// Feedback for one student over their completed attempts of a unit.
    pub async fn student_feedback(&self, unit_id: Uuid, student_id: &str) -> Result<StudentFeedback> {
        self.store
            .find_unit(unit_id)
            .await?
            .ok_or_else(|| PersonalizationError::not_found("unit", unit_id))?;
        let student = self
            .store
            .find_student(student_id)
            .await?
            .ok_or_else(|| PersonalizationError::not_found("student", student_id))?;

        info!(unit_id = %unit_id, student_id = %student.student_id, "generating student feedback");
        let attempts = self.store.list_completed_attempts(unit_id).await?;
        Ok(feedback::student_feedback(unit_id, &student.student_id, &attempts))
    }
}
