use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Unit {
    pub id: Uuid,
    pub title: String,
    pub difficulty: String,
    pub duration_min: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LessonPlan {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub version: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UnitOverview {
    pub unit: Unit,
    pub completed_attempts: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRef {
    pub id: Uuid,
    pub student_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub is_correct: bool,
    pub time_spent_sec: f64,
    pub question_order: i32,
}

#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub student: StudentRef,
    pub is_completed: bool,
    pub answers: Vec<AnswerRecord>,
}

/// Class-wide answer statistics. The summary of a unit without completed
/// attempts carries only `total_students`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub total_students: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_avg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_avg_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_answers: Option<usize>,
}

impl ClassSummary {
    pub fn empty() -> Self {
        Self {
            total_students: 0,
            accuracy_avg: None,
            time_avg_sec: None,
            total_answers: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_students == 0 && self.total_answers.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentReport {
    pub student_id: String,
    pub name: String,
    pub accuracy: f64,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOverride {
    pub group: Tier,
    pub action: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanAdjustments {
    pub group_overrides: Vec<GroupOverride>,
    pub additional_activities: Vec<serde_json::Value>,
    pub time_adjustments: BTreeMap<String, i32>,
}

/// The `{}` document; any key in it is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyDelta {}

/// Adjustments against the baseline lesson plan. `Empty` is stored as `{}`
/// for units that had no completed attempts when aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanDelta {
    Adjustments(PlanAdjustments),
    Empty(EmptyDelta),
}

impl PlanDelta {
    pub fn empty() -> Self {
        PlanDelta::Empty(EmptyDelta {})
    }

    pub fn group_overrides(&self) -> &[GroupOverride] {
        match self {
            PlanDelta::Adjustments(adjustments) => &adjustments.group_overrides,
            PlanDelta::Empty(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationRecord {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub lesson_plan_id: Option<Uuid>,
    pub class_summary: ClassSummary,
    pub plan_delta: PlanDelta,
    pub student_reports: Vec<StudentReport>,
    pub is_published: bool,
    pub reviewed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Fields of a record before the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPersonalizationRecord {
    pub unit_id: Uuid,
    pub lesson_plan_id: Option<Uuid>,
    pub class_summary: ClassSummary,
    pub plan_delta: PlanDelta,
    pub student_reports: Vec<StudentReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishUpdate {
    pub reviewed_by: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub qid: String,
    pub correct: u8,
    pub time_sec: f64,
}

/// Per-student feedback over the completed attempts of one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentFeedback {
    pub student_id: String,
    pub unit_id: Uuid,
    pub summary: FeedbackSummary,
    pub items: Vec<FeedbackItem>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TierSummary {
    pub tier: Tier,
    pub count: usize,
    pub avg_accuracy: f64,
}
