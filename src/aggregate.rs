use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::{
    AttemptRecord, ClassSummary, GroupOverride, PlanAdjustments, PlanDelta, StudentReport, Tier,
};

pub const HIGH_TIER_THRESHOLD: f64 = 0.85;
pub const MEDIUM_TIER_THRESHOLD: f64 = 0.60;

const LOW_GROUP_ACTION: &str = "increase foundational practice time";
const LOW_GROUP_MINUTES: u32 = 10;
const HIGH_GROUP_ACTION: &str = "add challenge problems";
const HIGH_GROUP_MINUTES: u32 = 5;

pub fn summarize_class(attempts: &[AttemptRecord]) -> ClassSummary {
    if attempts.is_empty() {
        return ClassSummary::empty();
    }

    let total_students = attempts
        .iter()
        .map(|attempt| attempt.student.id)
        .collect::<HashSet<Uuid>>()
        .len();

    let mut correct_answers = 0usize;
    let mut total_answers = 0usize;
    let mut total_time = 0.0f64;

    for answer in attempts.iter().flat_map(|attempt| attempt.answers.iter()) {
        total_answers += 1;
        if answer.is_correct {
            correct_answers += 1;
        }
        total_time += answer.time_spent_sec;
    }

    ClassSummary {
        total_students,
        accuracy_avg: Some(round2(ratio(correct_answers as f64, total_answers))),
        time_avg_sec: Some(round2(ratio(total_time, total_answers))),
        total_answers: Some(total_answers),
    }
}

/// One report per distinct student, in order of first appearance. A student
/// with several completed attempts is scored across all of them.
pub fn student_reports(attempts: &[AttemptRecord]) -> Vec<StudentReport> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut tallies: HashMap<Uuid, (&str, &str, usize, usize)> = HashMap::new();

    for attempt in attempts {
        let student = &attempt.student;
        let entry = tallies.entry(student.id).or_insert_with(|| {
            order.push(student.id);
            (student.student_id.as_str(), student.name.as_str(), 0, 0)
        });

        for answer in &attempt.answers {
            entry.3 += 1;
            if answer.is_correct {
                entry.2 += 1;
            }
        }
    }

    order
        .iter()
        .filter_map(|id| tallies.get(id))
        .map(|(student_id, name, correct, total)| {
            let accuracy = ratio(*correct as f64, *total);
            StudentReport {
                student_id: student_id.to_string(),
                name: name.to_string(),
                accuracy: round2(accuracy),
                tier: classify_accuracy(accuracy),
            }
        })
        .collect()
}

/// Callers must pass the unrounded accuracy.
pub fn classify_accuracy(accuracy: f64) -> Tier {
    if accuracy >= HIGH_TIER_THRESHOLD {
        Tier::High
    } else if accuracy >= MEDIUM_TIER_THRESHOLD {
        Tier::Medium
    } else {
        Tier::Low
    }
}

/// Rule-based adjustments driven by the rounded class accuracy. The baseline
/// plan is carried on the record but does not influence the rules yet.
pub fn generate_plan_delta(summary: &ClassSummary, _lesson_plan_id: Option<Uuid>) -> PlanDelta {
    let accuracy_avg = summary.accuracy_avg.unwrap_or(0.0);
    let mut adjustments = PlanAdjustments::default();

    if accuracy_avg < MEDIUM_TIER_THRESHOLD {
        adjustments.group_overrides.push(GroupOverride {
            group: Tier::Low,
            action: LOW_GROUP_ACTION.to_string(),
            minutes: LOW_GROUP_MINUTES,
        });
    } else if accuracy_avg > HIGH_TIER_THRESHOLD {
        adjustments.group_overrides.push(GroupOverride {
            group: Tier::High,
            action: HIGH_GROUP_ACTION.to_string(),
            minutes: HIGH_GROUP_MINUTES,
        });
    }

    PlanDelta::Adjustments(adjustments)
}

/// Two-decimal rounding of the exact binary value, ties to even. Scaling by
/// 100 first would round twice (119/200 would come out as 0.60).
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

fn ratio(numerator: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        numerator / count as f64
    }
}
