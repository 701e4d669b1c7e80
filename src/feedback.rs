use uuid::Uuid;

use crate::aggregate::round2;
use crate::models::{AttemptRecord, FeedbackItem, FeedbackSummary, StudentFeedback};

pub const EXCELLENT_THRESHOLD: f64 = 0.9;
pub const SOLID_THRESHOLD: f64 = 0.7;

const NO_ATTEMPTS: &str = "No completed attempts yet.";
const EXCELLENT: &str = "Excellent work: try harder challenge problems next.";
const SOLID: &str = "Solid foundation: review the questions you missed.";
const NEEDS_PRACTICE: &str =
    "Strengthen the fundamentals: revisit the related concepts and practice again.";

/// Feedback for one student, pooled over every completed attempt of theirs
/// in `attempts`. Attempts of other students are ignored.
pub fn student_feedback(
    unit_id: Uuid,
    student_id: &str,
    attempts: &[AttemptRecord],
) -> StudentFeedback {
    let own: Vec<&AttemptRecord> = attempts
        .iter()
        .filter(|attempt| attempt.is_completed && attempt.student.student_id == student_id)
        .collect();

    if own.is_empty() {
        return StudentFeedback {
            student_id: student_id.to_string(),
            unit_id,
            summary: FeedbackSummary {
                total: 0,
                correct: 0,
                accuracy: 0.0,
            },
            items: Vec::new(),
            recommendations: vec![NO_ATTEMPTS.to_string()],
        };
    }

    let items: Vec<FeedbackItem> = own
        .iter()
        .flat_map(|attempt| attempt.answers.iter())
        .map(|answer| FeedbackItem {
            qid: format!("Q{}", answer.question_order),
            correct: u8::from(answer.is_correct),
            time_sec: answer.time_spent_sec,
        })
        .collect();

    let total = items.len();
    let correct = items.iter().filter(|item| item.correct == 1).count();
    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };

    StudentFeedback {
        student_id: student_id.to_string(),
        unit_id,
        summary: FeedbackSummary {
            total,
            correct,
            accuracy: round2(accuracy),
        },
        items,
        recommendations: recommendations(accuracy),
    }
}

/// Takes the unrounded accuracy.
pub fn recommendations(accuracy: f64) -> Vec<String> {
    let advice = if accuracy >= EXCELLENT_THRESHOLD {
        EXCELLENT
    } else if accuracy >= SOLID_THRESHOLD {
        SOLID
    } else {
        NEEDS_PRACTICE
    };
    vec![advice.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerRecord, StudentRef};

    fn student(student_id: &str, name: &str) -> StudentRef {
        StudentRef {
            id: Uuid::new_v4(),
            student_id: student_id.to_string(),
            name: name.to_string(),
        }
    }

    fn attempt(student: &StudentRef, answers: &[(i32, bool, f64)], completed: bool) -> AttemptRecord {
        AttemptRecord {
            id: Uuid::new_v4(),
            unit_id: Uuid::nil(),
            student: student.clone(),
            is_completed: completed,
            answers: answers
                .iter()
                .map(|(question_order, is_correct, time_spent_sec)| AnswerRecord {
                    is_correct: *is_correct,
                    time_spent_sec: *time_spent_sec,
                    question_order: *question_order,
                })
                .collect(),
        }
    }

    #[test]
    fn pools_completed_attempts_of_one_student() {
        let avery = student("GS-2026-014", "Avery Lee");
        let jules = student("GS-2025-102", "Jules Moreno");
        let attempts = vec![
            attempt(&avery, &[(1, true, 9.5), (2, false, 14.0)], true),
            attempt(&jules, &[(1, false, 30.0)], true),
            attempt(&avery, &[(1, true, 7.0), (2, true, 8.25)], true),
            attempt(&avery, &[(3, false, 40.0)], false),
        ];

        let feedback = student_feedback(Uuid::nil(), "GS-2026-014", &attempts);
        assert_eq!(feedback.summary.total, 4);
        assert_eq!(feedback.summary.correct, 3);
        assert_eq!(feedback.summary.accuracy, 0.75);
        assert_eq!(
            feedback.items,
            vec![
                FeedbackItem { qid: "Q1".to_string(), correct: 1, time_sec: 9.5 },
                FeedbackItem { qid: "Q2".to_string(), correct: 0, time_sec: 14.0 },
                FeedbackItem { qid: "Q1".to_string(), correct: 1, time_sec: 7.0 },
                FeedbackItem { qid: "Q2".to_string(), correct: 1, time_sec: 8.25 },
            ]
        );
        assert_eq!(feedback.recommendations, vec![SOLID.to_string()]);
    }

    #[test]
    fn student_without_attempts_gets_fallback() {
        let avery = student("GS-2026-014", "Avery Lee");
        let attempts = vec![attempt(&avery, &[(1, true, 5.0)], true)];

        let feedback = student_feedback(Uuid::nil(), "GS-2026-037", &attempts);
        assert_eq!(feedback.student_id, "GS-2026-037");
        assert_eq!(feedback.summary.total, 0);
        assert_eq!(feedback.summary.accuracy, 0.0);
        assert!(feedback.items.is_empty());
        assert_eq!(feedback.recommendations, vec![NO_ATTEMPTS.to_string()]);
    }

    #[test]
    fn recommendation_thresholds() {
        assert_eq!(recommendations(1.0), vec![EXCELLENT.to_string()]);
        assert_eq!(recommendations(0.9), vec![EXCELLENT.to_string()]);
        assert_eq!(recommendations(0.899), vec![SOLID.to_string()]);
        assert_eq!(recommendations(0.7), vec![SOLID.to_string()]);
        assert_eq!(recommendations(0.699), vec![NEEDS_PRACTICE.to_string()]);
        assert_eq!(recommendations(0.0), vec![NEEDS_PRACTICE.to_string()]);
    }

    #[test]
    fn completed_attempt_without_answers_needs_practice() {
        let kiara = student("GS-2026-037", "Kiara Patel");
        let feedback = student_feedback(Uuid::nil(), "GS-2026-037", &[attempt(&kiara, &[], true)]);

        assert_eq!(feedback.summary.total, 0);
        assert_eq!(feedback.recommendations, vec![NEEDS_PRACTICE.to_string()]);
    }

    #[test]
    fn feedback_serializes_with_item_shape() {
        let avery = student("GS-2026-014", "Avery Lee");
        let feedback =
            student_feedback(Uuid::nil(), "GS-2026-014", &[attempt(&avery, &[(3, true, 12.0)], true)]);

        let value = serde_json::to_value(&feedback).unwrap();
        assert_eq!(value["summary"]["total"], 1);
        assert_eq!(value["items"][0]["qid"], "Q3");
        assert_eq!(value["items"][0]["correct"], 1);
        assert_eq!(value["recommendations"][0], EXCELLENT);
    }
}
