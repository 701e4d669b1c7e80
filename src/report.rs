use std::fmt::Write;

use crate::models::{PersonalizationRecord, StudentReport, Tier, TierSummary, Unit, UnitOverview};

/// One line of the `units` listing.
pub fn unit_line(overview: &UnitOverview) -> String {
    format!(
        "- {} {} ({}, {} min) created {}, {} completed attempts",
        overview.unit.id,
        overview.unit.title,
        overview.unit.difficulty,
        overview.unit.duration_min,
        overview.unit.created_at.format("%Y-%m-%d"),
        overview.completed_attempts
    )
}

pub fn summarize_by_tier(reports: &[StudentReport]) -> Vec<TierSummary> {
    let mut map: std::collections::BTreeMap<Tier, (usize, f64)> =
        std::collections::BTreeMap::new();

    for report in reports {
        let entry = map.entry(report.tier).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += report.accuracy;
    }

    // Highest tier first.
    map.into_iter()
        .rev()
        .map(|(tier, (count, total_accuracy))| TierSummary {
            tier,
            count,
            avg_accuracy: if count == 0 {
                0.0
            } else {
                total_accuracy / count as f64
            },
        })
        .collect()
}

pub fn build_report(unit: &Unit, record: &PersonalizationRecord) -> String {
    let mut output = String::new();
    let summary = &record.class_summary;

    let _ = writeln!(output, "# Class Personalization Report");
    let _ = writeln!(
        output,
        "Generated for {} ({}, {} min, created {}) from record {}",
        unit.title,
        unit.difficulty,
        unit.duration_min,
        unit.created_at.format("%Y-%m-%d"),
        record.id
    );
    match (record.is_published, record.published_at) {
        (true, Some(published_at)) => {
            let _ = writeln!(
                output,
                "Published {} by {}",
                published_at.format("%Y-%m-%d %H:%M UTC"),
                record.reviewed_by.as_deref().unwrap_or("unknown reviewer")
            );
        }
        _ => {
            let _ = writeln!(
                output,
                "Draft created {}, awaiting review",
                record.created_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## Class Summary");

    if summary.is_empty() {
        let _ = writeln!(output, "No completed attempts for this unit.");
    } else {
        let _ = writeln!(output, "- Students: {}", summary.total_students);
        let _ = writeln!(output, "- Answers: {}", summary.total_answers.unwrap_or(0));
        let _ = writeln!(
            output,
            "- Average accuracy: {:.0}%",
            summary.accuracy_avg.unwrap_or(0.0) * 100.0
        );
        let _ = writeln!(
            output,
            "- Average time per answer: {:.1}s",
            summary.time_avg_sec.unwrap_or(0.0)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Plan Adjustments");
    let overrides = record.plan_delta.group_overrides();

    if overrides.is_empty() {
        let _ = writeln!(output, "Keep the baseline lesson plan unchanged.");
    } else {
        for adjustment in overrides {
            let _ = writeln!(
                output,
                "- {} group: {} (+{} min)",
                adjustment.group, adjustment.action, adjustment.minutes
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Ability Groups");
    let tiers = summarize_by_tier(&record.student_reports);

    if tiers.is_empty() {
        let _ = writeln!(output, "No students classified for this unit.");
    } else {
        for tier in &tiers {
            let _ = writeln!(
                output,
                "- {}: {} students (avg accuracy {:.0}%)",
                tier.tier,
                tier.count,
                tier.avg_accuracy * 100.0
            );
        }
    }

    let mut students = record.student_reports.clone();
    students.sort_by(|a, b| {
        a.accuracy
            .partial_cmp(&b.accuracy)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    let _ = writeln!(output);
    let _ = writeln!(output, "## Students Needing Support");

    let needing_support: Vec<&StudentReport> =
        students.iter().filter(|s| s.tier == Tier::Low).collect();
    if needing_support.is_empty() {
        let _ = writeln!(output, "No students in the low group.");
    } else {
        for student in needing_support.iter().take(10) {
            let _ = writeln!(
                output,
                "- {} ({}) accuracy {:.2}",
                student.name, student.student_id, student.accuracy
            );
        }
    }

    output
}
