use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgConnection, PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::models::{
    AnswerRecord, AttemptRecord, LessonPlan, NewPersonalizationRecord, PersonalizationRecord,
    PublishUpdate, StudentRef, Unit, UnitOverview,
};
use crate::store::PersonalizationStore;

const RECORD_COLUMNS: &str = "id, unit_id, lesson_plan_id, class_summary, plan_delta, \
     student_reports, is_published, reviewed_by, created_at, published_at";

pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let pool = config
        .connect_retry
        .run("connect to postgres", || {
            PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.url)
        })
        .await?;
    Ok(pool)
}

pub async fn init_db(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn create_unit(
    pool: &PgPool,
    title: &str,
    difficulty: &str,
    duration_min: i32,
) -> Result<Unit, StoreError> {
    let mut conn = pool.acquire().await?;
    let id = upsert_unit(&mut conn, Uuid::new_v4(), title, difficulty, duration_min).await?;
    let row = sqlx::query(
        "SELECT id, title, difficulty, duration_min, created_at \
         FROM classroom_personalization.units WHERE id = $1",
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    unit_from_row(&row)
}

pub async fn create_plan(
    pool: &PgPool,
    unit_id: Uuid,
    version: &str,
) -> Result<LessonPlan, StoreError> {
    let row = sqlx::query(
        r#"
        INSERT INTO classroom_personalization.lesson_plans (id, unit_id, version)
        VALUES ($1, $2, $3)
        ON CONFLICT (unit_id, version) DO UPDATE SET version = EXCLUDED.version
        RETURNING id, unit_id, version, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(unit_id)
    .bind(version)
    .fetch_one(pool)
    .await?;
    plan_from_row(&row)
}

pub async fn list_units(pool: &PgPool) -> Result<Vec<UnitOverview>, StoreError> {
    let rows = sqlx::query(
        r#"
        SELECT u.id, u.title, u.difficulty, u.duration_min, u.created_at,
               COUNT(a.id) FILTER (WHERE a.is_completed) AS completed_attempts
        FROM classroom_personalization.units u
        LEFT JOIN classroom_personalization.attempts a ON a.unit_id = u.id
        GROUP BY u.id
        ORDER BY u.created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut units = Vec::new();
    for row in rows {
        units.push(UnitOverview {
            unit: unit_from_row(&row)?,
            completed_attempts: row.try_get("completed_attempts")?,
        });
    }
    Ok(units)
}

pub async fn seed(pool: &PgPool) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;

    let unit_id = upsert_unit(
        &mut tx,
        Uuid::from_u128(0x6b0f_2c1e_8d4a_4f7e_9a3c_5e1d_2b7f_4c01),
        "Fractions Foundations",
        "medium",
        45,
    )
    .await?;

    sqlx::query(
        r#"
        INSERT INTO classroom_personalization.lesson_plans (id, unit_id, version)
        VALUES ($1, $2, $3)
        ON CONFLICT (unit_id, version) DO NOTHING
        "#,
    )
    .bind(Uuid::from_u128(0x1d9e_77a0_3c52_4b8e_8f16_0a4d_9c2e_b501))
    .bind(unit_id)
    .bind("v1.0")
    .execute(&mut *tx)
    .await?;

    let mut question_ids = Vec::new();
    for order in 1..=5 {
        question_ids.push(upsert_question(&mut tx, unit_id, order).await?);
    }

    let students = [
        ("GS-2026-014", "Avery Lee", "seed-001", [true, true, true, false, true], 11.5),
        ("GS-2025-102", "Jules Moreno", "seed-002", [false, true, false, false, true], 24.0),
        ("GS-2026-037", "Kiara Patel", "seed-003", [true, true, true, true, true], 9.0),
    ];

    for (student_id, name, source_key, results, seconds) in students {
        let student_uuid = upsert_student(&mut tx, student_id, name).await?;
        let attempt_id = upsert_attempt(&mut tx, student_uuid, unit_id, source_key, true).await?;
        for (question_id, is_correct) in question_ids.iter().zip(results) {
            insert_answer(&mut tx, attempt_id, *question_id, is_correct, seconds).await?;
        }
    }

    tx.commit().await?;
    info!(unit_id = %unit_id, "seed data loaded");
    Ok(())
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> Result<usize, StoreError> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        unit_id: Uuid,
        student_id: String,
        student_name: String,
        attempt_key: String,
        question_order: i32,
        is_correct: bool,
        time_spent_sec: f64,
        completed: bool,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let student_uuid = upsert_student(&mut tx, &row.student_id, &row.student_name).await?;
        let question_id = upsert_question(&mut tx, row.unit_id, row.question_order).await?;
        let attempt_id = upsert_attempt(
            &mut tx,
            student_uuid,
            row.unit_id,
            &row.attempt_key,
            row.completed,
        )
        .await?;

        if insert_answer(
            &mut tx,
            attempt_id,
            question_id,
            row.is_correct,
            row.time_spent_sec.max(0.0),
        )
        .await?
        {
            inserted += 1;
        }
    }

    tx.commit().await?;
    debug!(inserted, path = %csv_path.display(), "csv import committed");
    Ok(inserted)
}

async fn upsert_unit(
    conn: &mut PgConnection,
    id: Uuid,
    title: &str,
    difficulty: &str,
    duration_min: i32,
) -> Result<Uuid, StoreError> {
    let row = sqlx::query(
        r#"
        INSERT INTO classroom_personalization.units (id, title, difficulty, duration_min)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (title) DO UPDATE
        SET difficulty = EXCLUDED.difficulty, duration_min = EXCLUDED.duration_min
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(difficulty)
    .bind(duration_min)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.try_get("id")?)
}

async fn upsert_question(
    conn: &mut PgConnection,
    unit_id: Uuid,
    question_order: i32,
) -> Result<Uuid, StoreError> {
    let row = sqlx::query(
        r#"
        INSERT INTO classroom_personalization.questions (id, unit_id, question_order, prompt)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (unit_id, question_order) DO UPDATE
        SET question_order = EXCLUDED.question_order
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(unit_id)
    .bind(question_order)
    .bind(format!("Question {question_order}"))
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.try_get("id")?)
}

async fn upsert_student(
    conn: &mut PgConnection,
    student_id: &str,
    name: &str,
) -> Result<Uuid, StoreError> {
    let row = sqlx::query(
        r#"
        INSERT INTO classroom_personalization.students (id, student_id, name)
        VALUES ($1, $2, $3)
        ON CONFLICT (student_id) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(student_id)
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.try_get("id")?)
}

/// Inserts or reuses the attempt named by `source_key`. A key already used
/// by another unit or student is rejected rather than merged.
async fn upsert_attempt(
    conn: &mut PgConnection,
    student_uuid: Uuid,
    unit_id: Uuid,
    source_key: &str,
    completed: bool,
) -> Result<Uuid, StoreError> {
    let row = sqlx::query(
        r#"
        INSERT INTO classroom_personalization.attempts
        (id, student_id, unit_id, is_completed, source_key)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (source_key) DO UPDATE
        SET is_completed = attempts.is_completed OR EXCLUDED.is_completed
        RETURNING id, unit_id, student_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(student_uuid)
    .bind(unit_id)
    .bind(completed)
    .bind(source_key)
    .fetch_one(&mut *conn)
    .await?;

    check_attempt_owner(
        source_key,
        (unit_id, student_uuid),
        (row.try_get("unit_id")?, row.try_get("student_id")?),
    )?;
    Ok(row.try_get("id")?)
}

fn check_attempt_owner(
    source_key: &str,
    (unit_id, student_uuid): (Uuid, Uuid),
    (stored_unit_id, stored_student_uuid): (Uuid, Uuid),
) -> Result<(), StoreError> {
    if unit_id == stored_unit_id && student_uuid == stored_student_uuid {
        return Ok(());
    }
    Err(StoreError::AttemptKeyConflict {
        source_key: source_key.to_string(),
        unit_id: stored_unit_id,
        student_uuid: stored_student_uuid,
    })
}

async fn insert_answer(
    conn: &mut PgConnection,
    attempt_id: Uuid,
    question_id: Uuid,
    is_correct: bool,
    time_spent_sec: f64,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        INSERT INTO classroom_personalization.answers
        (id, attempt_id, question_id, is_correct, time_spent_sec)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (attempt_id, question_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(attempt_id)
    .bind(question_id)
    .bind(is_correct)
    .bind(time_spent_sec)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PersonalizationStore for PgStore {
    async fn find_unit(&self, unit_id: Uuid) -> Result<Option<Unit>, StoreError> {
        let row = sqlx::query(
            "SELECT id, title, difficulty, duration_min, created_at \
             FROM classroom_personalization.units WHERE id = $1",
        )
        .bind(unit_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(unit_from_row).transpose()
    }

    async fn find_lesson_plan(&self, plan_id: Uuid) -> Result<Option<LessonPlan>, StoreError> {
        let row = sqlx::query(
            "SELECT id, unit_id, version, created_at \
             FROM classroom_personalization.lesson_plans WHERE id = $1",
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(plan_from_row).transpose()
    }

    async fn find_student(&self, student_id: &str) -> Result<Option<StudentRef>, StoreError> {
        let row = sqlx::query(
            "SELECT id, student_id, name FROM classroom_personalization.students \
             WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| -> Result<StudentRef, StoreError> {
            Ok(StudentRef {
                id: row.try_get("id")?,
                student_id: row.try_get("student_id")?,
                name: row.try_get("name")?,
            })
        })
        .transpose()
    }

    async fn list_completed_attempts(
        &self,
        unit_id: Uuid,
    ) -> Result<Vec<AttemptRecord>, StoreError> {
        let rows: Vec<AttemptRow> = sqlx::query_as(
            r#"
            SELECT a.id AS attempt_id, a.unit_id, a.is_completed,
                   st.id AS student_uuid, st.student_id, st.name,
                   ans.is_correct, ans.time_spent_sec, q.question_order
            FROM classroom_personalization.attempts a
            JOIN classroom_personalization.students st ON st.id = a.student_id
            LEFT JOIN classroom_personalization.answers ans ON ans.attempt_id = a.id
            LEFT JOIN classroom_personalization.questions q ON q.id = ans.question_id
            WHERE a.unit_id = $1 AND a.is_completed = TRUE
            ORDER BY a.started_at, a.id, q.question_order
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        let attempts = fold_attempt_rows(rows);
        debug!(unit_id = %unit_id, attempts = attempts.len(), "collected completed attempts");
        Ok(attempts)
    }

    async fn create_record(
        &self,
        record: &NewPersonalizationRecord,
    ) -> Result<PersonalizationRecord, StoreError> {
        let query = format!(
            r#"
            INSERT INTO classroom_personalization.personalization_records
            (id, unit_id, lesson_plan_id, class_summary, plan_delta, student_reports,
             is_published, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
            RETURNING {RECORD_COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(record.unit_id)
            .bind(record.lesson_plan_id)
            .bind(to_document("class_summary", &record.class_summary)?)
            .bind(to_document("plan_delta", &record.plan_delta)?)
            .bind(to_document("student_reports", &record.student_reports)?)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        record_from_row(&row)
    }

    async fn get_record(&self, id: Uuid) -> Result<Option<PersonalizationRecord>, StoreError> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM classroom_personalization.personalization_records \
             WHERE id = $1"
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn mark_published(
        &self,
        id: Uuid,
        update: &PublishUpdate,
    ) -> Result<Option<PersonalizationRecord>, StoreError> {
        let query = format!(
            r#"
            UPDATE classroom_personalization.personalization_records
            SET is_published = TRUE, reviewed_by = $2, published_at = $3
            WHERE id = $1 AND is_published = FALSE
            RETURNING {RECORD_COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(update.reviewed_by.as_deref())
            .bind(update.published_at)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn list_records(&self, unit_id: Uuid) -> Result<Vec<PersonalizationRecord>, StoreError> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM classroom_personalization.personalization_records \
             WHERE unit_id = $1 ORDER BY created_at DESC, id"
        );
        let rows = sqlx::query(&query)
            .bind(unit_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(record_from_row).collect()
    }
}

/// One attempt joined with at most one of its answers. The answer columns
/// are NULL for an attempt without answers.
#[derive(Debug, Clone, sqlx::FromRow)]
struct AttemptRow {
    attempt_id: Uuid,
    unit_id: Uuid,
    is_completed: bool,
    student_uuid: Uuid,
    student_id: String,
    name: String,
    is_correct: Option<bool>,
    time_spent_sec: Option<f64>,
    question_order: Option<i32>,
}

/// Groups joined rows into attempts in first-seen order, with each
/// attempt's answers sorted by question order.
fn fold_attempt_rows(rows: Vec<AttemptRow>) -> Vec<AttemptRecord> {
    let mut attempts: Vec<AttemptRecord> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        let slot = *index.entry(row.attempt_id).or_insert_with(|| {
            attempts.push(AttemptRecord {
                id: row.attempt_id,
                unit_id: row.unit_id,
                student: StudentRef {
                    id: row.student_uuid,
                    student_id: row.student_id.clone(),
                    name: row.name.clone(),
                },
                is_completed: row.is_completed,
                answers: Vec::new(),
            });
            attempts.len() - 1
        });

        if let (Some(is_correct), Some(time_spent_sec), Some(question_order)) =
            (row.is_correct, row.time_spent_sec, row.question_order)
        {
            attempts[slot].answers.push(AnswerRecord {
                is_correct,
                time_spent_sec,
                question_order,
            });
        }
    }

    for attempt in &mut attempts {
        attempt.answers.sort_by_key(|answer| answer.question_order);
    }
    attempts
}

fn unit_from_row(row: &PgRow) -> Result<Unit, StoreError> {
    Ok(Unit {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        difficulty: row.try_get("difficulty")?,
        duration_min: row.try_get("duration_min")?,
        created_at: row.try_get("created_at")?,
    })
}

fn plan_from_row(row: &PgRow) -> Result<LessonPlan, StoreError> {
    Ok(LessonPlan {
        id: row.try_get("id")?,
        unit_id: row.try_get("unit_id")?,
        version: row.try_get("version")?,
        created_at: row.try_get("created_at")?,
    })
}

fn record_from_row(row: &PgRow) -> Result<PersonalizationRecord, StoreError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(PersonalizationRecord {
        id: row.try_get("id")?,
        unit_id: row.try_get("unit_id")?,
        lesson_plan_id: row.try_get("lesson_plan_id")?,
        class_summary: from_document("class_summary", row.try_get("class_summary")?)?,
        plan_delta: from_document("plan_delta", row.try_get("plan_delta")?)?,
        student_reports: from_document("student_reports", row.try_get("student_reports")?)?,
        is_published: row.try_get("is_published")?,
        reviewed_by: row.try_get("reviewed_by")?,
        created_at,
        published_at: row.try_get("published_at")?,
    })
}

fn to_document<T: Serialize>(
    column: &'static str,
    value: &T,
) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value).map_err(|source| StoreError::Document { column, source })
}

fn from_document<T: DeserializeOwned>(
    column: &'static str,
    value: serde_json::Value,
) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|source| StoreError::Document { column, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassSummary, PlanDelta, StudentReport, Tier};
    use serde_json::json;

    #[test]
    fn documents_round_trip_through_json_columns() {
        let summary = ClassSummary {
            total_students: 2,
            accuracy_avg: Some(0.4),
            time_avg_sec: Some(14.0),
            total_answers: Some(5),
        };
        let value = to_document("class_summary", &summary).unwrap();
        assert_eq!(
            value,
            json!({ "total_students": 2, "accuracy_avg": 0.4, "time_avg_sec": 14.0, "total_answers": 5 })
        );
        let back: ClassSummary = from_document("class_summary", value).unwrap();
        assert_eq!(back, summary);

        let reports = vec![StudentReport {
            student_id: "GS-2026-014".to_string(),
            name: "Avery Lee".to_string(),
            accuracy: 0.67,
            tier: Tier::Medium,
        }];
        let value = to_document("student_reports", &reports).unwrap();
        assert_eq!(value[0]["tier"], json!("medium"));
        let back: Vec<StudentReport> = from_document("student_reports", value).unwrap();
        assert_eq!(back, reports);
    }

    #[test]
    fn malformed_document_names_its_column() {
        let err = from_document::<PlanDelta>("plan_delta", json!("rebalance everything")).unwrap_err();
        match err {
            StoreError::Document { column, .. } => assert_eq!(column, "plan_delta"),
            other => panic!("unexpected error: {other}"),
        }
    }

    fn row(attempt: u128, student_id: &str, answer: Option<(i32, bool, f64)>) -> AttemptRow {
        AttemptRow {
            attempt_id: Uuid::from_u128(attempt),
            unit_id: Uuid::from_u128(0xa),
            is_completed: true,
            student_uuid: Uuid::from_u128(student_id.len() as u128),
            student_id: student_id.to_string(),
            name: format!("Student {student_id}"),
            is_correct: answer.map(|(_, is_correct, _)| is_correct),
            time_spent_sec: answer.map(|(_, _, seconds)| seconds),
            question_order: answer.map(|(order, _, _)| order),
        }
    }

    #[test]
    fn attempt_without_answers_keeps_empty_answer_list() {
        let attempts = fold_attempt_rows(vec![
            row(1, "GS-2026-037", None),
            row(2, "GS-2026-037", Some((1, true, 9.0))),
        ]);

        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].id, Uuid::from_u128(1));
        assert!(attempts[0].answers.is_empty());
        assert_eq!(attempts[1].answers.len(), 1);
    }

    #[test]
    fn repeat_attempts_by_one_student_stay_separate() {
        let attempts = fold_attempt_rows(vec![
            row(1, "GS-2026-014", Some((1, true, 11.5))),
            row(1, "GS-2026-014", Some((2, false, 12.0))),
            row(2, "GS-2026-014", Some((1, true, 8.0))),
        ]);

        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].student, attempts[1].student);
        assert_eq!(attempts[0].answers.len(), 2);
        assert_eq!(attempts[1].answers.len(), 1);
        assert_eq!(attempts[1].answers[0].time_spent_sec, 8.0);
    }

    #[test]
    fn answers_are_ordered_by_question() {
        let attempts = fold_attempt_rows(vec![
            row(1, "GS-2025-102", Some((3, false, 30.0))),
            row(2, "GS-2026-014", Some((1, true, 5.0))),
            row(1, "GS-2025-102", Some((1, true, 10.0))),
            row(1, "GS-2025-102", Some((2, true, 20.0))),
        ]);

        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].id, Uuid::from_u128(1));
        let orders: Vec<i32> = attempts[0].answers.iter().map(|a| a.question_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(attempts[0].answers[0].time_spent_sec, 10.0);
    }

    #[test]
    fn half_null_answer_columns_are_skipped() {
        let mut partial = row(1, "GS-2026-014", Some((1, true, 4.0)));
        partial.question_order = None;

        let attempts = fold_attempt_rows(vec![partial]);
        assert_eq!(attempts.len(), 1);
        assert!(attempts[0].answers.is_empty());
    }

    #[test]
    fn attempt_key_reused_across_units_is_rejected() {
        let unit = Uuid::from_u128(1);
        let other_unit = Uuid::from_u128(2);
        let student = Uuid::from_u128(10);
        let other_student = Uuid::from_u128(11);

        assert!(check_attempt_owner("seed-001", (unit, student), (unit, student)).is_ok());

        let err = check_attempt_owner("seed-001", (other_unit, student), (unit, student)).unwrap_err();
        match err {
            StoreError::AttemptKeyConflict {
                source_key,
                unit_id,
                student_uuid,
            } => {
                assert_eq!(source_key, "seed-001");
                assert_eq!(unit_id, unit);
                assert_eq!(student_uuid, student);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            check_attempt_owner("seed-001", (unit, other_student), (unit, student)),
            Err(StoreError::AttemptKeyConflict { .. })
        ));
    }

    #[test]
    fn partial_plan_delta_document_is_rejected() {
        let err = from_document::<PlanDelta>("plan_delta", json!({ "group_overrides": [] }))
            .unwrap_err();
        assert!(matches!(err, StoreError::Document { column: "plan_delta", .. }));
    }
}
