//! SQLite interview repository implementation.
//!
//! Implements `InterviewRepository` from `vox-core`. A save writes the
//! interview row, its transcript entries, and its summary in one transaction.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use vox_core::repository::interview::InterviewRepository;
use vox_types::error::RepositoryError;
use vox_types::interview::{
    Interview, InterviewId, InterviewRecord, QuestionAndAnswer, Summary, Transcript,
};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `InterviewRepository`.
pub struct SqliteInterviewRepository {
    pool: DatabasePool,
}

impl SqliteInterviewRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn interview_exists(&self, id: &InterviewId) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM interviews WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(row.is_some())
    }
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC timestamps so `ORDER BY created_at` sorts chronologically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn interview_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Interview, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;
    Ok(Interview {
        id: id
            .parse()
            .map_err(|e| RepositoryError::Query(format!("invalid interview id: {e}")))?,
        respondent_id: row.try_get("respondent_id").map_err(query_error)?,
        topic_id: row.try_get("topic_id").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl InterviewRepository for SqliteInterviewRepository {
    async fn save(&self, record: &InterviewRecord) -> Result<InterviewId, RepositoryError> {
        let id = record.id();
        let id_str = id.to_string();

        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let inserted = sqlx::query(
            "INSERT INTO interviews (id, respondent_id, topic_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id_str)
        .bind(&record.interview.respondent_id)
        .bind(&record.interview.topic_id)
        .bind(format_datetime(&record.interview.created_at))
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                return Err(RepositoryError::Conflict(format!(
                    "interview '{id}' already exists"
                )));
            }
            Err(e) => return Err(query_error(e)),
        }

        for (position, entry) in record.transcript.entries.iter().enumerate() {
            sqlx::query(
                "INSERT INTO transcript_entries (interview_id, position, question, answer) VALUES (?, ?, ?, ?)",
            )
            .bind(&id_str)
            .bind(position as i64)
            .bind(&entry.question)
            .bind(&entry.answer)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;
        }

        sqlx::query("INSERT INTO summaries (interview_id, text) VALUES (?, ?)")
            .bind(&id_str)
            .bind(&record.summary.text)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;

        tracing::debug!(interview_id = %id, entries = record.transcript.entries.len(), "interview persisted");
        Ok(id)
    }

    async fn get_interview(&self, id: &InterviewId) -> Result<Interview, RepositoryError> {
        let row = sqlx::query("SELECT * FROM interviews WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?
            .ok_or(RepositoryError::NotFound)?;
        interview_from_row(&row)
    }

    async fn get_transcript(&self, id: &InterviewId) -> Result<Transcript, RepositoryError> {
        // An interview with no answers has no entry rows, so tell that apart
        // from an unknown ID.
        if !self.interview_exists(id).await? {
            return Err(RepositoryError::NotFound);
        }

        let rows = sqlx::query(
            "SELECT question, answer FROM transcript_entries WHERE interview_id = ? ORDER BY position ASC",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let entries = rows
            .iter()
            .map(|row| {
                Ok(QuestionAndAnswer {
                    question: row.try_get("question").map_err(query_error)?,
                    answer: row.try_get("answer").map_err(query_error)?,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(Transcript {
            interview_id: *id,
            entries,
        })
    }

    async fn get_summary(&self, id: &InterviewId) -> Result<Summary, RepositoryError> {
        let row = sqlx::query("SELECT text FROM summaries WHERE interview_id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?
            .ok_or(RepositoryError::NotFound)?;

        Ok(Summary {
            interview_id: *id,
            text: row.try_get("text").map_err(query_error)?,
        })
    }

    async fn list_interviews(&self) -> Result<Vec<Interview>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM interviews ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(interview_from_row).collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
