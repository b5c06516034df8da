//! Interview repository trait definition.

use vox_types::error::RepositoryError;
use vox_types::interview::{Interview, InterviewId, InterviewRecord, Summary, Transcript};

/// Repository trait for interview persistence.
///
/// Implementations live in vox-infra (e.g., SqliteInterviewRepository).
/// Lookups of an unknown ID return [`RepositoryError::NotFound`].
pub trait InterviewRepository: Send + Sync {
    /// Persist metadata, transcript, and summary as one unit.
    ///
    /// Either all three records are stored under the record's ID or none are.
    fn save(
        &self,
        record: &InterviewRecord,
    ) -> impl std::future::Future<Output = Result<InterviewId, RepositoryError>> + Send;

    fn get_interview(
        &self,
        id: &InterviewId,
    ) -> impl std::future::Future<Output = Result<Interview, RepositoryError>> + Send;

    fn get_transcript(
        &self,
        id: &InterviewId,
    ) -> impl std::future::Future<Output = Result<Transcript, RepositoryError>> + Send;

    fn get_summary(
        &self,
        id: &InterviewId,
    ) -> impl std::future::Future<Output = Result<Summary, RepositoryError>> + Send;

    /// All interviews, newest first.
    fn list_interviews(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Interview>, RepositoryError>> + Send;

    /// Release the underlying store.
    fn close(&self) -> impl std::future::Future<Output = ()> + Send;
}
