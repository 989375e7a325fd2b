//! Writes to the goals API.
//!
//! Every mutation touches both the weekly summary and the pending goals list,
//! so both queries are invalidated once the call settles, whatever its outcome.
//! A caller that stops waiting mid-call still leaves both queries stale.

use crate::api::{ApiError, GoalsApi};
use crate::models::CreateGoalRequest;
use crate::query::{QueryClient, QueryKey};
use tracing::{info, warn};

pub const AFFECTED_QUERIES: [QueryKey; 2] = [QueryKey::Summary, QueryKey::PendingGoals];

pub const MAX_WEEKLY_FREQUENCY: u32 = 7;

#[derive(Debug, thiserror::Error)]
pub enum GoalValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("desired weekly frequency must be between 1 and 7")]
    Frequency,
}

pub async fn remove_completion(
    api: &dyn GoalsApi,
    queries: &QueryClient,
    goal_id: &str,
) -> Result<(), ApiError> {
    let _invalidate = InvalidateOnDrop(queries);
    let result = api.remove_completion(goal_id).await;
    log_outcome("remove completion", goal_id, &result);
    result
}

pub async fn create_completion(
    api: &dyn GoalsApi,
    queries: &QueryClient,
    goal_id: &str,
) -> Result<(), ApiError> {
    let _invalidate = InvalidateOnDrop(queries);
    let result = api.create_completion(goal_id).await;
    log_outcome("create completion", goal_id, &result);
    result
}

pub async fn create_goal(
    api: &dyn GoalsApi,
    queries: &QueryClient,
    goal: &CreateGoalRequest,
) -> Result<(), ApiError> {
    let _invalidate = InvalidateOnDrop(queries);
    let result = api.create_goal(goal).await;
    log_outcome("create goal", &goal.title, &result);
    result
}

/// Trims the title and checks the weekly frequency range.
pub fn validate_goal(goal: CreateGoalRequest) -> Result<CreateGoalRequest, GoalValidationError> {
    let title = goal.title.trim();
    if title.is_empty() {
        return Err(GoalValidationError::EmptyTitle);
    }
    if !(1..=MAX_WEEKLY_FREQUENCY).contains(&goal.desired_weekly_frequency) {
        return Err(GoalValidationError::Frequency);
    }
    Ok(CreateGoalRequest {
        title: title.to_string(),
        desired_weekly_frequency: goal.desired_weekly_frequency,
    })
}

/// Invalidates the affected queries when dropped, including when the
/// mutation future is dropped before the upstream call returns.
struct InvalidateOnDrop<'a>(&'a QueryClient);

impl Drop for InvalidateOnDrop<'_> {
    fn drop(&mut self) {
        self.0.invalidate_many(&AFFECTED_QUERIES);
    }
}

fn log_outcome(action: &str, subject: &str, result: &Result<(), ApiError>) {
    match result {
        Ok(()) => info!(action, subject, "goals api mutation applied"),
        Err(err) => warn!(action, subject, "goals api mutation failed: {err}"),
    }
}
