use crate::models::{
    CreateGoalRequest, GoalIdRequest, PendingGoal, PendingGoalsEnvelope, SummaryAggregate,
    SummaryEnvelope,
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("goals api returned status {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("goals api request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Remote goals service the summary page reads from and mutates through.
#[async_trait]
pub trait GoalsApi: Send + Sync {
    async fn get_summary(&self) -> Result<SummaryAggregate, ApiError>;

    async fn get_pending_goals(&self) -> Result<Vec<PendingGoal>, ApiError>;

    async fn remove_completion(&self, goal_id: &str) -> Result<(), ApiError>;

    async fn create_completion(&self, goal_id: &str) -> Result<(), ApiError>;

    async fn create_goal(&self, goal: &CreateGoalRequest) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct HttpGoalsApi {
    client: Client,
    base_url: String,
}

impl HttpGoalsApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` when the underlying client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(response.status()))
    }
}

#[async_trait]
impl GoalsApi for HttpGoalsApi {
    async fn get_summary(&self) -> Result<SummaryAggregate, ApiError> {
        let response = self.client.get(self.url("/summary")).send().await?;
        let body: SummaryEnvelope = check_status(response)?.json().await?;
        Ok(body.into_inner())
    }

    async fn get_pending_goals(&self) -> Result<Vec<PendingGoal>, ApiError> {
        let response = self.client.get(self.url("/pending-goals")).send().await?;
        let body: PendingGoalsEnvelope = check_status(response)?.json().await?;
        Ok(body.into_inner())
    }

    async fn remove_completion(&self, goal_id: &str) -> Result<(), ApiError> {
        let payload = GoalIdRequest {
            goal_id: goal_id.to_string(),
        };
        let response = self
            .client
            .delete(self.url("/remove-completions"))
            .json(&payload)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    async fn create_completion(&self, goal_id: &str) -> Result<(), ApiError> {
        let payload = GoalIdRequest {
            goal_id: goal_id.to_string(),
        };
        let response = self
            .client
            .post(self.url("/completions"))
            .json(&payload)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    async fn create_goal(&self, goal: &CreateGoalRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/goals"))
            .json(goal)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }
}
