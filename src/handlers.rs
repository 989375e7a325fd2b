use crate::errors::AppError;
use crate::models::{CreateGoalRequest, GoalIdRequest, PendingGoal};
use crate::mutations;
use crate::state::AppState;
use crate::summary::{build_view, SummaryState, SummaryView};
use crate::ui::{render_index, Notice};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    pub notice: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Html<String> {
    let (summary, pending) = tokio::join!(load_summary(&state), load_pending_goals(&state));
    let notice = params.notice.as_deref().and_then(Notice::parse);
    Html(render_index(
        &summary,
        pending.as_deref().map(Vec::as_slice),
        notice,
        state.locale,
    ))
}

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryView>, AppError> {
    match load_summary(&state).await {
        SummaryState::Ready(view) => Ok(Json(view)),
        SummaryState::Loading => Err(AppError::unavailable("summary is still loading")),
        SummaryState::Failed(message) => Err(AppError::upstream(message)),
    }
}

pub async fn get_pending_goals(
    State(state): State<AppState>,
) -> Result<Json<Vec<PendingGoal>>, AppError> {
    let api = Arc::clone(&state.api);
    let goals = state
        .queries
        .pending_goals()
        .fetch(move || async move { api.get_pending_goals().await })
        .await?;
    Ok(Json(goals.as_ref().clone()))
}

pub async fn remove_completion(
    State(state): State<AppState>,
    Json(payload): Json<GoalIdRequest>,
) -> Result<StatusCode, AppError> {
    let goal_id = required_goal_id(&payload)?;
    mutations::remove_completion(state.api.as_ref(), &state.queries, goal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_completion(
    State(state): State<AppState>,
    Json(payload): Json<GoalIdRequest>,
) -> Result<StatusCode, AppError> {
    let goal_id = required_goal_id(&payload)?;
    mutations::create_completion(state.api.as_ref(), &state.queries, goal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<StatusCode, AppError> {
    let goal =
        mutations::validate_goal(payload).map_err(|err| AppError::bad_request(err.to_string()))?;
    mutations::create_goal(state.api.as_ref(), &state.queries, &goal).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_completion_form(
    State(state): State<AppState>,
    Form(payload): Form<GoalIdRequest>,
) -> Redirect {
    let Ok(goal_id) = required_goal_id(&payload) else {
        warn!("rejected undo form without a goal id");
        return redirect_home(false, Notice::UndoFailed);
    };
    let result = mutations::remove_completion(state.api.as_ref(), &state.queries, goal_id).await;
    redirect_home(result.is_ok(), Notice::UndoFailed)
}

pub async fn create_completion_form(
    State(state): State<AppState>,
    Form(payload): Form<GoalIdRequest>,
) -> Redirect {
    let Ok(goal_id) = required_goal_id(&payload) else {
        warn!("rejected completion form without a goal id");
        return redirect_home(false, Notice::CompleteFailed);
    };
    let result = mutations::create_completion(state.api.as_ref(), &state.queries, goal_id).await;
    redirect_home(result.is_ok(), Notice::CompleteFailed)
}

/// Raw new-goal form fields. Both are optional on the wire so a bad post
/// lands on the page notice instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desired_weekly_frequency: String,
}

pub async fn create_goal_form(
    State(state): State<AppState>,
    Form(payload): Form<GoalForm>,
) -> Redirect {
    let Ok(desired_weekly_frequency) = payload.desired_weekly_frequency.trim().parse() else {
        warn!(
            frequency = %payload.desired_weekly_frequency,
            "rejected goal form: frequency is not a number"
        );
        return redirect_home(false, Notice::CreateFailed);
    };
    let goal = match mutations::validate_goal(CreateGoalRequest {
        title: payload.title,
        desired_weekly_frequency,
    }) {
        Ok(goal) => goal,
        Err(err) => {
            warn!("rejected goal form: {err}");
            return redirect_home(false, Notice::CreateFailed);
        }
    };
    let result = mutations::create_goal(state.api.as_ref(), &state.queries, &goal).await;
    redirect_home(result.is_ok(), Notice::CreateFailed)
}

/// Reads the summary query, bounded by the render timeout.
///
/// Only the wait is bounded: a fetch still running at the deadline keeps
/// going and fills the cache for a later render. When a refresh fails or
/// times out, the last loaded aggregate is shown instead.
pub async fn load_summary(state: &AppState) -> SummaryState {
    let query = state.queries.summary();
    let api = Arc::clone(&state.api);
    let fetched = timeout(
        state.render_timeout,
        query.fetch(move || async move { api.get_summary().await }),
    )
    .await;

    let summary = match fetched {
        Ok(Ok(summary)) => summary,
        Ok(Err(err)) => match query.data() {
            Some(previous) => {
                warn!("summary refresh failed, showing previous data: {err}");
                previous
            }
            None => {
                warn!("summary fetch failed: {err}");
                return SummaryState::Failed(err.to_string());
            }
        },
        Err(_) => match query.data() {
            Some(previous) => previous,
            None => {
                warn!(timeout = ?state.render_timeout, "summary not loaded in time");
                return SummaryState::Loading;
            }
        },
    };

    SummaryState::Ready(build_view(&summary, state.locale, state.day_order))
}

async fn load_pending_goals(state: &AppState) -> Option<Arc<Vec<PendingGoal>>> {
    let query = state.queries.pending_goals();
    let api = Arc::clone(&state.api);
    let fetched = timeout(
        state.render_timeout,
        query.fetch(move || async move { api.get_pending_goals().await }),
    )
    .await;

    match fetched {
        Ok(Ok(goals)) => Some(goals),
        Ok(Err(err)) => {
            warn!("pending goals fetch failed: {err}");
            query.data()
        }
        Err(_) => query.data(),
    }
}

fn required_goal_id(payload: &GoalIdRequest) -> Result<&str, AppError> {
    let goal_id = payload.goal_id.trim();
    if goal_id.is_empty() {
        return Err(AppError::bad_request("goalId must not be empty"));
    }
    Ok(goal_id)
}

fn redirect_home(ok: bool, notice: Notice) -> Redirect {
    if ok {
        Redirect::to("/")
    } else {
        Redirect::to(&format!("/?notice={}", notice.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{CompletionRecord, GoalsPerDay, SummaryAggregate};
    use crate::mutations::tests::FakeApi;
    use crate::query::QueryKey;
    use axum::response::IntoResponse;
    use std::time::Duration;

    fn state_with(api: FakeApi) -> (AppState, Arc<FakeApi>) {
        state_with_config(api, &Config::default())
    }

    fn state_with_config(api: FakeApi, config: &Config) -> (AppState, Arc<FakeApi>) {
        let api = Arc::new(api);
        let state = AppState::new(api.clone(), config);
        (state, api)
    }

    fn count(api: &FakeApi, call: &str) -> usize {
        api.calls().iter().filter(|recorded| recorded.as_str() == call).count()
    }

    fn sample_summary() -> SummaryAggregate {
        SummaryAggregate {
            completed: 3,
            total_goals: 10,
            goals_per_day: Some(GoalsPerDay(vec![(
                "2024-01-01".into(),
                vec![CompletionRecord {
                    id: "a".into(),
                    title: "Read".into(),
                    completed_at: "2024-01-01T10:00:00Z".parse().unwrap(),
                }],
            )])),
        }
    }

    #[tokio::test]
    async fn summary_view_derives_percentage() {
        let (state, _) = state_with(FakeApi {
            summary: sample_summary(),
            ..FakeApi::default()
        });

        let Json(view) = get_summary(State(state)).await.unwrap();

        assert_eq!(view.completed_percentage, 30);
        assert_eq!(view.days[0].entries[0].title, "Read");
    }

    #[tokio::test]
    async fn form_removal_redirects_and_invalidates() {
        let (state, api) = state_with(FakeApi::default());
        load_summary(&state).await;

        let response = remove_completion_form(
            State(state.clone()),
            Form(GoalIdRequest {
                goal_id: "x".into(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/");
        assert!(state.queries.is_stale(QueryKey::Summary));
        assert!(state.queries.is_stale(QueryKey::PendingGoals));
        assert!(api.calls().contains(&"DELETE /remove-completions x".to_string()));
    }

    #[tokio::test]
    async fn failed_form_removal_carries_notice() {
        let (state, _) = state_with(FakeApi::failing());

        let response = remove_completion_form(
            State(state.clone()),
            Form(GoalIdRequest {
                goal_id: "x".into(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.headers()["location"], "/?notice=undo-failed");
        assert!(state.queries.is_stale(QueryKey::Summary));
    }

    #[tokio::test]
    async fn failed_api_removal_is_bad_gateway() {
        let (state, _) = state_with(FakeApi::failing());

        let err = remove_completion(
            State(state),
            Json(GoalIdRequest {
                goal_id: "x".into(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn invalid_goal_never_reaches_api() {
        let (state, api) = state_with(FakeApi::default());

        let err = create_goal(
            State(state),
            Json(CreateGoalRequest {
                title: " ".into(),
                desired_weekly_frequency: 3,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_summary_is_ready_on_a_later_render() {
        let config = Config {
            render_timeout: Duration::from_millis(100),
            ..Config::default()
        };
        let (state, api) = state_with_config(
            FakeApi {
                summary: sample_summary(),
                delay: Duration::from_millis(200),
                ..FakeApi::default()
            },
            &config,
        );

        assert!(matches!(load_summary(&state).await, SummaryState::Loading));

        tokio::time::sleep(Duration::from_secs(2)).await;

        let SummaryState::Ready(view) = load_summary(&state).await else {
            panic!("summary should be ready once the slow fetch lands");
        };
        assert_eq!(view.completed_percentage, 30);
        assert_eq!(count(&api, "GET /summary"), 1);
    }

    #[tokio::test]
    async fn blank_goal_id_form_redirects_with_notice() {
        let (state, api) = state_with(FakeApi::default());

        let undo = remove_completion_form(
            State(state.clone()),
            Form(GoalIdRequest {
                goal_id: "  ".into(),
            }),
        )
        .await
        .into_response();
        let complete = create_completion_form(
            State(state),
            Form(GoalIdRequest {
                goal_id: String::new(),
            }),
        )
        .await
        .into_response();

        assert_eq!(undo.headers()["location"], "/?notice=undo-failed");
        assert_eq!(complete.headers()["location"], "/?notice=complete-failed");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_frequency_redirects_with_notice() {
        let (state, api) = state_with(FakeApi::default());

        for frequency in ["abc", ""] {
            let response = create_goal_form(
                State(state.clone()),
                Form(GoalForm {
                    title: "Read".into(),
                    desired_weekly_frequency: frequency.into(),
                }),
            )
            .await
            .into_response();

            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers()["location"], "/?notice=create-failed");
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn goal_form_creates_goal() {
        let (state, api) = state_with(FakeApi::default());

        let response = create_goal_form(
            State(state),
            Form(GoalForm {
                title: " Read ".into(),
                desired_weekly_frequency: "3".into(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.headers()["location"], "/");
        assert_eq!(api.calls(), ["POST /goals Read"]);
    }
}
