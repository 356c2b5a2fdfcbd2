//! HTTP handlers for the two task endpoints.

use crate::error::ApiError;
use crate::executor::Executor;
use crate::task::{TaskId, TaskStatus};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router(executor: Arc<Executor>) -> Router {
    Router::new()
        .route("/run_task", post(run_task))
        .route("/info/{task_id}", get(info))
        .with_state(executor)
}

#[derive(Debug, Deserialize)]
struct RunTaskRequest {
    source: String,
    #[serde(default)]
    stdin: String,
    token: String,
}

#[derive(Debug, Serialize)]
struct RunTaskResponse {
    task_id: String,
}

async fn run_task(State(executor): State<Arc<Executor>>, Json(req): Json<RunTaskRequest>) -> Json<RunTaskResponse> {
    let id = executor.submit(req.source, req.stdin, req.token);
    tracing::info!(task_id = id, "task submitted");
    Json(RunTaskResponse { task_id: id.to_string() })
}

#[derive(Debug, Deserialize)]
struct InfoQuery {
    token: String,
}

async fn info(
    State(executor): State<Arc<Executor>>,
    Path(task_id): Path<TaskId>,
    Query(query): Query<InfoQuery>,
) -> Result<Json<Value>, ApiError> {
    match executor.tokens().check(task_id, &query.token) {
        None => Err(ApiError::NotFound),
        Some(false) => Err(ApiError::Forbidden),
        Some(true) => {
            let status = executor.status(task_id).await.ok_or(ApiError::NotFound)?;
            Ok(Json(match status {
                TaskStatus::Running => json!({ "task_status": "running" }),
                TaskStatus::Done { stdout } => json!({ "task_status": "done", "stdout": stdout }),
                TaskStatus::Error { message } => json!({ "task_status": "error", "error": message }),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::store::InMemoryTokenStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_executor(tasks_dir: std::path::PathBuf) -> Arc<Executor> {
        let config = ServiceConfig {
            tasks_dir,
            ..ServiceConfig::default()
        };
        Arc::new(Executor::new(config, Arc::new(InMemoryTokenStore::new())))
    }

    #[tokio::test]
    async fn submit_then_poll_with_correct_token_is_not_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_executor(dir.path().to_path_buf()));

        let submit = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/run_task")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"source": "x = 1\nnull = print(x)", "stdin": "", "token": "tok"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(submit.status(), StatusCode::OK);
        let body = axum::body::to_bytes(submit.into_body(), usize::MAX).await.unwrap();
        let parsed: Value = serde_json::from_slice(&body).unwrap();
        let task_id = parsed["task_id"].as_str().unwrap();

        let poll = app
            .oneshot(
                Request::builder()
                    .uri(format!("/info/{task_id}?token=tok"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(poll.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_token_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_executor(dir.path().to_path_buf()));

        let submit = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/run_task")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"source": "null = print(1)", "stdin": "", "token": "tok"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(submit.into_body(), usize::MAX).await.unwrap();
        let parsed: Value = serde_json::from_slice(&body).unwrap();
        let task_id = parsed["task_id"].as_str().unwrap();

        let poll = app
            .oneshot(
                Request::builder()
                    .uri(format!("/info/{task_id}?token=wrong"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(poll.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_task_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_executor(dir.path().to_path_buf()));
        let poll = app
            .oneshot(
                Request::builder()
                    .uri("/info/999?token=whatever")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(poll.status(), StatusCode::NOT_FOUND);
    }
}
