//! 固件刷写任务的进度状态机。
//!
//! 进度只由轮询推动：每次查询任务资源时，若任务仍在进行中则推进 25%，
//! 到达 100% 后保持完成状态，直到下一次成功推送将其复位。

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::{TASK_ID, TASK_PATH};
use crate::http::json_response;

pub const PROGRESS_STEP: u8 = 25;
pub const PROGRESS_DONE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    InProgress,
    Completed,
}

impl TaskState {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::InProgress => "In Progress",
            TaskState::Completed => "Completed",
        }
    }
}

/// 任务进度快照；`state` 为 `Completed` 当且仅当百分比为 100。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskProgress {
    percent_complete: u8,
}

impl TaskProgress {
    const fn started() -> Self {
        Self {
            percent_complete: 0,
        }
    }

    pub fn percent_complete(self) -> u8 {
        self.percent_complete
    }

    pub fn state(self) -> TaskState {
        if self.percent_complete >= PROGRESS_DONE {
            TaskState::Completed
        } else {
            TaskState::InProgress
        }
    }

    fn advance(&mut self) {
        if self.state() == TaskState::InProgress {
            self.percent_complete = self
                .percent_complete
                .saturating_add(PROGRESS_STEP)
                .min(PROGRESS_DONE);
        }
    }
}

/// 全进程唯一的任务进度，读-改-写在互斥锁内完成。
#[derive(Debug)]
pub struct TaskProgressEngine {
    progress: Mutex<TaskProgress>,
}

impl Default for TaskProgressEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskProgressEngine {
    pub fn new() -> Self {
        Self {
            progress: Mutex::new(TaskProgress::started()),
        }
    }

    /// 复位为 0% / 进行中。
    pub async fn reset(&self) {
        let mut progress = self.progress.lock().await;
        *progress = TaskProgress::started();
    }

    /// 推进一步并返回推进后的快照。
    pub async fn poll(&self) -> TaskProgress {
        let mut progress = self.progress.lock().await;
        progress.advance();
        *progress
    }

    /// 读取当前快照，不推进。
    #[cfg(test)]
    pub async fn peek(&self) -> TaskProgress {
        *self.progress.lock().await
    }
}

fn task_document(progress: TaskProgress) -> Value {
    json!({
        "@odata.id": TASK_PATH,
        "@odata.type": "#Task.v1_4_3.Task",
        "Id": TASK_ID,
        "Messages": [
            {
                "Message": "The property SKU is a read only property and cannot be assigned a value",
                "Severity": "Warning",
            }
        ],
        "Name": format!("Task {TASK_ID}"),
        "PercentComplete": progress.percent_complete(),
        "TaskState": progress.state().as_str(),
        "TaskStatus": "OK",
    })
}

/// 任务监视器：每次查询都会推进进度。
pub async fn get_task(Extension(engine): Extension<Arc<TaskProgressEngine>>) -> Response {
    let progress = engine.poll().await;
    debug!(
        percent_complete = progress.percent_complete(),
        state = progress.state().as_str(),
        "task polled"
    );
    json_response(StatusCode::OK, &task_document(progress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn polls_advance_by_quarter_until_completed() {
        let engine = TaskProgressEngine::new();
        let mut seen = Vec::new();
        for _ in 0..6 {
            let progress = engine.poll().await;
            seen.push((progress.percent_complete(), progress.state()));
        }
        assert_eq!(
            seen,
            vec![
                (25, TaskState::InProgress),
                (50, TaskState::InProgress),
                (75, TaskState::InProgress),
                (100, TaskState::Completed),
                (100, TaskState::Completed),
                (100, TaskState::Completed),
            ]
        );
    }

    #[tokio::test]
    async fn reset_restarts_from_zero_after_completion() {
        let engine = TaskProgressEngine::new();
        for _ in 0..5 {
            engine.poll().await;
        }
        assert_eq!(engine.peek().await.state(), TaskState::Completed);

        engine.reset().await;
        let progress = engine.peek().await;
        assert_eq!(progress.percent_complete(), 0);
        assert_eq!(progress.state(), TaskState::InProgress);
        assert_eq!(engine.poll().await.percent_complete(), 25);
    }

    #[tokio::test]
    async fn reset_mid_flight_discards_progress() {
        let engine = TaskProgressEngine::new();
        engine.poll().await;
        engine.poll().await;
        engine.reset().await;
        assert_eq!(engine.poll().await.percent_complete(), 25);
    }

    #[tokio::test]
    async fn concurrent_polls_do_not_lose_updates() {
        let engine = Arc::new(TaskProgressEngine::new());
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.poll().await })
            })
            .collect();
        for handle in handles {
            handle.await.expect("join");
        }
        assert_eq!(engine.peek().await.percent_complete(), 75);
    }

    #[tokio::test]
    async fn task_document_reports_state_and_percentage() {
        let engine = Arc::new(TaskProgressEngine::new());
        let response = get_task(Extension(engine.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.expect("body").to_bytes();
        let document: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(document["Id"], "545");
        assert_eq!(document["Name"], "Task 545");
        assert_eq!(document["PercentComplete"], 25);
        assert_eq!(document["TaskState"], "In Progress");
        assert_eq!(document["TaskStatus"], "OK");
        assert_eq!(document["Messages"][0]["Severity"], "Warning");
    }
}
