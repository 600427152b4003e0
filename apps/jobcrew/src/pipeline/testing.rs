//! Scripted `StageExecutor` for tests. Records every call and replays queued
//! outcomes per stage; unscripted calls succeed with "{stage_id} output".

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::pipeline::executor::{StageError, StageExecutor, StageRequest};
use crate::pipeline::stage::StageId;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub stage_id: String,
    pub context: Option<String>,
    pub prompt: String,
}

#[derive(Default)]
pub struct ScriptedExecutor {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, StageError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
    cancel_after: Option<(StageId, CancellationToken)>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Cancels `token` once `stage` has returned.
    pub fn cancel_after(mut self, stage: StageId, token: CancellationToken) -> Self {
        self.cancel_after = Some((stage, token));
        self
    }

    pub fn script(&self, stage_id: &str, outcomes: Vec<Result<String, StageError>>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(stage_id.to_string(), outcomes.into());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, stage_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.stage_id == stage_id)
            .count()
    }
}

#[async_trait]
impl StageExecutor for ScriptedExecutor {
    async fn execute(&self, request: StageRequest<'_>) -> Result<String, StageError> {
        let stage_id = request.stage.id.to_string();
        self.calls.lock().unwrap().push(RecordedCall {
            stage_id: stage_id.clone(),
            context: request.context.map(str::to_string),
            prompt: request.stage.prompt.clone(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&stage_id)
            .and_then(VecDeque::pop_front);
        let outcome = scripted.unwrap_or_else(|| Ok(format!("{stage_id} output")));

        if let Some((stage, token)) = &self.cancel_after {
            if stage == &request.stage.id {
                token.cancel();
            }
        }

        outcome
    }
}
