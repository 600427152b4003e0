//! Pipeline runner: executes a `StageGraph` strictly in order.
//!
//! Per stage: check cancellation → build context from declared dependencies →
//! call the executor under a timeout → on `RateLimited`, wait the fixed delay and
//! retry the same stage → append the result to the store.
//!
//! Any failure other than rate limiting aborts immediately. No partial results
//! are returned on failure.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::pipeline::executor::{StageError, StageExecutor, StageRequest};
use crate::pipeline::graph::StageGraph;
use crate::pipeline::stage::{StageId, StageResult, StageSpec};

/// Fixed-delay retry applied to rate-limited stage calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per stage, including the first. Always ≥ 1.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(15),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Run state machine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running(usize),
    RetryWait(usize),
    Failed,
    Completed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Failed | RunState::Completed)
    }

    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (Pending, Running(0)) | (Pending, Failed) => true,
            (Running(i), Running(j)) => j == i + 1,
            (Running(i), RetryWait(j)) => i == j,
            (Running(_), Failed) | (Running(_), Completed) => true,
            (RetryWait(i), Running(j)) => i == j,
            (RetryWait(_), Failed) => true,
            _ => false,
        }
    }
}

/// Tracks the current state and every state visited during one run.
#[derive(Debug)]
pub struct RunStateMachine {
    state: RunState,
    history: Vec<RunState>,
}

impl RunStateMachine {
    pub fn new() -> Self {
        Self {
            state: RunState::Pending,
            history: vec![RunState::Pending],
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    fn advance(&mut self, next: RunState) -> Result<(), AppError> {
        if !self.state.can_transition_to(next) {
            return Err(AppError::Internal(anyhow!(
                "illegal pipeline transition {:?} -> {:?}",
                self.state,
                next
            )));
        }
        debug!("Pipeline state {:?} -> {:?}", self.state, next);
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Marks the run failed and hands back the error that caused it.
    fn fail(&mut self, error: AppError) -> AppError {
        if !self.state.is_terminal() {
            self.state = RunState::Failed;
            self.history.push(RunState::Failed);
        }
        error
    }
}

impl Default for RunStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Append-only result store
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ResultStore {
    results: Vec<StageResult>,
}

impl ResultStore {
    fn record(&mut self, result: StageResult) -> Result<(), AppError> {
        if self.get(&result.stage_id).is_some() {
            return Err(AppError::Internal(anyhow!(
                "stage '{}' produced a second result",
                result.stage_id
            )));
        }
        self.results.push(result);
        Ok(())
    }

    pub fn get(&self, id: &StageId) -> Option<&StageResult> {
        self.results.iter().find(|r| &r.stage_id == id)
    }

    /// Concatenates the outputs of `spec.depends_on`, in declaration order,
    /// each headed by the stage id. `None` when the stage has no dependencies.
    pub fn context_for(&self, spec: &StageSpec) -> Result<Option<String>, AppError> {
        if spec.depends_on.is_empty() {
            return Ok(None);
        }

        let mut blocks = Vec::with_capacity(spec.depends_on.len());
        for dep in &spec.depends_on {
            let result = self.get(dep).ok_or_else(|| {
                AppError::Internal(anyhow!(
                    "stage '{}' ran before its dependency '{dep}'",
                    spec.id
                ))
            })?;
            blocks.push(format!("[{}]\n{}", dep, result.output));
        }
        Ok(Some(blocks.join("\n\n")))
    }

    pub fn into_results(self) -> Vec<StageResult> {
        self.results
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Runner
// ────────────────────────────────────────────────────────────────────────────

pub struct PipelineRunner {
    executor: Arc<dyn StageExecutor>,
    policy: RetryPolicy,
    stage_timeout: Duration,
}

impl PipelineRunner {
    pub fn new(
        executor: Arc<dyn StageExecutor>,
        policy: RetryPolicy,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            executor,
            policy,
            stage_timeout,
        }
    }

    /// Runs every stage of `graph` in order and returns their results in the
    /// same order. Stops before the next stage, or during a retry wait, once
    /// `cancel` fires.
    pub async fn run(
        &self,
        graph: &StageGraph,
        cancel: &CancellationToken,
    ) -> Result<Vec<StageResult>, AppError> {
        let mut machine = RunStateMachine::new();
        self.run_tracked(graph, cancel, &mut machine).await
    }

    pub async fn run_tracked(
        &self,
        graph: &StageGraph,
        cancel: &CancellationToken,
        machine: &mut RunStateMachine,
    ) -> Result<Vec<StageResult>, AppError> {
        let mut store = ResultStore::default();
        let total = graph.len();

        for (index, stage) in graph.stages().iter().enumerate() {
            let spec = &stage.spec;

            if cancel.is_cancelled() {
                warn!("Pipeline cancelled before stage '{}'", spec.id);
                return Err(machine.fail(AppError::Cancelled(spec.id.to_string())));
            }

            let context = store.context_for(spec).map_err(|e| machine.fail(e))?;
            let request = StageRequest {
                stage: spec,
                profile: &stage.profile,
                context: context.as_deref(),
            };

            info!(
                "Stage '{}' ({}/{}) starting with agent {:?}",
                spec.id,
                index + 1,
                total,
                stage.profile.kind
            );

            let output = self
                .execute_with_retry(index, request, cancel, machine)
                .await
                .map_err(|e| machine.fail(e))?;

            info!("Stage '{}' completed ({} chars)", spec.id, output.len());

            store
                .record(StageResult {
                    stage_id: spec.id.clone(),
                    output,
                })
                .map_err(|e| machine.fail(e))?;
        }

        machine.advance(RunState::Completed)?;
        debug!("Run {:?} via {:?}", machine.state(), machine.history());
        Ok(store.into_results())
    }

    async fn execute_with_retry(
        &self,
        index: usize,
        request: StageRequest<'_>,
        cancel: &CancellationToken,
        machine: &mut RunStateMachine,
    ) -> Result<String, AppError> {
        let stage_id = &request.stage.id;
        let mut attempt: u32 = 1;

        loop {
            machine.advance(RunState::Running(index))?;

            let call = self.executor.execute(request);
            let outcome = match tokio::time::timeout(self.stage_timeout, call).await {
                Ok(outcome) => outcome,
                Err(_) => Err(StageError::TransientNetwork(format!(
                    "no response within {}s",
                    self.stage_timeout.as_secs()
                ))),
            };

            let error = match outcome {
                Ok(output) => return Ok(output),
                Err(e) => e,
            };

            if !error.is_rate_limited() {
                return Err(AppError::ExternalCapability(format!(
                    "stage '{stage_id}' failed: {error}"
                )));
            }

            if attempt >= self.policy.max_attempts {
                warn!(
                    "Stage '{}' still rate limited after {} attempts, aborting pipeline",
                    stage_id, attempt
                );
                return Err(AppError::RateLimited {
                    stage: stage_id.to_string(),
                    attempts: attempt,
                });
            }

            machine.advance(RunState::RetryWait(index))?;
            warn!(
                "Stage '{}' attempt {}/{} rate limited, retrying after {}s",
                stage_id,
                attempt,
                self.policy.max_attempts,
                self.policy.delay.as_secs()
            );

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(AppError::Cancelled(stage_id.to_string()));
                }
                _ = tokio::time::sleep(self.policy.delay) => {}
            }

            attempt += 1;
        }
    }
}
