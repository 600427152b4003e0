//! Static stage DAG. Declaration order is the execution order; every
//! dependency must point at an earlier stage, so no sort is needed at run time.

use std::collections::HashSet;
use std::sync::Arc;

use crate::agents::CapabilityProfile;
use crate::errors::AppError;
use crate::pipeline::stage::{StageId, StageSpec};

/// A stage bound to the profile that executes it.
#[derive(Debug, Clone)]
pub struct PipelineStage {
    pub spec: StageSpec,
    pub profile: Arc<CapabilityProfile>,
}

#[derive(Debug, Clone)]
pub struct StageGraph {
    stages: Vec<PipelineStage>,
}

impl StageGraph {
    /// Validates and freezes the stage list. Rejects an empty pipeline,
    /// duplicate ids, and dependencies that are unknown or point forward.
    pub fn new(stages: Vec<PipelineStage>) -> Result<Self, AppError> {
        if stages.is_empty() {
            return Err(AppError::InvalidPipeline(
                "pipeline has no stages".to_string(),
            ));
        }

        let all_ids: HashSet<&StageId> = stages.iter().map(|s| &s.spec.id).collect();
        let mut seen: HashSet<&StageId> = HashSet::with_capacity(stages.len());

        for stage in &stages {
            let id = &stage.spec.id;
            for dep in &stage.spec.depends_on {
                if dep == id {
                    return Err(AppError::InvalidPipeline(format!(
                        "stage '{id}' depends on itself"
                    )));
                }
                if !seen.contains(dep) {
                    let reason = if all_ids.contains(dep) {
                        "a later stage"
                    } else {
                        "an unknown stage"
                    };
                    return Err(AppError::InvalidPipeline(format!(
                        "stage '{id}' depends on {reason} '{dep}'"
                    )));
                }
            }
            if !seen.insert(id) {
                return Err(AppError::InvalidPipeline(format!(
                    "duplicate stage id '{id}'"
                )));
            }
        }

        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false for a constructed graph; empty stage lists are rejected.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.spec.label()).collect()
    }

    #[cfg(test)]
    pub fn get(&self, id: &StageId) -> Option<&PipelineStage> {
        self.stages.iter().find(|s| &s.spec.id == id)
    }
}
