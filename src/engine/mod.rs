pub mod orchestrator;

use async_trait::async_trait;

use crate::context::ExecutionContext;
use crate::error::KernelError;
use crate::function::FunctionHandle;

pub use orchestrator::Orchestrator;

/// Where a run is in its life.
///
/// `Idle -> Running -> Completed | Cancelled | Failed`. A pipeline that does
/// not resolve never leaves `Idle`; `Running` spans `RunStarted` to
/// `RunFinished`. Only terminal states are reported by [`RunState::settled`]
/// and carried by `RunFinished`. Cancelled is a cooperative stop: steps that
/// already ran keep their effects and no error is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Cancelled | RunState::Failed)
    }

    /// The terminal state a finished run's context is in.
    pub fn settled(context: &ExecutionContext) -> Self {
        if context.has_failed() {
            RunState::Failed
        } else if context.is_cancelled() {
            RunState::Cancelled
        } else {
            RunState::Completed
        }
    }
}

/// The outermost boundary. Request handlers and main.rs only know this trait.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Run `pipeline` in order over `context` and hand the context back.
    ///
    /// Only a handle that does not resolve is returned as `Err`; step
    /// failures are recorded in the returned context.
    async fn run(
        &self,
        context: ExecutionContext,
        pipeline: &[FunctionHandle],
    ) -> Result<ExecutionContext, KernelError>;
}
