use anyhow::{Context as _, anyhow};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::Instrument;

use super::{Engine, RunState};
use crate::completion::TextCompletion;
use crate::context::ExecutionContext;
use crate::error::KernelError;
use crate::events::{Event, EventBus};
use crate::function::{Function, FunctionDescriptor, FunctionHandle, SemanticFunction};
use crate::registry::{FunctionRegistry, RegisteredFunction};

/// Runs pipelines of registered functions over a shared context.
///
/// One step at a time, in order. The first failure or cancellation ends the
/// run; nothing already applied is rolled back. No timeout is imposed here:
/// the caller cancels through [`ExecutionContext::cancel_handle`].
pub struct Orchestrator {
    registry: Arc<FunctionRegistry>,
    completion: Option<Arc<dyn TextCompletion>>,
    events: Option<Arc<EventBus>>,
    next_run: AtomicU64,
}

impl Orchestrator {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self {
            registry,
            completion: None,
            events: None,
            next_run: AtomicU64::new(1),
        }
    }

    /// Backend used by semantic functions.
    pub fn with_completion(mut self, completion: Arc<dyn TextCompletion>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Run independent pipelines concurrently, each on its own context.
    /// Results come back in input order.
    pub async fn run_many(
        &self,
        runs: Vec<(ExecutionContext, Vec<FunctionHandle>)>,
    ) -> Vec<Result<ExecutionContext, KernelError>> {
        let futures: Vec<_> = runs
            .into_iter()
            .map(|(context, pipeline)| async move { self.run(context, &pipeline).await })
            .collect();
        futures::future::join_all(futures).await
    }

    fn resolve(&self, pipeline: &[FunctionHandle]) -> Result<Vec<&RegisteredFunction>, KernelError> {
        pipeline
            .iter()
            .map(|handle| self.registry.lookup(&handle.collection, &handle.name))
            .collect()
    }

    fn emit(&self, event: Event) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }

    async fn execute(
        &self,
        run: u64,
        mut context: ExecutionContext,
        steps: Vec<&RegisteredFunction>,
    ) -> ExecutionContext {
        tracing::debug!(state = ?RunState::Running, "run started");
        self.emit(Event::RunStarted {
            run,
            steps: steps.len(),
        });

        for (index, entry) in steps.into_iter().enumerate() {
            if context.is_cancelled() {
                tracing::debug!(index, "cancellation observed, stopping");
                break;
            }

            let descriptor = &entry.descriptor;
            let handle = FunctionHandle::new(&descriptor.collection, &descriptor.name);
            tracing::debug!(index, function = %handle, "step started");
            self.emit(Event::StepStarted {
                run,
                index,
                function: handle.clone(),
            });

            let outcome = match &entry.function {
                Function::Native(function) => function.invoke(&mut context).await,
                Function::Semantic(function) => {
                    self.invoke_semantic(function, descriptor, &mut context).await
                }
            };

            let failed = match outcome {
                Ok(()) => context.has_failed(),
                Err(e) => {
                    let error = KernelError::invocation(&descriptor.collection, &descriptor.name, &e);
                    tracing::warn!(index, function = %handle, error = %error, "step failed");
                    context.fail(error);
                    true
                }
            };

            self.emit(Event::StepFinished {
                run,
                index,
                function: handle,
                failed,
            });
        }

        let state = RunState::settled(&context);
        debug_assert!(state.is_terminal());
        tracing::info!(?state, "run finished");
        self.emit(Event::RunFinished { run, state });
        context
    }

    async fn invoke_semantic(
        &self,
        function: &SemanticFunction,
        descriptor: &FunctionDescriptor,
        context: &mut ExecutionContext,
    ) -> anyhow::Result<()> {
        let completion = self
            .completion
            .as_ref()
            .ok_or_else(|| anyhow!("no text completion backend configured"))?;

        let prompt = function.template().render(context, &descriptor.parameters);
        let text = completion
            .complete(&prompt, function.settings())
            .await
            .context("text completion failed")?;

        context.set_result(text.trim());
        Ok(())
    }
}

#[async_trait]
impl Engine for Orchestrator {
    async fn run(
        &self,
        context: ExecutionContext,
        pipeline: &[FunctionHandle],
    ) -> Result<ExecutionContext, KernelError> {
        let steps = self.resolve(pipeline).inspect_err(|error| {
            tracing::warn!(state = ?RunState::Idle, error = %error, "pipeline did not start");
        })?;
        let run = self.next_run.fetch_add(1, Ordering::Relaxed);
        let span = tracing::info_span!("run", run, steps = steps.len());
        Ok(self.execute(run, context, steps).instrument(span).await)
    }
}
