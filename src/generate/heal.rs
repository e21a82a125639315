//! Generate descriptors for components a scene references but the catalog lacks.

use indexmap::IndexSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::lint::lint_component;
use crate::catalog::model::ComponentDescriptor;
use crate::catalog::registry::CatalogRegistry;
use crate::catalog::store::ComponentStore;
use crate::foundation::error::{QuizSceneError, QuizSceneResult};
use crate::generate::extract::parse_component_response;
use crate::generate::queue::{GenerationQueue, JobId, JobStatus};
use crate::generate::service::{ComponentRequest, GenerationService};

const PROGRESS_GENERATING: u8 = 30;
const PROGRESS_VALIDATING: u8 = 80;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealOptions {
    /// Run the external generation calls on a rayon pool.
    pub parallel: bool,
    /// Pool size; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Write accepted descriptors through the store, when one is given.
    pub persist: bool,
}

impl Default for HealOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            persist: true,
        }
    }
}

/// Outcome of one [`AutoHealer::heal`] run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HealReport {
    /// Ids registered, in request order.
    pub completed: Vec<String>,
    /// Ids that could not be generated, with the reason.
    pub failed: Vec<(String, String)>,
    /// Jobs created by this run, in request order.
    pub jobs: Vec<JobId>,
}

impl HealReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AutoHealer {
    options: HealOptions,
    context: Option<String>,
}

impl AutoHealer {
    pub fn new(options: HealOptions) -> Self {
        Self {
            options,
            context: None,
        }
    }

    /// Extra context attached to every component request.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn options(&self) -> &HealOptions {
        &self.options
    }

    /// Generate, validate and register a descriptor for every distinct id in `missing` that the
    /// registry does not already hold.
    ///
    /// Each id gets a job in `queue`. External calls may run in parallel; validation and
    /// registry writes happen on the calling thread in request order. A failed job leaves the
    /// registry untouched.
    #[tracing::instrument(skip_all, fields(requested = missing.len()))]
    pub fn heal(
        &self,
        missing: &[String],
        registry: &mut CatalogRegistry,
        queue: &mut GenerationQueue,
        service: &dyn GenerationService,
        store: Option<&dyn ComponentStore>,
    ) -> QuizSceneResult<HealReport> {
        let ids: IndexSet<&str> = missing
            .iter()
            .map(String::as_str)
            .filter(|id| registry.get(id).is_none())
            .collect();
        let mut report = HealReport::default();
        if ids.is_empty() {
            return Ok(report);
        }

        let pool = if self.options.parallel && ids.len() > 1 {
            Some(build_thread_pool(self.options.threads)?)
        } else {
            None
        };

        let requests: Vec<(JobId, ComponentRequest)> = ids
            .iter()
            .map(|id| {
                let job = queue.add_job(*id);
                let mut request = ComponentRequest::for_missing(*id);
                if let Some(context) = &self.context {
                    request = request.with_context(context.clone());
                }
                (job, request)
            })
            .collect();
        for (job, _) in &requests {
            queue.set_status(*job, JobStatus::Generating, PROGRESS_GENERATING);
        }

        let responses: Vec<anyhow::Result<String>> = match &pool {
            Some(pool) => pool.install(|| {
                requests
                    .par_iter()
                    .map(|(_, request)| service.generate_component(request))
                    .collect()
            }),
            None => requests
                .iter()
                .map(|(_, request)| service.generate_component(request))
                .collect(),
        };

        for ((job, request), response) in requests.into_iter().zip(responses) {
            report.jobs.push(job);
            let id = request.component_id;
            let outcome = response
                .map_err(|e| QuizSceneError::generation(format!("{e:#}")))
                .and_then(|text| {
                    queue.set_status(job, JobStatus::Validating, PROGRESS_VALIDATING);
                    accept_component(&text, &id)
                })
                .and_then(|descriptor| {
                    if self.options.persist
                        && let Some(store) = store
                    {
                        store.store(&descriptor)?;
                    }
                    Ok(descriptor)
                });
            match outcome {
                Ok(descriptor) => {
                    registry.add(descriptor.clone());
                    queue.complete(job, descriptor);
                    tracing::debug!(component = %id, "component generated");
                    report.completed.push(id);
                }
                Err(e) => {
                    tracing::warn!(component = %id, error = %e, "component generation failed");
                    queue.fail(job, e.to_string());
                    report.failed.push((id, e.to_string()));
                }
            }
        }
        Ok(report)
    }
}

/// Extract, validate and lint a generated descriptor, forcing its id to `requested_id`.
pub fn accept_component(text: &str, requested_id: &str) -> QuizSceneResult<ComponentDescriptor> {
    let mut descriptor = parse_component_response(text)?;
    let (fatal, minor): (Vec<_>, Vec<_>) = lint_component(&descriptor)
        .into_iter()
        .partition(|issue| issue.is_fatal());
    if !fatal.is_empty() {
        let messages: Vec<String> = fatal.iter().map(ToString::to_string).collect();
        return Err(QuizSceneError::generation(format!(
            "generated component '{}' rejected: {}",
            requested_id,
            messages.join("; ")
        )));
    }
    for issue in &minor {
        tracing::warn!(component = requested_id, %issue, "generated component lint");
    }
    if descriptor.id != requested_id {
        tracing::warn!(
            requested = requested_id,
            generated = %descriptor.id,
            "generated component id differs from the requested one"
        );
        descriptor.id = requested_id.to_owned();
    }
    Ok(descriptor)
}

fn build_thread_pool(threads: Option<usize>) -> QuizSceneResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(QuizSceneError::generation(
            "heal 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| QuizSceneError::generation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/generate/heal.rs"]
mod tests;
