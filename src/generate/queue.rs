//! Observable list of component generation jobs.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::catalog::model::ComponentDescriptor;
use crate::catalog::registry::SubscriptionId;

/// Identifier of a [`GenerationJob`], unique within its queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct JobId(u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job_{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Generating,
    Validating,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed or failed.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationJob {
    pub id: JobId,
    pub component_id: String,
    pub status: JobStatus,
    /// 0..=100.
    pub progress: u8,
    pub component: Option<ComponentDescriptor>,
    pub error: Option<String>,
    /// Creation order within the queue.
    pub sequence: u64,
}

/// Callback receiving every job (newest first) after each change.
pub type JobListener = Box<dyn FnMut(&[GenerationJob]) + Send>;

/// Jobs keyed by id, plus the listeners observing them.
#[derive(Default)]
pub struct GenerationQueue {
    jobs: IndexMap<JobId, GenerationJob>,
    next_job: u64,
    listeners: Vec<(SubscriptionId, JobListener)>,
    next_subscription: u64,
}

impl fmt::Debug for GenerationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationQueue")
            .field("jobs", &self.jobs)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl GenerationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a pending job for `component_id`.
    pub fn add_job(&mut self, component_id: impl Into<String>) -> JobId {
        let sequence = self.next_job;
        self.next_job += 1;
        let id = JobId(sequence);
        self.jobs.insert(
            id,
            GenerationJob {
                id,
                component_id: component_id.into(),
                status: JobStatus::Pending,
                progress: 0,
                component: None,
                error: None,
                sequence,
            },
        );
        self.notify();
        id
    }

    /// Apply `change` to a job. Returns `false` when the job does not exist.
    pub fn update(&mut self, id: JobId, change: impl FnOnce(&mut GenerationJob)) -> bool {
        let Some(job) = self.jobs.get_mut(&id) else {
            return false;
        };
        change(job);
        job.progress = job.progress.min(100);
        self.notify();
        true
    }

    pub fn set_status(&mut self, id: JobId, status: JobStatus, progress: u8) -> bool {
        self.update(id, |job| {
            job.status = status;
            job.progress = progress;
        })
    }

    pub fn complete(&mut self, id: JobId, component: ComponentDescriptor) -> bool {
        self.update(id, |job| {
            job.status = JobStatus::Completed;
            job.progress = 100;
            job.component = Some(component);
            job.error = None;
        })
    }

    pub fn fail(&mut self, id: JobId, error: impl Into<String>) -> bool {
        let error = error.into();
        self.update(id, |job| {
            job.status = JobStatus::Failed;
            job.progress = 0;
            job.error = Some(error);
        })
    }

    pub fn get(&self, id: JobId) -> Option<&GenerationJob> {
        self.jobs.get(&id)
    }

    /// Every job, newest first.
    pub fn all_jobs(&self) -> Vec<GenerationJob> {
        self.jobs.values().rev().cloned().collect()
    }

    /// Jobs that are neither completed nor failed, newest first.
    pub fn active_jobs(&self) -> Vec<GenerationJob> {
        self.jobs
            .values()
            .rev()
            .filter(|job| !job.status.is_finished())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Drop completed and failed jobs. Returns how many were removed.
    pub fn clear_finished(&mut self) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|_, job| !job.status.is_finished());
        self.notify();
        before - self.jobs.len()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&[GenerationJob]) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.all_jobs();
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/queue.rs"]
mod tests;
