use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use xxhash_rust::xxh3::Xxh3;

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::fs::ensure_parent_dir;
use crate::render::job::RenderJobSpec;

const XXH3_SEED: u64 = 0x5e7f_1d2c_9a4b_3087;

/// Initial status every accepted job reports.
pub const SUBMITTED: &str = "SUBMITTED";

/// Opaque handle returned by the render backend.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedJob {
    pub job_id: String,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub status: String,
    pub progress_percent: u8,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Render backend seam: accepts job descriptions and reports their progress.
///
/// Submission never waits for the render itself.
pub trait RenderSubmitter: Send + Sync {
    fn submit(&self, spec: &RenderJobSpec) -> ReelResult<SubmittedJob>;

    fn status(&self, job_id: &str) -> ReelResult<JobStatus>;
}

/// Deterministic identifier of a job description (xxh3-128 of its JSON form, hex).
pub fn job_fingerprint(spec: &RenderJobSpec) -> ReelResult<String> {
    let bytes = serde_json::to_vec(spec)?;
    let mut h = Xxh3::with_seed(XXH3_SEED);
    h.update(&bytes);
    Ok(format!("{:032x}", h.digest128()))
}

/// Writes each job description to `<dir>/<job_id>.json` for an out-of-process renderer.
#[derive(Clone, Debug)]
pub struct SpoolSubmitter {
    dir: PathBuf,
}

impl SpoolSubmitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn job_path(&self, job_id: &str) -> ReelResult<PathBuf> {
        if job_id.is_empty() || !job_id.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ReelError::upstream(format!("unknown job id '{job_id}'")));
        }
        Ok(self.dir.join(format!("{job_id}.json")))
    }
}

impl RenderSubmitter for SpoolSubmitter {
    fn submit(&self, spec: &RenderJobSpec) -> ReelResult<SubmittedJob> {
        let job_id = job_fingerprint(spec)?;
        let path = self.job_path(&job_id)?;
        let json = serde_json::to_vec_pretty(spec)?;

        ensure_parent_dir(&path).map_err(|e| ReelError::upstream(e.to_string()))?;
        std::fs::write(&path, json).map_err(|e| {
            ReelError::upstream(format!("failed to spool job '{}': {e}", path.display()))
        })?;
        tracing::info!(%job_id, path = %path.display(), "render job spooled");

        Ok(SubmittedJob {
            job_id,
            status: SUBMITTED.to_owned(),
        })
    }

    fn status(&self, job_id: &str) -> ReelResult<JobStatus> {
        let path = self.job_path(job_id)?;
        let meta = std::fs::metadata(&path)
            .map_err(|e| ReelError::upstream(format!("unknown job id '{job_id}': {e}")))?;
        let created = meta
            .created()
            .or_else(|_| meta.modified())
            .map_err(|e| ReelError::upstream(e.to_string()))?;

        Ok(JobStatus {
            status: SUBMITTED.to_owned(),
            progress_percent: 0,
            created_at: DateTime::<Utc>::from(created),
            completed_at: None,
        })
    }
}

/// In-process submitter that keeps accepted jobs in memory.
#[derive(Debug, Default)]
pub struct MemorySubmitter {
    jobs: Mutex<BTreeMap<String, (RenderJobSpec, DateTime<Utc>)>>,
    failure: Option<String>,
}

impl MemorySubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A submitter whose every call fails with an upstream error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            jobs: Mutex::default(),
            failure: Some(reason.into()),
        }
    }

    pub fn job(&self, job_id: &str) -> Option<RenderJobSpec> {
        let jobs = match self.jobs.lock() {
            Ok(jobs) => jobs,
            Err(poisoned) => poisoned.into_inner(),
        };
        jobs.get(job_id).map(|(spec, _)| spec.clone())
    }

    fn check(&self) -> ReelResult<()> {
        match &self.failure {
            Some(reason) => Err(ReelError::upstream(reason.clone())),
            None => Ok(()),
        }
    }
}

impl RenderSubmitter for MemorySubmitter {
    fn submit(&self, spec: &RenderJobSpec) -> ReelResult<SubmittedJob> {
        self.check()?;
        let job_id = job_fingerprint(spec)?;
        let mut jobs = match self.jobs.lock() {
            Ok(jobs) => jobs,
            Err(poisoned) => poisoned.into_inner(),
        };
        jobs.insert(job_id.clone(), (spec.clone(), Utc::now()));
        Ok(SubmittedJob {
            job_id,
            status: SUBMITTED.to_owned(),
        })
    }

    fn status(&self, job_id: &str) -> ReelResult<JobStatus> {
        self.check()?;
        let jobs = match self.jobs.lock() {
            Ok(jobs) => jobs,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (_, created_at) = jobs
            .get(job_id)
            .ok_or_else(|| ReelError::upstream(format!("unknown job id '{job_id}'")))?;
        Ok(JobStatus {
            status: SUBMITTED.to_owned(),
            progress_percent: 0,
            created_at: *created_at,
            completed_at: None,
        })
    }
}

/// Status of a render job as exposed to callers.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusReport {
    pub job_id: String,
    pub story_id: String,
    #[serde(flatten)]
    pub status: JobStatus,
}

/// Thin passthrough to [`RenderSubmitter::status`].
pub fn query_status(
    submitter: &dyn RenderSubmitter,
    job_id: &str,
    story_id: &str,
) -> ReelResult<JobStatusReport> {
    Ok(JobStatusReport {
        job_id: job_id.to_owned(),
        story_id: story_id.to_owned(),
        status: submitter.status(job_id)?,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/submit.rs"]
mod tests;
