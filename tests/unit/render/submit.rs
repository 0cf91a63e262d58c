use super::*;
use crate::config::EngineConfig;
use crate::diagnostics::NullSink;
use crate::render::audio::AudioRefs;
use crate::render::job::RenderJobBuilder;
use crate::timeline::compose::{StructuralAssets, compose};
use crate::timeline::model::CompositionRequest;

fn spec(story_id: &str) -> RenderJobSpec {
    let cfg = EngineConfig::default();
    let req = CompositionRequest {
        narration_duration_seconds: 20.0,
        music_duration_seconds: 0.0,
        total_duration_seconds: 23.0,
        content_assets: Vec::new(),
        has_primary_user_asset: false,
    };
    let structural = StructuralAssets {
        logo: cfg.brand.logo.clone(),
        info_slide: cfg.brand.logo.clone(),
        corner_logo: cfg.brand.corner_logo.clone(),
    };
    let t = compose(&req, cfg.fixed_durations(), &structural, &NullSink).unwrap();
    let audio = AudioRefs {
        narration: "s3://incoming/a.mp3".to_owned(),
        music: None,
    };
    RenderJobBuilder::new(&cfg, &NullSink)
        .build(story_id, &t, &audio)
        .unwrap()
}

#[test]
fn fingerprint_is_stable_and_content_addressed() {
    let a = job_fingerprint(&spec("st-1")).unwrap();
    assert_eq!(a.len(), 32);
    assert_eq!(a, job_fingerprint(&spec("st-1")).unwrap());
    assert_ne!(a, job_fingerprint(&spec("st-2")).unwrap());
}

#[test]
fn spool_writes_job_file_and_reports_submitted() {
    let tmp = tempfile::tempdir().unwrap();
    let submitter = SpoolSubmitter::new(tmp.path().join("jobs"));
    let spec = spec("st-1");

    let job = submitter.submit(&spec).unwrap();
    assert_eq!(job.status, SUBMITTED);
    let path = tmp.path().join("jobs").join(format!("{}.json", job.job_id));
    let back: RenderJobSpec =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(back, spec);

    let status = submitter.status(&job.job_id).unwrap();
    assert_eq!(status.status, SUBMITTED);
    assert_eq!(status.progress_percent, 0);
    assert_eq!(status.completed_at, None);
}

#[test]
fn resubmission_overwrites_the_same_job() {
    let tmp = tempfile::tempdir().unwrap();
    let submitter = SpoolSubmitter::new(tmp.path());
    let first = submitter.submit(&spec("st-1")).unwrap();
    let second = submitter.submit(&spec("st-1")).unwrap();
    assert_eq!(first, second);
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
}

#[test]
fn spool_status_rejects_unknown_and_malformed_ids() {
    let tmp = tempfile::tempdir().unwrap();
    let submitter = SpoolSubmitter::new(tmp.path());
    assert!(submitter.status("00ff").unwrap_err().is_recoverable());
    assert!(submitter.status("../escape").is_err());
    assert!(submitter.status("").is_err());
}

#[test]
fn query_status_adds_story_id() {
    let submitter = MemorySubmitter::new();
    let job = submitter.submit(&spec("st-7")).unwrap();
    assert!(submitter.job(&job.job_id).is_some());

    let report = query_status(&submitter, &job.job_id, "st-7").unwrap();
    assert_eq!(report.story_id, "st-7");
    assert_eq!(report.status.status, SUBMITTED);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["jobId"], job.job_id.as_str());
    assert_eq!(json["progressPercent"], 0);
    assert!(json["createdAt"].is_string());
    assert!(json["completedAt"].is_null());
}

#[test]
fn failing_submitter_reports_upstream_error() {
    let submitter = MemorySubmitter::failing("backend down");
    let err = submitter.submit(&spec("st-1")).unwrap_err();
    assert!(matches!(err, ReelError::UpstreamCollaborator(_)));
    assert!(err.to_string().contains("backend down"));
}
