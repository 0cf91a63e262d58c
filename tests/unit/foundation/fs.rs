use super::*;

#[test]
fn normalize_rel_path_cleans_separators() {
    assert_eq!(normalize_rel_path("video-jobs/a.json").unwrap(), "video-jobs/a.json");
    assert_eq!(normalize_rel_path("./video-jobs//a.json").unwrap(), "video-jobs/a.json");
    assert_eq!(normalize_rel_path(r"video-jobs\a.json").unwrap(), "video-jobs/a.json");
}

#[test]
fn normalize_rel_path_rejects_escapes() {
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("../x.json").is_err());
    assert!(normalize_rel_path("a/../../x.json").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn ensure_parent_dir_creates_nested_directories() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("a/b/c.json");
    ensure_parent_dir(&path).unwrap();
    assert!(tmp.path().join("a/b").is_dir());
}
