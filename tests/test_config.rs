use std::time::Duration;

use quill::config::Config;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.listen_addr, "[::]:8443");
    assert_eq!(cfg.worker_threads, 4);
    assert_eq!(cfg.idle_timeout_secs, 60);
    assert_eq!(cfg.admin_user, "user");
    assert_eq!(cfg.admin_pass, "pass");
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quill.yaml");
    std::fs::write(
        &path,
        "listen_addr: \"127.0.0.1:9443\"\nworker_threads: 2\nidle_timeout_secs: 5\n",
    )
    .unwrap();

    let cfg = Config::from_file(&path).unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1:9443");
    assert_eq!(cfg.worker_threads, 2);
    assert_eq!(cfg.idle_timeout(), Duration::from_secs(5));
    // Unset fields keep their defaults.
    assert_eq!(cfg.admin_user, "user");
}

#[test]
fn test_config_from_file_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quill.yaml");
    std::fs::write(&path, "listen_addr: [not, a, string]\n").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_config_load_missing_file_uses_defaults() {
    unsafe {
        std::env::set_var("QUILL_CONFIG", "/definitely/not/a/real/config.yaml");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "[::]:8443");
    unsafe {
        std::env::remove_var("QUILL_CONFIG");
    }
}

#[test]
fn test_config_site_subdirectories() {
    let cfg = Config::default();

    assert_eq!(cfg.pages_root(), cfg.site_root.join("pages"));
    assert_eq!(cfg.blogs_root(), cfg.site_root.join("blogs"));
}
