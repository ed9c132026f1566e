use quill::blog::BlogManager;

fn manager_in(dir: &tempfile::TempDir) -> BlogManager {
    let blogs = dir.path().join("blogs");
    let pages = dir.path().join("pages");
    std::fs::create_dir_all(&pages).unwrap();
    BlogManager::new(blogs, pages)
}

#[test]
fn test_create_and_serve_post() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);

    let id = manager.create("Hello", "First post body");
    assert_eq!(id, 1);

    let page = manager.serve("/blog1").unwrap();
    let page = String::from_utf8(page).unwrap();
    assert!(page.contains("<h1>Hello</h1>"));
    assert!(page.contains("First post body"));
}

#[test]
fn test_serve_ignores_non_post_paths() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    manager.create("Hello", "body");

    assert!(manager.serve("/blogs").is_none());
    assert!(manager.serve("/").is_none());
    assert!(manager.serve("/blog").is_none());
    assert!(manager.serve("/blog99").is_none());
}

#[test]
fn test_create_from_submission() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);

    manager.create_from_submission("title=From Form&content=Posted body&_csrf=ignored");

    assert_eq!(manager.list(), vec![(1, "From Form".to_string())]);
    let page = String::from_utf8(manager.serve("/blog1").unwrap()).unwrap();
    assert!(page.contains("Posted body"));
}

#[test]
fn test_remove_from_submission() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    manager.create("Hello", "body");

    manager.remove_from_submission("blogid=1&_csrf=ignored");

    assert!(manager.list().is_empty());
    assert!(manager.serve("/blog1").is_none());
}

#[test]
fn test_remove_from_submission_ignores_bad_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    manager.create("Hello", "body");

    manager.remove_from_submission("blogid=banana");

    assert_eq!(manager.list().len(), 1);
}

#[test]
fn test_listing_page_regenerated_on_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    let listing = dir.path().join("pages").join("blogs.html");

    manager.create("Alpha", "a");
    let html = std::fs::read_to_string(&listing).unwrap();
    assert!(html.contains("loadDoc('/blog1')"));
    assert!(html.contains(">Alpha<"));

    manager.remove_by_id(1);
    let html = std::fs::read_to_string(&listing).unwrap();
    assert!(!html.contains("Alpha"));
}

#[test]
fn test_listing_page_wraps_rows_of_three() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);

    for n in 1..=4 {
        manager.create(&format!("Post {n}"), "body");
    }

    let html = std::fs::read_to_string(dir.path().join("pages").join("blogs.html")).unwrap();
    assert_eq!(html.matches("</tr><tr>").count(), 1);
    assert!(html.contains("loadDoc('/blog4')"));
}

#[test]
fn test_index_snapshot_written_through_manager() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);

    manager.create("Persisted", "body");

    let snapshot = dir.path().join("blogs").join("blogindex.yaml");
    let raw = std::fs::read_to_string(snapshot).unwrap();
    assert!(raw.contains("Persisted"));
}
