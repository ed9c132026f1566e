use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::blog::BlogIndex;
use crate::http::request::form_fields;

/// File name of the persisted index snapshot under the blog root.
const INDEX_SNAPSHOT: &str = "blogindex.yaml";

/// A stored blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub content: String,
}

/// Locates, creates, and removes blog posts.
///
/// Owns the shared index, one file per post under the blog root, and the
/// generated static listing page under the page root. Console commands and
/// admin submissions both mutate through this type, so every mutation
/// serializes on the same index lock.
pub struct BlogManager {
    index: BlogIndex,
    blog_root: PathBuf,
    page_root: PathBuf,
}

impl BlogManager {
    pub fn new(blog_root: PathBuf, page_root: PathBuf) -> Self {
        if let Err(e) = std::fs::create_dir_all(&blog_root) {
            warn!(error = %e, "Failed to create blog directory");
        }
        let index = BlogIndex::load(blog_root.join(INDEX_SNAPSHOT));

        Self {
            index,
            blog_root,
            page_root,
        }
    }

    /// Serves a post route of the form `/blog<id>`, rendering the stored
    /// post when it exists. Any other path is not handled here.
    pub fn serve(&self, path: &str) -> Option<Vec<u8>> {
        let id: u64 = path.strip_prefix("/blog")?.parse().ok()?;
        let post = self.load_post(id)?;
        Some(render_post(&post))
    }

    /// Creates a post and returns its identifier.
    pub fn create(&self, title: &str, content: &str) -> u64 {
        let id = self.index.create(title);

        let post = Post {
            title: title.to_string(),
            content: content.to_string(),
        };
        match serde_yaml::to_string(&post) {
            Ok(raw) => {
                if let Err(e) = std::fs::write(self.post_path(id), raw) {
                    warn!(id, error = %e, "Failed to write post file");
                }
            }
            Err(e) => warn!(id, error = %e, "Failed to serialize post"),
        }

        self.render_listing();
        id
    }

    /// Creates a post from an admin form submission with `title` and
    /// `content` fields. Missing fields default to empty.
    pub fn create_from_submission(&self, body: &str) {
        let fields = form_fields(body);
        let title = fields.get("title").copied().unwrap_or_default();
        let content = fields.get("content").copied().unwrap_or_default();
        self.create(title, content);
    }

    /// Removes the post named by the `blogid` field of a form submission.
    /// A missing or non-numeric field is ignored.
    pub fn remove_from_submission(&self, body: &str) {
        if let Some(id) = form_fields(body).get("blogid").and_then(|v| v.parse().ok()) {
            self.remove_by_id(id);
        }
    }

    /// Removes a post, reporting whether the index held it.
    pub fn remove_by_id(&self, id: u64) -> bool {
        let removed = self.index.destroy(id);
        // The post file goes regardless of whether the index held the entry.
        let _ = std::fs::remove_file(self.post_path(id));
        self.render_listing();
        removed
    }

    pub fn list(&self) -> Vec<(u64, String)> {
        self.index.list()
    }

    fn load_post(&self, id: u64) -> Option<Post> {
        let raw = std::fs::read_to_string(self.post_path(id)).ok()?;
        serde_yaml::from_str(&raw).ok()
    }

    fn post_path(&self, id: u64) -> PathBuf {
        self.blog_root.join(format!("{id}.yaml"))
    }

    /// Regenerates the static listing page, three post buttons per table
    /// row. Best effort; a failed write leaves the previous page in place.
    fn render_listing(&self) {
        let mut html = String::from("<br><br><table id=\"blogs\"><tr>");
        for (count, (id, title)) in self.index.list().iter().enumerate() {
            html.push_str(&format!(
                "<td><button onclick=\"loadDoc('/blog{id}')\">{title}</button></td>"
            ));
            if (count + 1) % 3 == 0 {
                html.push_str("</tr><tr>");
            }
        }
        html.push_str("</tr></table>");

        if let Err(e) = std::fs::write(self.page_root.join("blogs.html"), html) {
            warn!(error = %e, "Failed to write blog listing page");
        }
    }
}

fn render_post(post: &Post) -> Vec<u8> {
    format!(
        "<!DOCTYPE html><html><head><title>{0}</title></head>\
         <body><h1>{0}</h1><p>{1}</p></body></html>",
        post.title, post.content
    )
    .into_bytes()
}
