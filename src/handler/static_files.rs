//! Static file serving module
//!
//! Resolves a request path inside a route's directory, loads the file, and
//! runs the freshness evaluator over it. Any precondition halt propagates to
//! the router, which answers with the headers gathered so far.

use crate::config::RouteConfig;
use crate::freshness::{EtagOptions, Freshness, Halt};
use crate::handler::router::RequestContext;
use crate::http::directives::DirectiveSet;
use crate::http::etag::Etag;
use crate::http::mime;
use crate::logger;
use chrono::{DateTime, Utc};
use hyper::body::Bytes;
use hyper::HeaderMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A file ready to be sent
#[derive(Debug)]
pub struct StaticFile {
    pub data: Bytes,
    pub content_type: &'static str,
    pub modified: Option<DateTime<Utc>>,
}

/// Serve a file from `route`, shaping freshness headers into `headers`
///
/// Returns `Ok(None)` when no file exists for the path.
pub async fn serve(
    ctx: &RequestContext<'_>,
    route: &RouteConfig,
    defaults: &DirectiveSet,
    headers: &mut HeaderMap,
) -> Result<Option<StaticFile>, Halt> {
    let Some(path) = resolve(&route.dir, ctx.path, &route.prefix, &route.index_files).await else {
        return Ok(None);
    };
    let Some(file) = load(&path).await else {
        return Ok(None);
    };

    let mut fresh = Freshness::new(ctx.method, ctx.headers, headers).with_defaults(defaults);

    match route.expires {
        Some(secs) => fresh.expires(secs, &DirectiveSet::new())?,
        None => fresh.cache_control(&DirectiveSet::new())?,
    }
    if route.last_modified {
        fresh.last_modified(file.modified)?;
    }
    let etag = Etag::from_content(&file.data);
    fresh.etag(&etag.value, EtagOptions::default().kind(route.etag))?;

    Ok(Some(file))
}

/// Map a request path to a file inside `dir`
///
/// Directories resolve to their first existing index file. Paths that climb
/// out of `dir` (directly or through symlinks) resolve to nothing.
pub async fn resolve(
    dir: &str,
    request_path: &str,
    route_prefix: &str,
    index_files: &[String],
) -> Option<PathBuf> {
    let relative = request_path
        .strip_prefix(route_prefix.trim_end_matches('/'))
        .unwrap_or(request_path)
        .trim_start_matches('/');

    if relative.split('/').any(|segment| segment == "..") {
        logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
        return None;
    }

    let root = match fs::canonicalize(dir).await {
        Ok(root) => root,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{dir}': {e}"
            ));
            return None;
        }
    };

    let mut candidate = root.join(relative);
    if fs::metadata(&candidate).await.ok()?.is_dir() {
        candidate = find_index(&candidate, index_files).await?;
    }

    // File not found is common (404), no need to log
    let canonical = fs::canonicalize(&candidate).await.ok()?;
    if !canonical.starts_with(&root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            canonical.display()
        ));
        return None;
    }
    Some(canonical)
}

async fn find_index(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for name in index_files {
        let path = dir.join(name);
        if fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            return Some(path);
        }
    }
    None
}

async fn load(path: &Path) -> Option<StaticFile> {
    let data = match fs::read(path).await {
        Ok(data) => data,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return None;
        }
    };
    let modified = fs::metadata(path)
        .await
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);

    Some(StaticFile {
        data: Bytes::from(data),
        content_type: mime::content_type(path),
        modified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string()]
    }

    #[tokio::test]
    async fn test_resolve_file_and_index() {
        let dir = tempfile::tempdir().unwrap();
        std_fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std_fs::create_dir(dir.path().join("docs")).unwrap();
        std_fs::write(dir.path().join("docs/guide.txt"), "guide").unwrap();
        let root = dir.path().to_str().unwrap();

        let found = resolve(root, "/static/docs/guide.txt", "/static", &index_files()).await;
        assert!(found.unwrap().ends_with("docs/guide.txt"));

        let index = resolve(root, "/static/", "/static", &index_files()).await;
        assert!(index.unwrap().ends_with("index.html"));

        let index = resolve(root, "/static", "/static", &index_files()).await;
        assert!(index.unwrap().ends_with("index.html"));
    }

    #[tokio::test]
    async fn test_resolve_missing_and_traversal() {
        let dir = tempfile::tempdir().unwrap();
        std_fs::create_dir(dir.path().join("empty")).unwrap();
        let root = dir.path().to_str().unwrap();

        assert!(resolve(root, "/nope.txt", "/", &index_files()).await.is_none());
        assert!(resolve(root, "/empty/", "/", &index_files()).await.is_none());
        assert!(resolve(root, "/../etc/passwd", "/", &index_files()).await.is_none());
        assert!(resolve("/definitely/not/here", "/", "/", &index_files()).await.is_none());
    }

    #[tokio::test]
    async fn test_load_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.css");
        std_fs::write(&path, "body{}").unwrap();

        let file = load(&path).await.unwrap();
        assert_eq!(file.data, Bytes::from_static(b"body{}"));
        assert_eq!(file.content_type, "text/css; charset=utf-8");
        assert!(file.modified.is_some());
    }
}
