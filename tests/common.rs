// tests/common.rs
#![allow(dead_code)] // Each integration test uses a different subset of these helpers.

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use repofetch::{AzureProvider, ResolverConfig, ResolverConfigBuilder};
use serde_json::json;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::process::Command;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const REPO_URL: &str = "https://org@dev.azure.com/org/proj/_git/repo";
pub const MAIN: &str = "refs/heads/main";
pub const ROOT_OBJECT_ID: &str = "4b825dc6";
pub const COMMIT_ID: &str = "c0ffee00";

// Helper function to get the binary command
pub fn repofetch_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("repofetch"))
}

/// Shared, mutable behaviour of the mock Azure DevOps server.
pub struct MockState {
    pub refs: Mutex<Vec<String>>,
    /// `None` answers the items call with an empty `value` array.
    pub root_item: Mutex<Option<(String, String)>>,
    pub tree_paths: Mutex<Vec<String>>,
    pub zip: Mutex<Vec<u8>>,

    pub refs_status: Mutex<StatusCode>,
    pub items_status: Mutex<StatusCode>,
    pub tree_status: Mutex<StatusCode>,
    pub download_status: Mutex<StatusCode>,
    /// When set, the refs endpoint never answers.
    pub hang: AtomicBool,
    /// Endpoints ("refs", "items", "tree") answering 200 with an HTML page.
    pub html_endpoints: Mutex<Vec<&'static str>>,

    pub refs_hits: AtomicUsize,
    pub items_hits: AtomicUsize,
    pub tree_hits: AtomicUsize,
    pub download_hits: AtomicUsize,

    pub last_authorization: Mutex<Option<String>>,
    pub last_items_query: Mutex<HashMap<String, String>>,
    pub last_tree_object_id: Mutex<Option<String>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            refs: Mutex::new(vec![
                "HEAD".to_string(),
                MAIN.to_string(),
                "refs/heads/dev".to_string(),
                "refs/tags/v1.0".to_string(),
            ]),
            root_item: Mutex::new(Some((ROOT_OBJECT_ID.to_string(), COMMIT_ID.to_string()))),
            tree_paths: Mutex::new(vec![
                "/docker-compose.yml".to_string(),
                "/README.md".to_string(),
                "/stacks/web.yml".to_string(),
                "/stacks/web.YML".to_string(),
            ]),
            zip: Mutex::new(build_zip(&[("docker-compose.yml", "services: {}")])),
            refs_status: Mutex::new(StatusCode::OK),
            items_status: Mutex::new(StatusCode::OK),
            tree_status: Mutex::new(StatusCode::OK),
            download_status: Mutex::new(StatusCode::OK),
            hang: AtomicBool::new(false),
            html_endpoints: Mutex::new(Vec::new()),
            refs_hits: AtomicUsize::new(0),
            items_hits: AtomicUsize::new(0),
            tree_hits: AtomicUsize::new(0),
            download_hits: AtomicUsize::new(0),
            last_authorization: Mutex::new(None),
            last_items_query: Mutex::new(HashMap::new()),
            last_tree_object_id: Mutex::new(None),
        }
    }
}

impl MockState {
    pub fn hits(&self) -> (usize, usize, usize) {
        (
            self.refs_hits.load(Ordering::SeqCst),
            self.items_hits.load(Ordering::SeqCst),
            self.tree_hits.load(Ordering::SeqCst),
        )
    }

    pub fn set_status(&self, slot: &Mutex<StatusCode>, status: StatusCode) {
        *slot.lock().unwrap() = status;
    }

    /// The sign-in page a proxy or an expired session serves with a 200.
    fn html_page(&self, endpoint: &str) -> Option<Response> {
        self.html_endpoints
            .lock()
            .unwrap()
            .contains(&endpoint)
            .then(|| {
                (
                    [("content-type", "text/html")],
                    "<html><body>Sign in</body></html>",
                )
                    .into_response()
            })
    }

    fn record_auth(&self, headers: &HeaderMap) {
        *self.last_authorization.lock().unwrap() = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }
}

/// A local stand-in for the Azure DevOps Git REST API.
pub struct MockAzure {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockAzure {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/:org/:project/_apis/git/repositories/:repo/refs", get(refs))
            .route("/:org/:project/_apis/git/repositories/:repo/items", get(items))
            .route(
                "/:org/:project/_apis/git/repositories/:repo/trees/:object_id",
                get(tree),
            )
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    pub fn config(&self, cache_enabled: bool) -> ResolverConfig {
        ResolverConfigBuilder::new()
            .base_url(self.base_url.clone())
            .cache_enabled(cache_enabled)
            .use_env_proxy(false)
            .build()
            .unwrap()
    }

    pub fn provider(&self) -> AzureProvider {
        AzureProvider::new(&self.config(true)).unwrap()
    }
}

async fn refs(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.refs_hits.fetch_add(1, Ordering::SeqCst);
    state.record_auth(&headers);
    if state.hang.load(Ordering::SeqCst) {
        std::future::pending::<()>().await;
    }
    let status = *state.refs_status.lock().unwrap();
    if status != StatusCode::OK {
        return status.into_response();
    }
    if let Some(page) = state.html_page("refs") {
        return page;
    }
    let value: Vec<_> = state
        .refs
        .lock()
        .unwrap()
        .iter()
        .map(|name| json!({ "name": name, "objectId": "0000", "url": "ignored" }))
        .collect();
    Json(json!({ "count": value.len(), "value": value })).into_response()
}

async fn items(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record_auth(&headers);
    if query.get("download").map(String::as_str) == Some("true") {
        state.download_hits.fetch_add(1, Ordering::SeqCst);
        let status = *state.download_status.lock().unwrap();
        if status != StatusCode::OK {
            return status.into_response();
        }
        let body = state.zip.lock().unwrap().clone();
        return ([("content-type", "application/zip")], body).into_response();
    }

    state.items_hits.fetch_add(1, Ordering::SeqCst);
    *state.last_items_query.lock().unwrap() = query;
    let status = *state.items_status.lock().unwrap();
    if status != StatusCode::OK {
        return status.into_response();
    }
    if let Some(page) = state.html_page("items") {
        return page;
    }
    let root_item = state.root_item.lock().unwrap().clone();
    let value = match root_item {
        Some((object_id, commit_id)) => vec![json!({
            "objectId": object_id,
            "commitId": commit_id,
            "path": "/",
            "gitObjectType": "tree",
            "isFolder": true,
        })],
        None => vec![],
    };
    Json(json!({ "count": value.len(), "value": value })).into_response()
}

async fn tree(
    State(state): State<Arc<MockState>>,
    Path((_org, _project, _repo, object_id)): Path<(String, String, String, String)>,
    headers: HeaderMap,
) -> Response {
    state.tree_hits.fetch_add(1, Ordering::SeqCst);
    state.record_auth(&headers);
    *state.last_tree_object_id.lock().unwrap() = Some(object_id.clone());
    let status = *state.tree_status.lock().unwrap();
    if status != StatusCode::OK {
        return status.into_response();
    }
    if let Some(page) = state.html_page("tree") {
        return page;
    }
    let entries: Vec<_> = state
        .tree_paths
        .lock()
        .unwrap()
        .iter()
        .map(|p| json!({ "relativePath": p, "gitObjectType": "blob", "mode": "100644" }))
        .collect();
    Json(json!({ "objectId": object_id, "treeEntries": entries })).into_response()
}

/// Builds an in-memory zip archive from `(name, content)` pairs.
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
