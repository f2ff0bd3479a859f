//! Shared test utilities: an in-process mirror server and client builders

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::Router;
use serde_json::{json, Value};

use guji_index::app::{
    ClientConfig, DataSource, FetchConfig, Mirror, MirrorClient, MirrorResolver, PathLayout,
    RepoKind,
};

/// Canned response for one request path
#[derive(Debug, Clone)]
struct Route {
    status: StatusCode,
    body: String,
    delay: Duration,
}

#[derive(Debug, Default)]
struct MockState {
    routes: Mutex<HashMap<String, Route>>,
    hits: Mutex<HashMap<String, usize>>,
}

/// HTTP server standing in for every mirror; each mirror gets its own path prefix
pub struct MockMirror {
    addr: SocketAddr,
    state: Arc<MockState>,
    task: tokio::task::JoinHandle<()>,
}

impl MockMirror {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(serve).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Serve `body` with `status` at `path`
    pub fn route(&self, path: &str, status: u16, body: impl Into<String>) {
        self.route_delayed(path, status, body, Duration::ZERO);
    }

    /// Serve `body` with `status` at `path` after sleeping for `delay`
    pub fn route_delayed(&self, path: &str, status: u16, body: impl Into<String>, delay: Duration) {
        let route = Route {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.into(),
            delay,
        };
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(path.to_string(), route);
    }

    /// Serve `doc` as JSON at `path`
    pub fn route_json(&self, path: &str, doc: &Value) {
        self.route(path, 200, doc.to_string());
    }

    /// Number of requests received for `path`
    pub fn hits(&self, path: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Total number of requests received
    pub fn total_hits(&self) -> usize {
        self.state.hits.lock().unwrap().values().sum()
    }

    /// A jsDelivr-style mirror rooted at `/{prefix}` on this server
    pub fn mirror(&self, prefix: &str) -> Mirror {
        Mirror::new(
            prefix,
            &format!("{}/{}", self.base_url(), prefix),
            PathLayout::Jsdelivr,
        )
        .expect("valid mirror")
    }

    /// A raw.githubusercontent-style mirror rooted at `/{prefix}` on this server
    pub fn raw_mirror(&self, prefix: &str) -> Mirror {
        Mirror::new(
            prefix,
            &format!("{}/{}", self.base_url(), prefix),
            PathLayout::Raw,
        )
        .expect("valid mirror")
    }
}

impl Drop for MockMirror {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(State(state): State<Arc<MockState>>, uri: Uri) -> (StatusCode, String) {
    let path = uri.path().to_string();
    *state.hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let route = state.routes.lock().unwrap().get(&path).cloned();
    match route {
        Some(route) => {
            if !route.delay.is_zero() {
                tokio::time::sleep(route.delay).await;
            }
            (route.status, route.body)
        }
        None => (StatusCode::NOT_FOUND, format!("no route for {}", path)),
    }
}

/// Path of the index document of `repo` under a jsDelivr-style mirror prefix
pub fn index_path(prefix: &str, repo: RepoKind) -> String {
    content_path(prefix, repo, "index.json")
}

/// Path of a repository file under a jsDelivr-style mirror prefix
pub fn content_path(prefix: &str, repo: RepoKind, path: &str) -> String {
    format!("/{}/open-guji/{}@main/{}", prefix, repo.repo_name(), path)
}

/// Path of a repository file under a raw-style mirror prefix
pub fn raw_path(prefix: &str, repo: RepoKind, path: &str) -> String {
    format!("/{}/open-guji/{}/main/{}", prefix, repo.repo_name(), path)
}

/// Base URL of a mirror nobody listens on
pub async fn closed_mirror(prefix: &str) -> Mirror {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    Mirror::new(
        prefix,
        &format!("http://{}/{}", addr, prefix),
        PathLayout::Jsdelivr,
    )
    .expect("valid mirror")
}

/// Short per-attempt timeouts so timeout fallbacks stay fast
pub fn fast_fetch_config() -> FetchConfig {
    FetchConfig {
        index_timeout: Duration::from_millis(300),
        content_primary_timeout: Duration::from_millis(300),
        content_fallback_timeout: Duration::from_millis(600),
    }
}

/// Client that bypasses any system proxy and barely rate limits
pub fn local_client_config() -> ClientConfig {
    ClientConfig {
        use_system_proxy: false,
        rate_limit_rps: 1000,
        connect_timeout: Duration::from_secs(1),
        ..Default::default()
    }
}

/// Client whose CDN source is `/primary` then `/secondary` and whose GitHub
/// source is `/gh-raw` then `/gh-cdn`, all on `mock`
pub fn mock_client(mock: &MockMirror) -> MirrorClient {
    mock_client_with(mock, fast_fetch_config())
}

pub fn mock_client_with(mock: &MockMirror, fetch_config: FetchConfig) -> MirrorClient {
    let resolver = MirrorResolver::new()
        .with_mirrors(
            DataSource::Cdn,
            vec![mock.mirror("primary"), mock.mirror("secondary")],
        )
        .expect("two mirrors")
        .with_mirrors(
            DataSource::GitHub,
            vec![mock.raw_mirror("gh-raw"), mock.mirror("gh-cdn")],
        )
        .expect("two mirrors");

    MirrorClient::with_config(local_client_config(), fetch_config)
        .expect("client")
        .with_resolver(resolver)
}

/// Client whose mirrors are given explicitly for the CDN source
pub fn client_with_cdn_mirrors(mirrors: Vec<Mirror>) -> MirrorClient {
    let resolver = MirrorResolver::new()
        .with_mirrors(DataSource::Cdn, mirrors)
        .expect("two mirrors");

    MirrorClient::with_config(local_client_config(), fast_fetch_config())
        .expect("client")
        .with_resolver(resolver)
}

pub fn book(id: &str, title: &str) -> Value {
    json!({ "id": id, "title": title, "path": format!("books/{}.md", id) })
}

pub fn collection(id: &str, title: &str) -> Value {
    json!({ "id": id, "title": title, "path": format!("collections/{}.md", id) })
}

pub fn work(id: &str, title: &str) -> Value {
    json!({ "id": id, "title": title, "path": format!("works/{}.md", id) })
}

/// An index document with the given record arrays
pub fn index_doc(books: Vec<Value>, collections: Vec<Value>, works: Vec<Value>) -> Value {
    json!({ "books": books, "collections": collections, "works": works })
}
