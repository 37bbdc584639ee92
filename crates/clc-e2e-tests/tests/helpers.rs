//! Test helpers for E2E tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use clc_cli::commands::register_all;
use clc_cli::{App, CliError};
use clc_plug::{CancelScope, CommandRegistry, Error, InvocationGateway, Row};
use clc_proto::codec::map::{
    MAP_ENTRY_SET_REQUEST, MAP_GET_REQUEST, decode_map_entry_set_request, decode_map_get_request,
    encode_map_entry_set_response, encode_map_get_response,
};
use clc_proto::codec::queue::{
    QUEUE_OFFER_REQUEST, QUEUE_POLL_REQUEST, decode_queue_offer_request,
    decode_queue_poll_request, encode_queue_offer_response, encode_queue_poll_response,
};
use clc_proto::{ClientMessage, Data, Value, serialization};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::subscriber::DefaultGuard;

// ============================================================================
// Command-line driver
// ============================================================================

/// An app with every built-in command, talking to `cluster`.
pub fn app_with(cluster: Arc<FakeCluster>) -> App {
    app().with_gateway(cluster)
}

/// An app with every built-in command and no cluster connection.
pub fn app() -> App {
    let mut registry = CommandRegistry::new();
    register_all(&mut registry).expect("built-in commands register");
    App::new(registry).expect("built-in declarations are valid")
}

/// Parse and run `args` (without the binary name).
pub async fn run(app: &App, args: &[&str]) -> Result<Vec<Row>, CliError> {
    run_scoped(app, args, CancelScope::new()).await
}

/// Parse and run `args` under an explicit cancellation scope.
pub async fn run_scoped(
    app: &App,
    args: &[&str],
    scope: CancelScope,
) -> Result<Vec<Row>, CliError> {
    let argv = std::iter::once("clc").chain(args.iter().copied());
    app.run(argv, scope).await
}

/// Value of the column called `name` in `row`.
pub fn column<'a>(row: &'a Row, name: &str) -> &'a Value {
    &row.iter()
        .find(|c| c.name == name)
        .expect("column present")
        .value
}

/// Serialize a value the way commands do.
pub fn data(value: &Value) -> Data {
    serialization::encode(value).expect("built-in value encodes")
}

// ============================================================================
// In-memory cluster
// ============================================================================

/// Where a request was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Routed by a partition key.
    Key(Data),
    /// Any member.
    Random,
    /// Every member.
    All,
}

/// One request the fake cluster answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Routing used.
    pub target: Target,
    /// Request message type.
    pub message_type: u32,
}

/// A single-member cluster answering the map and queue codecs from memory.
#[derive(Default)]
pub struct FakeCluster {
    maps: Mutex<HashMap<String, Vec<(Data, Data)>>>,
    queues: Mutex<HashMap<String, VecDeque<Data>>>,
    queue_capacity: Option<usize>,
    calls: Mutex<Vec<Call>>,
    stalled: AtomicBool,
}

impl FakeCluster {
    /// An empty cluster.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A cluster whose queues refuse items beyond `capacity`.
    pub fn with_queue_capacity(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            queue_capacity: Some(capacity),
            ..Self::default()
        })
    }

    /// A cluster that never answers.
    pub fn stalled() -> Arc<Self> {
        let cluster = Self::default();
        cluster.stalled.store(true, Ordering::SeqCst);
        Arc::new(cluster)
    }

    /// Store an entry; the key is serialized, the value is stored as given.
    pub fn put(&self, map: &str, key: &Value, value: Data) {
        self.put_data(map, data(key), value);
    }

    /// Store an entry whose key is already serialized.
    pub fn put_data(&self, map: &str, key: Data, value: Data) {
        let mut maps = self.maps.lock();
        let entries = maps.entry(map.to_string()).or_default();
        entries.retain(|(k, _)| *k != key);
        entries.push((key, value));
    }

    /// Items currently in a queue, head first.
    pub fn queue_items(&self, name: &str) -> Vec<Data> {
        self.queues
            .lock()
            .get(name)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every request answered so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn answer(&self, target: Target, request: &ClientMessage) -> clc_plug::Result<ClientMessage> {
        self.calls.lock().push(Call {
            target,
            message_type: request.message_type(),
        });
        match request.message_type() {
            MAP_GET_REQUEST => {
                let req = decode_map_get_request(request)?;
                let maps = self.maps.lock();
                let value = maps
                    .get(&req.name)
                    .and_then(|entries| entries.iter().find(|(k, _)| *k == req.key))
                    .map(|(_, v)| v);
                Ok(encode_map_get_response(value))
            }
            MAP_ENTRY_SET_REQUEST => {
                let name = decode_map_entry_set_request(request)?;
                let maps = self.maps.lock();
                let entries = maps.get(&name).map(Vec::as_slice).unwrap_or_default();
                Ok(encode_map_entry_set_response(entries))
            }
            QUEUE_OFFER_REQUEST => {
                let req = decode_queue_offer_request(request)?;
                let mut queues = self.queues.lock();
                let queue = queues.entry(req.name).or_default();
                let accepted = self.queue_capacity.is_none_or(|cap| queue.len() < cap);
                if accepted {
                    queue.push_back(req.value);
                }
                Ok(encode_queue_offer_response(accepted))
            }
            QUEUE_POLL_REQUEST => {
                let req = decode_queue_poll_request(request)?;
                let item = self
                    .queues
                    .lock()
                    .get_mut(&req.name)
                    .and_then(VecDeque::pop_front);
                Ok(encode_queue_poll_response(item.as_ref()))
            }
            other => Err(Error::Invocation(format!(
                "unsupported message type {other:#x}"
            ))),
        }
    }

    async fn stall_if_asked(&self) {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }
}

impl InvocationGateway for FakeCluster {
    fn invoke_on_key<'a>(
        &'a self,
        request: ClientMessage,
        key: &'a Data,
    ) -> Pin<Box<dyn Future<Output = clc_plug::Result<ClientMessage>> + Send + 'a>>
    {
        Box::pin(async move {
            self.stall_if_asked().await;
            self.answer(Target::Key(key.clone()), &request)
        })
    }

    fn invoke_on_random_target<'a>(
        &'a self,
        request: ClientMessage,
    ) -> Pin<Box<dyn Future<Output = clc_plug::Result<ClientMessage>> + Send + 'a>>
    {
        Box::pin(async move {
            self.stall_if_asked().await;
            self.answer(Target::Random, &request)
        })
    }

    fn invoke_on_all_members<'a>(
        &'a self,
        request: ClientMessage,
    ) -> Pin<
        Box<dyn Future<Output = clc_plug::Result<Vec<ClientMessage>>> + Send + 'a>,
    > {
        Box::pin(async move {
            self.stall_if_asked().await;
            Ok(vec![self.answer(Target::All, &request)?])
        })
    }
}

// ============================================================================
// Local HTTP responder
// ============================================================================

/// A canned response for one method and path.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    path: String,
    status: u16,
    body: String,
}

impl Route {
    /// Answer `GET path`.
    pub fn get(path: &str, status: u16, body: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.to_string(),
            status,
            body: body.into(),
        }
    }

    /// Answer `POST path`.
    pub fn post(path: &str, status: u16, body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            ..Self::get(path, status, body)
        }
    }
}

/// A request the responder received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request target.
    pub path: String,
    /// Headers, names lower-cased.
    pub headers: HashMap<String, String>,
    /// Raw body.
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// The body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone)]
struct StubState {
    routes: Arc<Vec<Route>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Control-plane stand-in on `127.0.0.1:0` answering from a fixed route
/// table. Unknown routes get a 404.
pub struct StubApi {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl StubApi {
    /// Start serving `routes`.
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            routes: Arc::new(routes),
            requests: Arc::clone(&requests),
        };
        let router = Router::new().fallback(answer).with_state(state);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("stub server stopped: {e}");
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// Base URL to point clients at.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn answer(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);
    let (status, reply) = state
        .routes
        .iter()
        .find(|r| r.method == method && r.path == path)
        .map_or((404, "no route".to_string()), |r| (r.status, r.body.clone()));

    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    state.requests.lock().push(RecordedRequest {
        method: method.to_string(),
        path,
        headers,
        body: body.to_vec(),
    });

    let status = StatusCode::from_u16(status).expect("route status is valid");
    (status, [(header::CONTENT_TYPE, "application/json")], reply).into_response()
}

// ============================================================================
// Log capture
// ============================================================================

/// Collects formatted log lines for the current thread.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route this thread's logs here until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Everything logged so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    /// Lines containing `needle`.
    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
