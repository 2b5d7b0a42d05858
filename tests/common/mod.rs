//! In-process stand-in for the hosted todo API, plus helpers to run the app
//! against it.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use reqwest::Url;
use serde_json::{json, Value};
use todolists::remote::HttpRemote;
use todolists::store::TodoStore;
use todolists::web::{router, AppState};
use tokio::net::TcpListener;

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct MockData {
    pub lists: Vec<Value>,
    pub todos: HashMap<String, Vec<Value>>,
    pub broken_lists: HashSet<String>,
    pub fail_writes: bool,
    pub requests: Vec<Recorded>,
    next_id: u64,
}

impl MockData {
    /// Two lists: "Home" with one open and one finished task, "Work" with one
    /// open task.
    pub fn seeded() -> Self {
        Self {
            lists: vec![
                json!({ "id": "1", "name": "Home", "createdAt": 1728000000 }),
                json!({ "id": "2", "name": "Work", "createdAt": 1728000001 }),
            ],
            todos: HashMap::from([
                (
                    "1".to_string(),
                    vec![
                        json!({ "id": "10", "title": "Buy milk", "completed": false, "todoListId": "1" }),
                        json!({ "id": "11", "title": "Pay rent", "description": "landlord", "completed": true, "todoListId": "1", "deadline": "2025-03-01T10:00" }),
                    ],
                ),
                (
                    "2".to_string(),
                    vec![json!({ "id": "20", "title": "Write report", "completed": false, "todoListId": "2" })],
                ),
            ]),
            next_id: 100,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn record(&mut self, method: &'static str, path: String, body: Option<Value>) {
        self.requests.push(Recorded { method, path, body });
    }
}

pub type Shared = Arc<Mutex<MockData>>;

pub struct MockApi {
    pub base: Url,
    pub data: Shared,
}

impl MockApi {
    pub fn requests(&self) -> Vec<Recorded> {
        self.data.lock().unwrap().requests.clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.data.lock().unwrap().fail_writes = fail;
    }
}

pub async fn spawn_mock_api(data: MockData) -> MockApi {
    let data: Shared = Arc::new(Mutex::new(data));
    let app = Router::new()
        .route("/api/todoLists", get(get_lists).post(post_list))
        .route("/api/todoLists/:list_id/todos", get(get_todos).post(post_todo))
        .route(
            "/api/todoLists/:list_id/todos/:todo_id",
            put(put_todo).delete(delete_todo),
        )
        .with_state(Arc::clone(&data));
    let addr = serve(app).await;
    MockApi {
        base: Url::parse(&format!("http://{addr}/api")).unwrap(),
        data,
    }
}

pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub struct TestApp {
    pub url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.url))
            .send()
            .await
            .unwrap()
    }

    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.url))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    pub async fn page(&self) -> String {
        self.get("/lists").await.text().await.unwrap()
    }
}

/// Serves the app against `api` with the initial load already finished.
pub async fn spawn_app(api: &MockApi) -> TestApp {
    let state = AppState::new(TodoStore::new(HttpRemote::new(api.base.clone())));
    state.store.load_all().await.unwrap();
    let addr = serve(router(state.clone())).await;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    TestApp {
        url: format!("http://{addr}"),
        state,
        client,
    }
}

fn failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "failure").into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "\"Not found\"").into_response()
}

async fn get_lists(State(data): State<Shared>) -> Response {
    let mut data = data.lock().unwrap();
    data.record("GET", "/todoLists".into(), None);
    Json(data.lists.clone()).into_response()
}

async fn post_list(State(data): State<Shared>, Json(mut body): Json<Value>) -> Response {
    let mut data = data.lock().unwrap();
    data.record("POST", "/todoLists".into(), Some(body.clone()));
    if data.fail_writes {
        return failure();
    }
    body["id"] = json!(data.next_id());
    data.lists.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn get_todos(State(data): State<Shared>, Path(list_id): Path<String>) -> Response {
    let mut data = data.lock().unwrap();
    data.record("GET", format!("/todoLists/{list_id}/todos"), None);
    if data.broken_lists.contains(&list_id) {
        return not_found();
    }
    Json(data.todos.get(&list_id).cloned().unwrap_or_default()).into_response()
}

async fn post_todo(
    State(data): State<Shared>,
    Path(list_id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut data = data.lock().unwrap();
    data.record("POST", format!("/todoLists/{list_id}/todos"), Some(body.clone()));
    if data.fail_writes {
        return failure();
    }
    body["id"] = json!(data.next_id());
    data.todos.entry(list_id).or_default().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn put_todo(
    State(data): State<Shared>,
    Path((list_id, todo_id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> Response {
    let mut data = data.lock().unwrap();
    data.record(
        "PUT",
        format!("/todoLists/{list_id}/todos/{todo_id}"),
        Some(patch.clone()),
    );
    if data.fail_writes {
        return failure();
    }
    let todo = data
        .todos
        .get_mut(&list_id)
        .and_then(|todos| todos.iter_mut().find(|todo| todo["id"] == todo_id.as_str()));
    match todo {
        Some(todo) => {
            if let (Some(todo), Some(patch)) = (todo.as_object_mut(), patch.as_object()) {
                todo.extend(patch.clone());
            }
            Json(todo.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_todo(
    State(data): State<Shared>,
    Path((list_id, todo_id)): Path<(String, String)>,
) -> Response {
    let mut data = data.lock().unwrap();
    data.record("DELETE", format!("/todoLists/{list_id}/todos/{todo_id}"), None);
    if data.fail_writes {
        return failure();
    }
    let Some(todos) = data.todos.get_mut(&list_id) else {
        return not_found();
    };
    match todos.iter().position(|todo| todo["id"] == todo_id.as_str()) {
        Some(index) => Json(todos.remove(index)).into_response(),
        None => not_found(),
    }
}
