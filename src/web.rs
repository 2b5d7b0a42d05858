use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::warn;

use crate::forms::{ListForm, TodoForm};
use crate::pages::{render_landing, render_lists, ListsPage, Rejected};
use crate::remote::HttpRemote;
use crate::store::TodoStore;
use crate::view::{SearchQueries, StatusFilter};

/// Filter, search and form state of the single page session.
#[derive(Debug, Default)]
pub struct UiState {
    pub filter: StatusFilter,
    pub queries: SearchQueries,
    pub open_form: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TodoStore<HttpRemote>>,
    pub ui: Arc<RwLock<UiState>>,
}

impl AppState {
    pub fn new(store: TodoStore<HttpRemote>) -> Self {
        Self {
            store: Arc::new(store),
            ui: Arc::new(RwLock::new(UiState::default())),
        }
    }

    /// Runs a full load in the background; the lists page shows the loading
    /// indicator until it completes.
    pub fn spawn_load(&self) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(err) = store.load_all().await {
                warn!(error = %err, "failed to load todo lists");
            }
        });
    }
}

#[derive(Deserialize)]
struct FilterForm {
    status: StatusFilter,
}

#[derive(Deserialize)]
struct SearchForm {
    #[serde(default)]
    query: String,
}

#[derive(Deserialize)]
struct ToggleForm {
    completed: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/lists", get(lists).post(create_list))
        .route("/lists/reload", post(reload))
        .route("/lists/filter", post(set_filter))
        .route("/lists/form/close", post(close_form))
        .route("/lists/:list_id/search", post(set_search))
        .route("/lists/:list_id/form", post(open_form))
        .route("/lists/:list_id/todos", post(add_todo))
        .route("/lists/:list_id/todos/:todo_id/toggle", post(toggle_todo))
        .route("/lists/:list_id/todos/:todo_id/delete", post(delete_todo))
        .with_state(state)
}

async fn index() -> Html<String> {
    Html(render_landing())
}

async fn lists(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state, None).await)
}

async fn create_list(State(state): State<AppState>, Form(form): Form<ListForm>) -> Response {
    let list = match form.validate() {
        Ok(list) => list,
        Err(error) => {
            let rejected = Rejected::List {
                form: &form,
                error: &error,
            };
            return invalid(render_page(&state, Some(rejected)).await);
        }
    };

    if let Err(err) = state.store.create_list(list).await {
        warn!(error = %err, "failed to create todo list");
    }
    redirect_lists()
}

async fn reload(State(state): State<AppState>) -> Response {
    state.store.begin_reload().await;
    state.spawn_load();
    redirect_lists()
}

async fn set_filter(State(state): State<AppState>, Form(form): Form<FilterForm>) -> Response {
    state.ui.write().await.filter = form.status;
    redirect_lists()
}

async fn set_search(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    Form(form): Form<SearchForm>,
) -> Response {
    state.ui.write().await.queries.set(&list_id, &form.query);
    redirect_lists()
}

async fn open_form(State(state): State<AppState>, Path(list_id): Path<String>) -> Response {
    state.ui.write().await.open_form = Some(list_id);
    redirect_lists()
}

async fn close_form(State(state): State<AppState>) -> Response {
    state.ui.write().await.open_form = None;
    redirect_lists()
}

async fn add_todo(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    Form(form): Form<TodoForm>,
) -> Response {
    let todo = match form.validate() {
        Ok(todo) => todo,
        Err(error) => {
            let rejected = Rejected::Todo {
                list_id: &list_id,
                form: &form,
                error: &error,
            };
            return invalid(render_page(&state, Some(rejected)).await);
        }
    };

    match state.store.add_todo(&list_id, todo).await {
        Ok(_) => state.ui.write().await.open_form = None,
        Err(err) => warn!(%list_id, error = %err, "failed to add todo"),
    }
    redirect_lists()
}

async fn toggle_todo(
    State(state): State<AppState>,
    Path((list_id, todo_id)): Path<(String, String)>,
    Form(form): Form<ToggleForm>,
) -> Response {
    if let Err(err) = state
        .store
        .toggle_completion(&list_id, &todo_id, form.completed)
        .await
    {
        warn!(%list_id, %todo_id, error = %err, "failed to update todo completion");
    }
    redirect_lists()
}

async fn delete_todo(
    State(state): State<AppState>,
    Path((list_id, todo_id)): Path<(String, String)>,
) -> Response {
    if let Err(err) = state.store.delete_todo(&list_id, &todo_id).await {
        warn!(%list_id, %todo_id, error = %err, "failed to delete todo");
    }
    redirect_lists()
}

async fn render_page(state: &AppState, rejected: Option<Rejected<'_>>) -> String {
    let snapshot = state.store.snapshot().await;
    let ui = state.ui.read().await;
    render_lists(&ListsPage {
        state: &snapshot,
        filter: ui.filter,
        queries: &ui.queries,
        open_form: ui.open_form.as_deref(),
        rejected,
    })
}

fn invalid(body: String) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response()
}

fn redirect_lists() -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, "/lists")]).into_response()
}
