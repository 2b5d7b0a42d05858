//! In-memory mirror of the remote lists and the operations that keep it in step
//! with the remote store.
//!
//! Every mutation goes to the remote first; the mirror is patched only once the
//! remote confirmed it. Failures are handed back to the caller and the mirror is
//! left untouched.

use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::{CreateTodo, NewList, NewTodo, Todo, TodoList};
use crate::remote::{RemoteError, RemoteStore};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("task title is empty")]
    EmptyTitle,
}

/// Snapshot of everything the lists page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoState {
    pub lists: Vec<TodoList>,
    pub loading: bool,
}

impl Default for TodoState {
    fn default() -> Self {
        Self {
            lists: Vec::new(),
            loading: true,
        }
    }
}

impl TodoState {
    pub fn list(&self, list_id: &str) -> Option<&TodoList> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    pub fn replace_lists(&mut self, lists: Vec<TodoList>) {
        self.lists = lists;
        self.loading = false;
    }

    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    pub fn push_list(&mut self, list: TodoList) {
        self.lists.push(list);
    }

    pub fn push_todo(&mut self, list_id: &str, todo: Todo) {
        if let Some(list) = self.list_mut(list_id) {
            list.todos.get_or_insert_with(Vec::new).push(todo);
        }
    }

    pub fn remove_todo(&mut self, list_id: &str, todo_id: &str) {
        if let Some(todos) = self.list_mut(list_id).and_then(|list| list.todos.as_mut()) {
            todos.retain(|todo| todo.id != todo_id);
        }
    }

    pub fn set_completed(&mut self, list_id: &str, todo_id: &str, completed: bool) {
        let todo = self
            .list_mut(list_id)
            .and_then(|list| list.todos.as_mut())
            .and_then(|todos| todos.iter_mut().find(|todo| todo.id == todo_id));
        if let Some(todo) = todo {
            todo.completed = completed;
        }
    }

    fn list_mut(&mut self, list_id: &str) -> Option<&mut TodoList> {
        self.lists.iter_mut().find(|list| list.id == list_id)
    }
}

pub struct TodoStore<R> {
    remote: R,
    state: RwLock<TodoState>,
}

impl<R: RemoteStore> TodoStore<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            state: RwLock::new(TodoState::default()),
        }
    }

    pub async fn snapshot(&self) -> TodoState {
        self.state.read().await.clone()
    }

    pub async fn begin_reload(&self) {
        self.state.write().await.loading = true;
    }

    /// Replaces the mirror with the remote contents.
    ///
    /// Task fetches run concurrently, one per list. A list whose tasks cannot be
    /// fetched is kept with no tasks. Only a failure to fetch the lists
    /// themselves is returned, and in that case the mirror keeps its previous
    /// contents. The loading flag is cleared either way.
    #[tracing::instrument(skip(self))]
    pub async fn load_all(&self) -> Result<(), SyncError> {
        let lists = match self.remote.fetch_lists().await {
            Ok(lists) => lists,
            Err(err) => {
                self.state.write().await.finish_loading();
                return Err(err.into());
            }
        };

        let merged = join_all(lists.into_iter().map(|list| async move {
            match self.remote.fetch_todos(&list.id).await {
                Ok(todos) => list.with_todos(todos),
                Err(err) => {
                    warn!(list_id = %list.id, error = %err, "failed to load todos for list");
                    list.with_todos(Vec::new())
                }
            }
        }))
        .await;

        info!(lists = merged.len(), "loaded todo lists");
        self.state.write().await.replace_lists(merged);
        Ok(())
    }

    pub async fn create_list(&self, list: NewList) -> Result<TodoList, SyncError> {
        let created = self.remote.create_list(&list).await?;
        debug!(list_id = %created.id, "created todo list");
        self.state.write().await.push_list(created.clone());
        Ok(created)
    }

    pub async fn add_todo(&self, list_id: &str, todo: NewTodo) -> Result<Todo, SyncError> {
        if todo.title.trim().is_empty() {
            return Err(SyncError::EmptyTitle);
        }

        let body = CreateTodo::new(list_id, todo);
        let created = self.remote.create_todo(list_id, &body).await?;
        debug!(list_id, todo_id = %created.id, "added todo");
        self.state.write().await.push_todo(list_id, created.clone());
        Ok(created)
    }

    pub async fn delete_todo(&self, list_id: &str, todo_id: &str) -> Result<(), SyncError> {
        self.remote.delete_todo(list_id, todo_id).await?;
        debug!(list_id, todo_id, "deleted todo");
        self.state.write().await.remove_todo(list_id, todo_id);
        Ok(())
    }

    /// Sends the inverse of `current` and returns the new completion flag.
    pub async fn toggle_completion(
        &self,
        list_id: &str,
        todo_id: &str,
        current: bool,
    ) -> Result<bool, SyncError> {
        let completed = !current;
        self.remote.set_completed(list_id, todo_id, completed).await?;
        debug!(list_id, todo_id, completed, "updated todo completion");
        self.state
            .write()
            .await
            .set_completed(list_id, todo_id, completed);
        Ok(completed)
    }
}
