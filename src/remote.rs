use std::future::Future;

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::models::{CompletionPatch, CreateTodo, NewList, Todo, TodoList};

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} answered {status}")]
    Status { status: u16, url: String },
    #[error("base url {0} cannot carry path segments")]
    BaseUrl(Url),
}

/// The hosted CRUD API holding lists and their tasks.
pub trait RemoteStore: Send + Sync {
    fn fetch_lists(&self) -> impl Future<Output = Result<Vec<TodoList>, RemoteError>> + Send;

    fn fetch_todos(
        &self,
        list_id: &str,
    ) -> impl Future<Output = Result<Vec<Todo>, RemoteError>> + Send;

    fn create_list(
        &self,
        list: &NewList,
    ) -> impl Future<Output = Result<TodoList, RemoteError>> + Send;

    fn create_todo(
        &self,
        list_id: &str,
        todo: &CreateTodo,
    ) -> impl Future<Output = Result<Todo, RemoteError>> + Send;

    fn set_completed(
        &self,
        list_id: &str,
        todo_id: &str,
        completed: bool,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    fn delete_todo(
        &self,
        list_id: &str,
        todo_id: &str,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

pub struct HttpRemote {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRemote {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl RemoteStore for HttpRemote {
    async fn fetch_lists(&self) -> Result<Vec<TodoList>, RemoteError> {
        let url = self.endpoint(&["todoLists"])?;
        decode(self.client.get(url).send().await?).await
    }

    async fn fetch_todos(&self, list_id: &str) -> Result<Vec<Todo>, RemoteError> {
        let url = self.endpoint(&["todoLists", list_id, "todos"])?;
        decode(self.client.get(url).send().await?).await
    }

    async fn create_list(&self, list: &NewList) -> Result<TodoList, RemoteError> {
        let url = self.endpoint(&["todoLists"])?;
        decode(self.client.post(url).json(list).send().await?).await
    }

    async fn create_todo(&self, list_id: &str, todo: &CreateTodo) -> Result<Todo, RemoteError> {
        let url = self.endpoint(&["todoLists", list_id, "todos"])?;
        decode(self.client.post(url).json(todo).send().await?).await
    }

    async fn set_completed(
        &self,
        list_id: &str,
        todo_id: &str,
        completed: bool,
    ) -> Result<(), RemoteError> {
        let url = self.endpoint(&["todoLists", list_id, "todos", todo_id])?;
        let response = self
            .client
            .put(url)
            .json(&CompletionPatch { completed })
            .send()
            .await?;
        ensure_success(response).map(drop)
    }

    async fn delete_todo(&self, list_id: &str, todo_id: &str) -> Result<(), RemoteError> {
        let url = self.endpoint(&["todoLists", list_id, "todos", todo_id])?;
        ensure_success(self.client.delete(url).send().await?).map(drop)
    }
}

fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RemoteError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    Ok(ensure_success(response)?.json().await?)
}
