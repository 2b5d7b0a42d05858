use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<Todo>>,
}

impl TodoList {
    pub fn with_todos(self, todos: Vec<Todo>) -> Self {
        Self {
            todos: Some(todos),
            ..self
        }
    }

    /// Tasks in append order; a list whose tasks were never fetched has none.
    pub fn todos(&self) -> &[Todo] {
        self.todos.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub todo_list_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

/// Body of a list creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewList {
    pub name: String,
}

/// User input for a new task, before it is bound to a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<String>,
}

/// Body of a task creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub todo_list_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl CreateTodo {
    pub fn new(list_id: &str, todo: NewTodo) -> Self {
        Self {
            title: todo.title,
            description: todo.description,
            completed: false,
            todo_list_id: list_id.to_string(),
            deadline: todo.deadline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionPatch {
    pub completed: bool,
}
