use serde::Deserialize;

use crate::models::{NewList, NewTodo};

/// Inline message for a form field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FormError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListForm {
    #[serde(default)]
    pub name: String,
}

impl ListForm {
    pub fn validate(&self) -> Result<NewList, FormError> {
        Ok(NewList {
            name: required(&self.name, "name", "List name is required.")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TodoForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deadline: String,
}

impl TodoForm {
    pub fn validate(&self) -> Result<NewTodo, FormError> {
        Ok(NewTodo {
            title: required(&self.title, "title", "Task title is required.")?,
            description: optional(&self.description),
            deadline: optional(&self.deadline),
        })
    }
}

fn required(value: &str, field: &'static str, message: &'static str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError { field, message });
    }
    Ok(value.to_string())
}

fn optional(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}
