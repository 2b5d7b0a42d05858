use crate::forms::{FormError, ListForm, TodoForm};
use crate::models::{Todo, TodoList};
use crate::store::TodoState;
use crate::view::{format_deadline, visible_todos, SearchQueries, StatusFilter};

const STYLE: &str = r#"
    :root {
      color-scheme: light;
      font-family: "Inter", system-ui, -apple-system, sans-serif;
      background: #f4f5f7;
    }
    body {
      margin: 0;
      padding: 32px;
      display: flex;
      justify-content: center;
    }
    .app {
      width: min(720px, 100%);
      background: #ffffff;
      border-radius: 16px;
      box-shadow: 0 24px 48px rgba(15, 23, 42, 0.08);
      padding: 28px;
    }
    .landing {
      text-align: center;
    }
    h1 {
      margin: 0 0 16px 0;
      font-size: 28px;
      letter-spacing: -0.02em;
    }
    h2 {
      font-size: 18px;
      margin: 24px 0 12px 0;
    }
    .subtitle {
      color: #64748b;
      margin-bottom: 24px;
    }
    form {
      display: flex;
      gap: 12px;
      margin-bottom: 12px;
    }
    form.stacked {
      flex-direction: column;
    }
    input[type="text"], input[type="datetime-local"], select {
      flex: 1;
      padding: 12px 14px;
      border-radius: 10px;
      border: 1px solid #e2e8f0;
      font-size: 15px;
    }
    button, a.button {
      border: none;
      border-radius: 10px;
      padding: 12px 16px;
      background: #111827;
      color: white;
      font-weight: 600;
      cursor: pointer;
      text-decoration: none;
    }
    .error {
      color: #b91c1c;
      font-size: 13px;
    }
    .list {
      padding: 16px;
      margin-bottom: 16px;
      border-radius: 12px;
      background: #f8fafc;
      border: 1px solid #e2e8f0;
    }
    .todo {
      display: flex;
      align-items: center;
      justify-content: space-between;
      padding: 8px 0;
    }
    .todo .meta {
      display: flex;
      flex-direction: column;
      gap: 4px;
    }
    .todo .title {
      font-weight: 600;
    }
    .todo.done .title {
      text-decoration: line-through;
    }
    .todo .time {
      font-size: 12px;
      color: #94a3b8;
    }
    .actions {
      display: flex;
      gap: 8px;
    }
    .actions form {
      margin: 0;
    }
    .actions button {
      background: #e2e8f0;
      color: #0f172a;
      padding: 8px 12px;
    }
    .actions button.delete {
      background: #fee2e2;
      color: #991b1b;
    }
"#;

/// A form that failed validation, shown again with what the user typed.
#[derive(Clone, Copy)]
pub enum Rejected<'a> {
    List {
        form: &'a ListForm,
        error: &'a FormError,
    },
    Todo {
        list_id: &'a str,
        form: &'a TodoForm,
        error: &'a FormError,
    },
}

/// Everything the lists page needs besides the mirror itself.
pub struct ListsPage<'a> {
    pub state: &'a TodoState,
    pub filter: StatusFilter,
    pub queries: &'a SearchQueries,
    pub open_form: Option<&'a str>,
    pub rejected: Option<Rejected<'a>>,
}

pub fn render_landing() -> String {
    page(
        "todolists",
        r#"<div class="app landing">
    <h1>Welcome to the to-do app</h1>
    <a class="button" href="/lists">Open the app</a>
  </div>"#,
    )
}

pub fn render_lists(view: &ListsPage<'_>) -> String {
    let (name, list_error) = match view.rejected {
        Some(Rejected::List { form, error }) => (form.name.as_str(), Some(error)),
        _ => ("", None),
    };

    let mut body = String::new();
    body.push_str(&format!(
        r#"<div class="app">
    <h1>Add a to-do list</h1>
    <form method="post" action="/lists">
      <input type="text" name="name" placeholder="New list name" value="{name}" />
      <button type="submit">Create list</button>
    </form>
"#,
        name = html_escape(name),
    ));
    push_error(&mut body, list_error);

    body.push_str("<h2>Your to-do lists</h2>\n");
    body.push_str(r#"<form method="post" action="/lists/filter"><select name="status">"#);
    for filter in StatusFilter::ALL {
        let selected = if filter == view.filter { " selected" } else { "" };
        body.push_str(&format!(
            r#"<option value="{value}"{selected}>{label}</option>"#,
            value = filter.as_str(),
            label = filter.label(),
        ));
    }
    body.push_str(
        r#"</select><button type="submit">Show</button></form>
    <form method="post" action="/lists/reload"><button type="submit">Reload</button></form>
"#,
    );

    if view.state.loading {
        body.push_str(r#"<div class="subtitle">Loading...</div>"#);
    } else {
        for list in &view.state.lists {
            push_list(&mut body, view, list);
        }
    }

    body.push_str("</div>");
    page("todolists", &body)
}

fn push_list(body: &mut String, view: &ListsPage<'_>, list: &TodoList) {
    let id = html_escape(&list.id);
    body.push_str(&format!(
        r#"<div class="list">
  <h2>{name}</h2>
  <form method="post" action="/lists/{id}/search">
    <input type="text" name="query" placeholder="Search tasks" value="{query}" />
    <button type="submit">Search</button>
  </form>
"#,
        name = html_escape(&list.name),
        query = html_escape(view.queries.get(&list.id)),
    ));

    let todos = visible_todos(list, view.filter, view.queries);
    if todos.is_empty() {
        body.push_str(r#"<div class="subtitle">No tasks to show.</div>"#);
    }
    for todo in todos {
        push_todo(body, &id, todo);
    }

    let rejected = match view.rejected {
        Some(Rejected::Todo {
            list_id,
            form,
            error,
        }) if list_id == list.id => Some((form, error)),
        _ => None,
    };

    if rejected.is_some() || view.open_form == Some(list.id.as_str()) {
        let empty = TodoForm::default();
        let form = rejected.map_or(&empty, |(form, _)| form);
        body.push_str(&format!(
            r#"<form class="stacked" method="post" action="/lists/{id}/todos">
    <input type="text" name="title" placeholder="Task title" value="{title}" />
    <input type="text" name="description" placeholder="Task description (optional)" value="{description}" />
    <input type="datetime-local" name="deadline" value="{deadline}" />
    <button type="submit">Add task</button>
  </form>
"#,
            title = html_escape(&form.title),
            description = html_escape(&form.description),
            deadline = html_escape(&form.deadline),
        ));
        push_error(body, rejected.map(|(_, error)| error));
        body.push_str(
            r#"<form method="post" action="/lists/form/close"><button type="submit">Hide form</button></form>"#,
        );
    } else {
        body.push_str(&format!(
            r#"<form method="post" action="/lists/{id}/form"><button type="submit">Add task</button></form>"#
        ));
    }
    body.push_str("</div>\n");
}

fn push_todo(body: &mut String, list_id: &str, todo: &Todo) {
    let todo_id = html_escape(&todo.id);
    body.push_str(&format!(
        r#"<div class="todo{done}">
  <div class="meta">
    <div class="title">{title} - {description}</div>
    <div class="time">Deadline: {deadline}</div>
  </div>
  <div class="actions">
    <form method="post" action="/lists/{list_id}/todos/{todo_id}/toggle">
      <input type="hidden" name="completed" value="{completed}" />
      <button type="submit">{toggle}</button>
    </form>
    <form method="post" action="/lists/{list_id}/todos/{todo_id}/delete">
      <button class="delete" type="submit">Delete</button>
    </form>
  </div>
</div>
"#,
        done = if todo.completed { " done" } else { "" },
        title = html_escape(&todo.title),
        description = html_escape(todo.description.as_deref().unwrap_or_default()),
        deadline = html_escape(&format_deadline(todo.deadline.as_deref())),
        completed = todo.completed,
        toggle = if todo.completed { "Reopen" } else { "Done" },
    ));
}

fn push_error(body: &mut String, error: Option<&FormError>) {
    if let Some(error) = error {
        body.push_str(&format!(
            "<div class=\"error\">{}</div>\n",
            html_escape(error.message)
        ));
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <style>{STYLE}</style>
</head>
<body>
  {body}
</body>
</html>"#
    )
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
