//! taskpad task command implementations.

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::query::{StatusFilter, ViewQuery};
use crate::service::{NewTask, TaskService, TaskUpdate};
use crate::task::{self, Task};

pub struct ListOptions {
    pub search: String,
    pub status: String,
    pub edit: Option<String>,
    pub service: TaskService,
    pub json: bool,
    pub quiet: bool,
}

pub struct AddOptions {
    pub title: String,
    pub description: String,
    pub due: String,
    pub service: TaskService,
    pub json: bool,
    pub quiet: bool,
}

pub struct StatusOptions {
    pub id: String,
    pub state: String,
    pub service: TaskService,
    pub json: bool,
    pub quiet: bool,
}

pub struct UpdateOptions {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due: String,
    pub completed: bool,
    pub service: TaskService,
    pub json: bool,
    pub quiet: bool,
}

pub struct DeleteOptions {
    pub id: String,
    pub service: TaskService,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let status = StatusFilter::parse_lenient(&options.status);
    let query = ViewQuery::new(options.search, status, options.edit);
    let view = options.service.view(&query);
    let today = task::today();

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", view.total.to_string());
    human.push_summary("Status", view.status.to_string());
    if !view.search.is_empty() {
        human.push_summary("Search", view.search.clone());
    }
    if let Some(edit_task) = view.edit_task.as_ref() {
        human.push_summary("Editing", format!("{} {}", edit_task.id(), edit_task.title()));
    }
    if status.as_str() != options.status.trim() {
        human.push_warning(format!(
            "unknown status filter '{}', showing all",
            options.status.trim()
        ));
    }
    if view.overdue > 0 {
        human.push_warning(format!("{} overdue", view.overdue));
    }
    for task in &view.tasks {
        human.push_detail(task_line(task, task.is_overdue(today)));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &view,
        Some(&human),
    )
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let task = options.service.create(NewTask {
        title: options.title,
        description: options.description,
        due_date: Some(options.due),
    })?;

    let mut human = HumanOutput::new("Task created");
    push_task_summary(&mut human, &task);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &task,
        Some(&human),
    )
}

pub fn run_status(options: StatusOptions) -> Result<()> {
    let task = options.service.set_status(&options.id, &options.state)?;

    let mut human = HumanOutput::new("Task status updated");
    human.push_summary("ID", task.id());
    human.push_summary("Status", task.status_label());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "status",
        &task,
        Some(&human),
    )
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    let task = options.service.update(
        &options.id,
        TaskUpdate {
            title: options.title,
            description: options.description,
            due_date: Some(options.due),
            completed: options.completed,
        },
    )?;

    let mut human = HumanOutput::new("Task updated");
    push_task_summary(&mut human, &task);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "update",
        &task,
        Some(&human),
    )
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let task = options.service.delete(&options.id)?;

    let mut human = HumanOutput::new("Task deleted");
    human.push_summary("ID", task.id());
    human.push_summary("Title", task.title());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "delete",
        &task,
        Some(&human),
    )
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("ID", task.id());
    human.push_summary("Title", task.title());
    if !task.description().is_empty() {
        human.push_summary("Description", task.description());
    }
    human.push_summary("Due", task.short_due_date());
    human.push_summary("Status", task.status_label());
}

fn task_line(task: &Task, overdue: bool) -> String {
    let mut line = format!(
        "[{}] {} {} (due: {})",
        task.status_label(),
        task.id(),
        task.title(),
        task.short_due_date()
    );
    if overdue {
        line.push_str(" OVERDUE");
    }
    line
}
