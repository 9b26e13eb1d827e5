use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{StatusUpdate, Task, TaskInput, TaskQuery, TaskStatus},
    stats::DashboardSummary,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TASK_COLUMNS: &str = "id, title, start_time, end_time, priority, status, user_id";

/// Retrieves the authenticated user's tasks, ordered by ascending start time.
///
/// ## Query Parameters:
/// - `status` (optional): filters tasks by status (`pending` or `finished`).
/// - `priority` (optional): filters tasks by priority (1-5).
///
/// An owner with no tasks receives an empty array, not an error.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Task` objects.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For database errors.
#[get("")]
#[allow(unused_assignments)]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    // Base query selects the caller's tasks; filter conditions are appended
    // dynamically with positional parameters.
    let mut sql = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);
    let mut param_count = 2;

    let mut conditions: Vec<String> = Vec::new();

    if query_params.status.is_some() {
        conditions.push(format!("status = ${}", param_count));
        param_count += 1;
    }
    if query_params.priority.is_some() {
        conditions.push(format!("priority = ${}", param_count));
        param_count += 1;
    }

    if !conditions.is_empty() {
        sql.push_str(" AND ");
        sql.push_str(&conditions.join(" AND "));
    }

    sql.push_str(" ORDER BY start_time ASC");

    let mut query_builder = sqlx::query_as::<_, Task>(&sql);

    query_builder = query_builder.bind(user.0);

    if let Some(status) = query_params.status {
        query_builder = query_builder.bind(status);
    }
    if let Some(priority) = query_params.priority {
        query_builder = query_builder.bind(priority);
    }

    let tasks = query_builder.fetch_all(&**pool).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task for the authenticated user.
///
/// All four fields of `TaskInput` are required; the task's status is set to
/// `pending` and its owner to the caller, regardless of the payload.
///
/// ## Request Body:
/// - `title`: non-empty, at most 200 characters.
/// - `startTime` / `endTime`: ISO 8601 timestamps, `endTime` after `startTime`.
/// - `priority`: integer 1-5.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created `Task` object as JSON.
/// - `400 Bad Request`: Missing or invalid fields.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For database errors.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    // Validate input
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), user.0);

    // Insert task
    let result = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (id, title, start_time, end_time, priority, status, user_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, title, start_time, end_time, priority, status, user_id",
    )
    .bind(task.id)
    .bind(task.title)
    .bind(task.start_time)
    .bind(task.end_time)
    .bind(task.priority)
    .bind(task.status)
    .bind(task.user_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(result))
}

/// Replaces the title, time window, and priority of a task the caller owns.
///
/// The task's status is not touched by this endpoint; use the status route
/// for transitions. A task that does not exist and a task owned by another
/// user are both reported as not found.
///
/// ## Responses:
/// - `200 OK`: `{msg, task}` with the updated record.
/// - `400 Bad Request`: Missing or invalid fields.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `404 Not Found`: Task absent or not owned by the caller.
/// - `500 Internal Server Error`: For database errors.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_uuid = task_id.into_inner();

    let result = sqlx::query_as::<_, Task>(
        "UPDATE tasks
         SET title = $1, start_time = $2, end_time = $3, priority = $4
         WHERE id = $5 AND user_id = $6
         RETURNING id, title, start_time, end_time, priority, status, user_id",
    )
    .bind(&task_data.title)
    .bind(task_data.start_time)
    .bind(task_data.end_time)
    .bind(task_data.priority)
    .bind(task_uuid)
    .bind(user.0)
    .fetch_optional(&**pool)
    .await?;

    match result {
        Some(task) => Ok(HttpResponse::Ok().json(json!({
            "msg": "Task updated successfully",
            "task": task
        }))),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Transitions a task between `pending` and `finished`.
///
/// Moving a task to `finished` stamps its end time with the current server
/// time, overriding whatever end time the task carried. Moving it back to
/// `pending` leaves the end time as it is.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Task` object as JSON.
/// - `400 Bad Request`: Status is not `pending` or `finished`.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `404 Not Found`: Task absent or not owned by the caller.
/// - `500 Internal Server Error`: For database errors.
#[patch("/{id}/status")]
pub async fn update_status(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    status_data: web::Json<StatusUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task_uuid = task_id.into_inner();
    let status = status_data.into_inner().status;

    let result = if status == TaskStatus::Finished {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = $1, end_time = $2
             WHERE id = $3 AND user_id = $4
             RETURNING id, title, start_time, end_time, priority, status, user_id",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(task_uuid)
        .bind(user.0)
        .fetch_optional(&**pool)
        .await?
    } else {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = $1
             WHERE id = $2 AND user_id = $3
             RETURNING id, title, start_time, end_time, priority, status, user_id",
        )
        .bind(status)
        .bind(task_uuid)
        .bind(user.0)
        .fetch_optional(&**pool)
        .await?
    };

    match result {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Deletes a task the caller owns and returns the removed record.
///
/// ## Responses:
/// - `200 OK`: `{msg, task}` with the deleted record.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `404 Not Found`: Task absent or not owned by the caller.
/// - `500 Internal Server Error`: For database errors.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task_uuid = task_id.into_inner();

    let result = sqlx::query_as::<_, Task>(
        "DELETE FROM tasks WHERE id = $1 AND user_id = $2
         RETURNING id, title, start_time, end_time, priority, status, user_id",
    )
    .bind(task_uuid)
    .bind(user.0)
    .fetch_optional(&**pool)
    .await?;

    match result {
        Some(task) => Ok(HttpResponse::Ok().json(json!({
            "msg": "Task deleted successfully",
            "task": task
        }))),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Computes the dashboard summary over the caller's full task list.
///
/// The summary is recomputed from scratch on every call, evaluated at the
/// server's current time; nothing is cached.
///
/// ## Responses:
/// - `200 OK`: Returns the `DashboardSummary` as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For database errors.
#[get("/stats")]
pub async fn task_stats(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let sql = format!(
        "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY start_time ASC",
        TASK_COLUMNS
    );
    let tasks = sqlx::query_as::<_, Task>(&sql)
        .bind(user.0)
        .fetch_all(&**pool)
        .await?;

    let summary = DashboardSummary::compute(&tasks, Utc::now());

    Ok(HttpResponse::Ok().json(summary))
}
