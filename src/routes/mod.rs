pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::register),
    )
    .service(
        web::scope("/task")
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::task_stats)
            .service(tasks::update_task)
            .service(tasks::update_status)
            .service(tasks::delete_task),
    );
}
