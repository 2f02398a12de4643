pub mod appointments;
pub mod auth;
pub mod biddings;
pub mod clients;
pub mod documents;
pub mod params;
pub mod processes;
pub mod status;
pub mod tasks;
pub mod users;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Users
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        // Clients
        .route("/api/clients", get(clients::list).post(clients::create))
        .route(
            "/api/clients/{id}",
            get(clients::get)
                .put(clients::update)
                .delete(clients::delete),
        )
        // Processes
        .route("/api/processes", get(processes::list).post(processes::create))
        .route(
            "/api/processes/{id}",
            get(processes::get)
                .put(processes::update)
                .delete(processes::delete),
        )
        // Appointments
        .route(
            "/api/appointments",
            get(appointments::list).post(appointments::create),
        )
        .route(
            "/api/appointments/{id}",
            get(appointments::get)
                .put(appointments::update)
                .delete(appointments::delete),
        )
        // Tasks
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/{id}",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .route("/api/tasks/{id}/status", patch(tasks::update_status))
        // Bidding records
        .route("/api/licitacoes", get(biddings::list).post(biddings::create))
        .route(
            "/api/licitacoes/{id}",
            get(biddings::get)
                .put(biddings::update)
                .delete(biddings::delete),
        )
        // Documents
        .route("/api/documents", get(documents::list))
        .route("/api/documents/upload", post(documents::upload))
        .route("/api/documents/download/{id}", get(documents::download))
        .route("/api/documents/process/{id}", get(documents::list_by_process))
        .route("/api/documents/client/{id}", get(documents::list_by_client))
        .route(
            "/api/documents/{id}",
            get(documents::get).delete(documents::delete),
        )
        // Probe
        .route("/api/status", get(status::status))
        .route("/api/{*rest}", axum::routing::any(status::unknown_api))
}
