// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, extract, question},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, questions, extract).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, importer client).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Create and delete carry the owner id in the payload; the session-bound
    // routes read it from the verified token instead.
    let question_routes = Router::new()
        .route(
            "/",
            post(question::create_question).delete(question::delete_question),
        )
        .merge(
            Router::new()
                .route("/", get(question::list_questions))
                .route(
                    "/{id}",
                    get(question::get_question).put(question::update_question),
                )
                .route("/{id}/rendered", get(question::get_question_rendered))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let extract_routes = Router::new().route("/", post(extract::extract_problem));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/extract", extract_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
