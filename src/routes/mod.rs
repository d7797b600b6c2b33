pub mod admin;
pub mod health;
pub mod resume;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Full HTTP surface. Admin reporting sits behind the bearer-token
/// middleware; generation, listing and download are public.
pub fn build_router(state: AppState) -> Router {
    let admin_api = Router::new()
        .route("/admin/stats", get(admin::get_stats))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/resumes", get(admin::list_resumes))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_admin,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route(
            "/resumes",
            post(resume::generate_resume).get(resume::list_resumes),
        )
        .route("/resumes/:id/download", get(resume::download_resume))
        .route("/admin/provision", post(admin::provision_admin))
        .route("/admin/session", post(admin::create_session))
        .merge(admin_api)
        .with_state(state)
}
