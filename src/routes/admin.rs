use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::admin_dto::{
        AdminLoginPayload, AdminSignupPayload, PageQuery, StatsResponse, TokenResponse,
    },
    dto::resume_dto::ResumeResponse,
    error::{Error, Result},
    utils::token::issue_admin_token,
    AppState,
};

const DEFAULT_PAGE_LIMIT: i64 = 50;
const MAX_PAGE_LIMIT: i64 = 100;

#[utoipa::path(
    post,
    path = "/admin/provision",
    request_body = AdminSignupPayload,
    responses(
        (status = 201, description = "Admin account created", body = Json<TokenResponse>),
        (status = 409, description = "Username or email already taken")
    )
)]
#[axum::debug_handler]
pub async fn provision_admin(
    State(state): State<AppState>,
    Json(payload): Json<AdminSignupPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let admin = state.admin_service.provision(payload).await?;
    let token = TokenResponse {
        access_token: issue_admin_token(&admin.username)?,
        token_type: "bearer".to_string(),
    };
    Ok((StatusCode::CREATED, Json(token)))
}

#[utoipa::path(
    post,
    path = "/admin/session",
    request_body = AdminLoginPayload,
    responses(
        (status = 200, description = "Session token issued", body = Json<TokenResponse>),
        (status = 401, description = "Unknown admin or wrong password")
    )
)]
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<AdminLoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let token = state.admin_service.login(payload).await?;
    Ok(Json(token))
}

#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Aggregate usage counters", body = Json<StatsResponse>),
        (status = 401, description = "Missing or invalid admin token")
    )
)]
#[axum::debug_handler]
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.admin_service.stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/admin/users",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, capped at 100")
    ),
    responses(
        (status = 200, description = "Users in creation order"),
        (status = 400, description = "Negative skip or limit"),
        (status = 401, description = "Missing or invalid admin token")
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let (skip, limit) = page_window(query)?;
    let users = state.admin_service.list_users(skip, limit).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/admin/resumes",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, capped at 100")
    ),
    responses(
        (status = 200, description = "Resumes in creation order"),
        (status = 400, description = "Negative skip or limit"),
        (status = 401, description = "Missing or invalid admin token")
    )
)]
#[axum::debug_handler]
pub async fn list_resumes(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let (skip, limit) = page_window(query)?;
    let resumes = state.admin_service.list_resumes(skip, limit).await?;
    let items: Vec<ResumeResponse> = resumes.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

fn page_window(query: PageQuery) -> Result<(i64, i64)> {
    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if skip < 0 || limit < 0 {
        return Err(Error::BadRequest(
            "skip and limit must be non-negative".to_string(),
        ));
    }
    Ok((skip, limit.min(MAX_PAGE_LIMIT)))
}
