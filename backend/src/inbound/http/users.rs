//! User profile HTTP handlers.
//!
//! ```text
//! GET /api/users/profile
//! PUT /api/users/profile {"name":"Asha Rao","phone":"555-0100"}
//! GET /api/users/admin
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ProfileUpdate, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, UserProfileSchema};
use crate::inbound::http::state::HttpState;

/// Request body for `PUT /api/users/profile`.
///
/// Omitted or blank fields keep their stored value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[schema(example = "Asha Rao")]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "555-0100")]
    pub phone: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(value: UpdateProfileRequest) -> Self {
        ProfileUpdate::new(value.name, value.phone)
    }
}

/// Response body for `PUT /api/users/profile`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileResponse {
    #[schema(example = "Profile updated successfully")]
    pub message: String,
    #[schema(value_type = UserProfileSchema)]
    pub user: UserProfile,
}

/// The caller's own profile.
#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Caller profile", body = UserProfileSchema),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Invalid token", body = ErrorSchema),
        (status = 404, description = "User not registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getProfile",
    security(("BearerAuth" = []))
)]
#[get("/users/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state.profile.profile(user.identity()).await?;
    Ok(web::Json(profile))
}

/// Update the caller's name and phone number.
#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UpdateProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Invalid token", body = ErrorSchema),
        (status = 404, description = "User not registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile",
    security(("BearerAuth" = []))
)]
#[put("/users/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UpdateProfileResponse>> {
    let update = ProfileUpdate::from(payload.into_inner());
    let profile = state
        .profile_command
        .update_profile(user.identity(), update)
        .await?;
    Ok(web::Json(UpdateProfileResponse {
        message: "Profile updated successfully".to_owned(),
        user: profile,
    }))
}

/// Every registered user, newest first. Admin only.
#[utoipa::path(
    get,
    path = "/api/users/admin",
    responses(
        (status = 200, description = "Registered users", body = [UserProfileSchema]),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["users", "admin"],
    operation_id = "listUsers",
    security(("BearerAuth" = []))
)]
#[get("/users/admin")]
pub async fn list_users(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<UserProfile>>> {
    let users = state.profile.list_users(user.identity()).await?;
    Ok(web::Json(users))
}
