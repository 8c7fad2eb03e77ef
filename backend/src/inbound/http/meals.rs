//! Meal booking HTTP handlers.
//!
//! ```text
//! POST /api/meals {"mealsPerDay":2,"numberOfMembers":3,"totalDays":5,"startDate":"2026-06-15"}
//! GET  /api/meals/user
//! GET  /api/meals/user/summary
//! GET  /api/meals/admin?status=pending&from=2026-06-01&to=2026-06-30&search=asha
//! GET  /api/meals/admin/stats
//! PUT  /api/meals/admin/{id} {"paymentStatus":"completed"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    BookingFilter, BookingReceipt, BookingRequest, DashboardStats, Meal, MealWithOwner,
    PhaseCounts,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::error::malformed_body;
use crate::inbound::http::schemas::{
    DashboardStatsSchema, ErrorSchema, MealSchema, MealWithOwnerSchema, PhaseCountsSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_date, parse_meal_id, parse_optional, parse_payment_status,
};

/// Request body for `POST /api/meals`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    #[schema(example = 2)]
    pub meals_per_day: i64,
    #[schema(example = 3)]
    pub number_of_members: i64,
    #[schema(example = 5)]
    pub total_days: i64,
    #[schema(format = Date, example = "2026-06-15")]
    pub start_date: String,
}

impl CreateMealRequest {
    fn into_domain(self) -> ApiResult<BookingRequest> {
        Ok(BookingRequest {
            meals_per_day: self.meals_per_day,
            number_of_members: self.number_of_members,
            total_days: self.total_days,
            start_date: parse_date(&self.start_date, FieldName::new("startDate"))?,
        })
    }
}

/// Response body for `POST /api/meals`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealResponse {
    #[schema(example = "Meal booked successfully")]
    pub message: String,
    #[schema(value_type = uuid::Uuid)]
    pub meal_id: String,
    #[schema(example = 2100)]
    pub total_amount: u64,
    #[schema(value_type = MealSchema)]
    pub meal: Meal,
}

impl From<BookingReceipt> for CreateMealResponse {
    fn from(receipt: BookingReceipt) -> Self {
        Self {
            message: "Meal booked successfully".to_owned(),
            meal_id: receipt.meal_id.to_string(),
            total_amount: receipt.total_amount,
            meal: receipt.meal,
        }
    }
}

/// Request body for `PUT /api/meals/admin/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealStatusRequest {
    #[schema(example = "completed")]
    pub payment_status: String,
}

/// Response body for `PUT /api/meals/admin/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealStatusResponse {
    #[schema(example = "Meal updated successfully")]
    pub message: String,
    #[schema(value_type = MealSchema)]
    pub meal: Meal,
}

/// Optional filters for `GET /api/meals/admin`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminMealsQuery {
    /// `pending` or `completed`.
    pub status: Option<String>,
    /// Keep bookings ending on or after this date (`YYYY-MM-DD`).
    pub from: Option<String>,
    /// Keep bookings starting on or before this date (`YYYY-MM-DD`).
    pub to: Option<String>,
    /// Case-insensitive match on owner name, email or booking id.
    pub search: Option<String>,
}

impl AdminMealsQuery {
    fn into_filter(self) -> ApiResult<BookingFilter> {
        Ok(BookingFilter {
            status: parse_optional(
                self.status.as_deref(),
                FieldName::new("status"),
                parse_payment_status,
            )?,
            from: parse_optional(self.from.as_deref(), FieldName::new("from"), parse_date)?,
            to: parse_optional(self.to.as_deref(), FieldName::new("to"), parse_date)?,
            search: self
                .search
                .map(|term| term.trim().to_owned())
                .filter(|term| !term.is_empty()),
        })
    }
}

/// Book a meal plan for the caller.
///
/// The total is `70 × mealsPerDay × numberOfMembers × totalDays` and the
/// booking starts out `pending`.
#[utoipa::path(
    post,
    path = "/api/meals",
    request_body = CreateMealRequest,
    responses(
        (status = 201, description = "Meal booked", body = CreateMealResponse),
        (status = 400, description = "Invalid booking", body = ErrorSchema),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Invalid token", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["meals"],
    operation_id = "createMeal",
    security(("BearerAuth" = []))
)]
#[post("/meals")]
pub async fn create_meal(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateMealRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner().into_domain()?;
    let receipt = state.bookings.create(user.identity(), request).await?;
    Ok(HttpResponse::Created().json(CreateMealResponse::from(receipt)))
}

/// The caller's bookings, newest first.
#[utoipa::path(
    get,
    path = "/api/meals/user",
    responses(
        (status = 200, description = "Caller bookings", body = [MealSchema]),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Invalid token", body = ErrorSchema)
    ),
    tags = ["meals"],
    operation_id = "listOwnMeals",
    security(("BearerAuth" = []))
)]
#[get("/meals/user")]
pub async fn list_own_meals(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Meal>>> {
    let meals = state.bookings_query.list_own(user.identity()).await?;
    Ok(web::Json(meals))
}

/// Alias of `GET /api/meals/user`.
#[utoipa::path(
    get,
    path = "/api/meals",
    responses(
        (status = 200, description = "Caller bookings", body = [MealSchema]),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Invalid token", body = ErrorSchema)
    ),
    tags = ["meals"],
    operation_id = "listMeals",
    security(("BearerAuth" = []))
)]
#[get("/meals")]
pub async fn list_meals(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Meal>>> {
    let meals = state.bookings_query.list_own(user.identity()).await?;
    Ok(web::Json(meals))
}

/// Per-tab counts of the caller's bookings relative to today.
#[utoipa::path(
    get,
    path = "/api/meals/user/summary",
    responses(
        (status = 200, description = "Booking counts", body = PhaseCountsSchema),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Invalid token", body = ErrorSchema)
    ),
    tags = ["meals"],
    operation_id = "mealSummary",
    security(("BearerAuth" = []))
)]
#[get("/meals/user/summary")]
pub async fn meal_summary(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<PhaseCounts>> {
    let counts = state.bookings_query.summary(user.identity()).await?;
    Ok(web::Json(counts))
}

/// Every booking with its owner's contact details. Admin only.
#[utoipa::path(
    get,
    path = "/api/meals/admin",
    params(AdminMealsQuery),
    responses(
        (status = 200, description = "All bookings", body = [MealWithOwnerSchema]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["meals", "admin"],
    operation_id = "listAllMeals",
    security(("BearerAuth" = []))
)]
#[get("/meals/admin")]
pub async fn list_all_meals(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<AdminMealsQuery>,
) -> ApiResult<web::Json<Vec<MealWithOwner>>> {
    user.require_admin()?;
    let filter = query.into_inner().into_filter()?;
    let meals = state.bookings_query.list_all(user.identity(), filter).await?;
    Ok(web::Json(meals))
}

/// Dashboard statistics over every booking. Admin only.
#[utoipa::path(
    get,
    path = "/api/meals/admin/stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStatsSchema),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["meals", "admin"],
    operation_id = "mealStats",
    security(("BearerAuth" = []))
)]
#[get("/meals/admin/stats")]
pub async fn meal_stats(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<DashboardStats>> {
    let stats = state.bookings_query.dashboard(user.identity()).await?;
    Ok(web::Json(stats))
}

/// Override a booking's payment status. Admin only.
#[utoipa::path(
    put,
    path = "/api/meals/admin/{id}",
    params(("id" = uuid::Uuid, Path, description = "Booking identifier")),
    request_body = UpdateMealStatusRequest,
    responses(
        (status = 200, description = "Booking updated", body = UpdateMealStatusResponse),
        (status = 400, description = "Invalid status or id", body = ErrorSchema),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema),
        (status = 404, description = "Booking not found", body = ErrorSchema),
        (status = 409, description = "Booking has a completed payment", body = ErrorSchema)
    ),
    tags = ["meals", "admin"],
    operation_id = "updateMealStatus",
    security(("BearerAuth" = []))
)]
#[put("/meals/admin/{id}")]
pub async fn update_meal_status(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<UpdateMealStatusResponse>> {
    // The body is read raw so members are refused before it is parsed.
    user.require_admin()?;
    let meal_id = parse_meal_id(&path.into_inner(), FieldName::new("id"))?;
    let payload: UpdateMealStatusRequest =
        serde_json::from_slice(&body).map_err(|err| malformed_body(&err))?;
    let status = parse_payment_status(&payload.payment_status, FieldName::new("paymentStatus"))?;
    let meal = state
        .bookings
        .update_status(user.identity(), &meal_id, status)
        .await?;
    Ok(web::Json(UpdateMealStatusResponse {
        message: "Meal updated successfully".to_owned(),
        meal,
    }))
}

#[cfg(test)]
#[path = "meals_tests.rs"]
mod tests;
