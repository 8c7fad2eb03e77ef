//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every booking, payment, profile and health endpoint
//! together with the schema wrappers from
//! [`crate::inbound::http::schemas`], so domain types stay free of utoipa
//! derives. The document backs Swagger UI in debug builds and the
//! `openapi-dump` binary.

use crate::inbound::http::meals::{
    CreateMealRequest, CreateMealResponse, UpdateMealStatusRequest, UpdateMealStatusResponse,
};
use crate::inbound::http::payments::{SettlePaymentRequest, SettlePaymentResponse};
use crate::inbound::http::schemas::{
    AdminPaymentViewSchema, DashboardStatsSchema, ErrorCodeSchema, ErrorSchema, MealSchema,
    MealWithOwnerSchema, PaymentMethodSchema, PaymentRecordStatusSchema, PaymentSchema,
    PaymentStatusSchema, PaymentWithMealSchema, PhaseCountsSchema, UserContactSchema,
    UserProfileSchema,
};
use crate::inbound::http::users::{UpdateProfileRequest, UpdateProfileResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "HS256 token issued by the identity provider; claims carry `userId` and `role`.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Meal ledger API",
        description = "Meal bookings, payment settlement and administrator oversight.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::meals::create_meal,
        crate::inbound::http::meals::list_own_meals,
        crate::inbound::http::meals::list_meals,
        crate::inbound::http::meals::meal_summary,
        crate::inbound::http::meals::list_all_meals,
        crate::inbound::http::meals::meal_stats,
        crate::inbound::http::meals::update_meal_status,
        crate::inbound::http::payments::settle_payment,
        crate::inbound::http::payments::payment_history,
        crate::inbound::http::payments::list_all_payments,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::list_users,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MealSchema,
        MealWithOwnerSchema,
        UserContactSchema,
        PaymentSchema,
        PaymentWithMealSchema,
        AdminPaymentViewSchema,
        PaymentStatusSchema,
        PaymentMethodSchema,
        PaymentRecordStatusSchema,
        UserProfileSchema,
        PhaseCountsSchema,
        DashboardStatsSchema,
        CreateMealRequest,
        CreateMealResponse,
        UpdateMealStatusRequest,
        UpdateMealStatusResponse,
        SettlePaymentRequest,
        SettlePaymentResponse,
        UpdateProfileRequest,
        UpdateProfileResponse,
    )),
    tags(
        (name = "meals", description = "Booking meals and reviewing bookings"),
        (name = "payments", description = "Settling bookings and payment history"),
        (name = "users", description = "Profile of the authenticated user"),
        (name = "admin", description = "Administrator oversight"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
