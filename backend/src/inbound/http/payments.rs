//! Payment HTTP handlers.
//!
//! ```text
//! POST /api/payments/{mealId} {"paymentMethod":"online","transactionId":"TXN-1"}
//! GET  /api/payments/history
//! GET  /api/payments/admin
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AdminPaymentView, Meal, Payment, PaymentWithMeal, Settlement, SettlementRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{
    AdminPaymentViewSchema, ErrorSchema, MealSchema, PaymentSchema, PaymentWithMealSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_meal_id, parse_payment_method};

/// Request body for `POST /api/payments/{mealId}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlePaymentRequest {
    #[schema(example = "online")]
    pub payment_method: String,
    /// Opaque external reference; blank values are dropped.
    #[serde(default)]
    #[schema(example = "TXN-20260615-0001")]
    pub transaction_id: Option<String>,
}

/// Response body for a successful settlement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlePaymentResponse {
    #[schema(example = "Payment successful")]
    pub message: String,
    #[schema(value_type = PaymentSchema)]
    pub payment: Payment,
    #[schema(value_type = MealSchema)]
    pub meal: Meal,
}

impl From<Settlement> for SettlePaymentResponse {
    fn from(settlement: Settlement) -> Self {
        Self {
            message: "Payment successful".to_owned(),
            payment: settlement.payment,
            meal: settlement.meal,
        }
    }
}

/// Settle a pending booking owned by the caller.
///
/// Records a completed payment for the booking total and marks the booking
/// paid in one step. Paying twice is rejected with `409`.
#[utoipa::path(
    post,
    path = "/api/payments/{mealId}",
    params(("mealId" = uuid::Uuid, Path, description = "Booking to settle")),
    request_body = SettlePaymentRequest,
    responses(
        (status = 200, description = "Booking settled", body = SettlePaymentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Invalid token or not the owner", body = ErrorSchema),
        (status = 404, description = "Booking not found", body = ErrorSchema),
        (status = 409, description = "Booking already paid", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "settlePayment",
    security(("BearerAuth" = []))
)]
#[post("/payments/{mealId}")]
pub async fn settle_payment(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<SettlePaymentRequest>,
) -> ApiResult<web::Json<SettlePaymentResponse>> {
    let meal_id = parse_meal_id(&path.into_inner(), FieldName::new("mealId"))?;
    let SettlePaymentRequest {
        payment_method,
        transaction_id,
    } = payload.into_inner();
    let request = SettlementRequest {
        meal_id,
        payment_method: parse_payment_method(&payment_method, FieldName::new("paymentMethod"))?,
        transaction_id: transaction_id
            .map(|reference| reference.trim().to_owned())
            .filter(|reference| !reference.is_empty()),
    };

    let settlement = state.payments.settle(user.identity(), request).await?;
    Ok(web::Json(SettlePaymentResponse::from(settlement)))
}

/// The caller's payments with their bookings, newest first.
#[utoipa::path(
    get,
    path = "/api/payments/history",
    responses(
        (status = 200, description = "Caller payments", body = [PaymentWithMealSchema]),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Invalid token", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "paymentHistory",
    security(("BearerAuth" = []))
)]
#[get("/payments/history")]
pub async fn payment_history(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<PaymentWithMeal>>> {
    let payments = state.payments_query.history(user.identity()).await?;
    Ok(web::Json(payments))
}

/// Every payment with booking and payer details. Admin only.
#[utoipa::path(
    get,
    path = "/api/payments/admin",
    responses(
        (status = 200, description = "All payments", body = [AdminPaymentViewSchema]),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["payments", "admin"],
    operation_id = "listAllPayments",
    security(("BearerAuth" = []))
)]
#[get("/payments/admin")]
pub async fn list_all_payments(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<AdminPaymentView>>> {
    let payments = state.payments_query.list_all(user.identity()).await?;
    Ok(web::Json(payments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPaymentCommand, MockPaymentQuery};
    use crate::domain::{
        Error, Identity, MealId, PaymentId, PaymentMethod, PaymentRecordStatus, PaymentStatus,
        Role, UserId,
    };
    use crate::inbound::http::error::json_config;
    use crate::inbound::http::test_utils::{bearer, fixture_state, verifier_for};
    use crate::test_support::fixture_now;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};
    use std::sync::Arc;

    #[fixture]
    fn member() -> Identity {
        Identity::new(UserId::random(), Role::Member)
    }

    fn settled(owner: UserId, method: PaymentMethod, transaction_id: Option<String>) -> Settlement {
        let start = fixture_now().date_naive();
        let meal = Meal {
            id: MealId::random(),
            user_id: owner,
            meals_per_day: 2,
            number_of_members: 3,
            total_days: 5,
            start_date: start,
            end_date: start + chrono::Duration::days(4),
            total_amount: 2100,
            payment_status: PaymentStatus::Completed,
            created_at: fixture_now(),
        };
        let payment = Payment {
            id: PaymentId::random(),
            meal_id: meal.id,
            user_id: owner,
            amount: meal.total_amount,
            payment_method: method,
            transaction_id,
            status: PaymentRecordStatus::Completed,
            created_at: fixture_now(),
        };
        Settlement { payment, meal }
    }

    async fn send(
        identity: Identity,
        command: MockPaymentCommand,
        query: MockPaymentQuery,
        request: actix_test::TestRequest,
    ) -> (StatusCode, Value) {
        let mut state = fixture_state(verifier_for(identity));
        state.payments = Arc::new(command);
        state.payments_query = Arc::new(query);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(json_config())
                .service(
                    web::scope("/api")
                        .service(payment_history)
                        .service(list_all_payments)
                        .service(settle_payment),
                ),
        )
        .await;
        let response =
            actix_test::call_service(&app, request.insert_header(bearer()).to_request()).await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn settlement_returns_payment_and_paid_booking(member: Identity) {
        let owner = *member.user_id();
        let meal_id = MealId::random();
        let mut command = MockPaymentCommand::new();
        command
            .expect_settle()
            .withf(move |_, request| {
                request.meal_id == meal_id
                    && request.payment_method == PaymentMethod::Online
                    && request.transaction_id.as_deref() == Some("TXN-1")
            })
            .times(1)
            .return_once(move |_, request| {
                Ok(settled(owner, request.payment_method, request.transaction_id))
            });

        let (status, body) = send(
            member,
            command,
            MockPaymentQuery::new(),
            actix_test::TestRequest::post()
                .uri(&format!("/api/payments/{meal_id}"))
                .set_json(json!({"paymentMethod": "online", "transactionId": " TXN-1 "})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Payment successful");
        assert_eq!(body["payment"]["amount"], 2100);
        assert_eq!(body["payment"]["status"], "completed");
        assert_eq!(body["meal"]["paymentStatus"], "completed");
    }

    #[rstest]
    #[actix_web::test]
    async fn blank_transaction_reference_is_dropped(member: Identity) {
        let owner = *member.user_id();
        let mut command = MockPaymentCommand::new();
        command
            .expect_settle()
            .withf(|_, request| request.transaction_id.is_none())
            .times(1)
            .return_once(move |_, request| Ok(settled(owner, request.payment_method, None)));

        let (status, body) = send(
            member,
            command,
            MockPaymentQuery::new(),
            actix_test::TestRequest::post()
                .uri(&format!("/api/payments/{}", MealId::random()))
                .set_json(json!({"paymentMethod": "cash", "transactionId": "  "})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["payment"].get("transactionId").is_none());
    }

    #[rstest]
    #[case(Error::not_found("Meal booking not found"), StatusCode::NOT_FOUND)]
    #[case(Error::forbidden("Unauthorized access to this meal booking"), StatusCode::FORBIDDEN)]
    #[case(Error::conflict("Meal booking is already paid"), StatusCode::CONFLICT)]
    #[case(Error::service_unavailable("pool timed out"), StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn settlement_failures_keep_their_status(
        member: Identity,
        #[case] error: Error,
        #[case] expected: StatusCode,
    ) {
        let message = error.message().to_owned();
        let mut command = MockPaymentCommand::new();
        command.expect_settle().times(1).return_once(move |_, _| Err(error));

        let (status, body) = send(
            member,
            command,
            MockPaymentQuery::new(),
            actix_test::TestRequest::post()
                .uri(&format!("/api/payments/{}", MealId::random()))
                .set_json(json!({"paymentMethod": "online"})),
        )
        .await;

        assert_eq!(status, expected);
        assert_eq!(body["error"], message);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_payment_method_is_rejected_before_settling(member: Identity) {
        let mut command = MockPaymentCommand::new();
        command.expect_settle().never();

        let (status, body) = send(
            member,
            command,
            MockPaymentQuery::new(),
            actix_test::TestRequest::post()
                .uri(&format!("/api/payments/{}", MealId::random()))
                .set_json(json!({"paymentMethod": "card"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "paymentMethod");
    }

    #[rstest]
    #[actix_web::test]
    async fn history_lists_caller_payments(member: Identity) {
        let owner = *member.user_id();
        let mut query = MockPaymentQuery::new();
        query.expect_history().times(1).return_once(move |_| {
            let Settlement { payment, meal } = settled(owner, PaymentMethod::Cash, None);
            Ok(vec![PaymentWithMeal {
                payment,
                meal: Some(meal),
            }])
        });

        let (status, body) = send(
            member,
            MockPaymentCommand::new(),
            query,
            actix_test::TestRequest::get().uri("/api/payments/history"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["paymentMethod"], "cash");
        assert_eq!(body[0]["meal"]["totalAmount"], 2100);
    }
}
