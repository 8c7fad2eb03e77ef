//! Tests for the payment service.

use std::collections::HashMap;
use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockMealRepository, MockPaymentRepository, MockUserDirectory};
use crate::domain::{
    BookingPlan, BookingRequest, ErrorCode, PaymentMethod, PaymentRecordStatus, PaymentStatus,
    Role, UserContact, UserId,
};
use crate::test_support::{FixedClock, fixture_now};

type Service = PaymentService<MockMealRepository, MockPaymentRepository, MockUserDirectory>;

fn make_service(meals: MockMealRepository, payments: MockPaymentRepository) -> Service {
    make_service_with_users(meals, payments, MockUserDirectory::new())
}

fn make_service_with_users(
    meals: MockMealRepository,
    payments: MockPaymentRepository,
    users: MockUserDirectory,
) -> Service {
    PaymentService::new(
        Arc::new(meals),
        Arc::new(payments),
        Arc::new(users),
        Arc::new(FixedClock::new(fixture_now())),
    )
}

#[fixture]
fn owner() -> Identity {
    Identity::new(UserId::random(), Role::Member)
}

fn pending_meal(owner: UserId) -> Meal {
    let today = fixture_now().date_naive();
    let plan = BookingPlan::new(
        &BookingRequest {
            meals_per_day: 2,
            number_of_members: 3,
            total_days: 5,
            start_date: today,
        },
        today,
    )
    .expect("valid plan");
    Meal::book(&plan, owner, fixture_now())
}

fn settle_request(meal_id: MealId) -> SettlementRequest {
    SettlementRequest {
        meal_id,
        payment_method: PaymentMethod::Online,
        transaction_id: Some("txn-42".to_owned()),
    }
}

fn meals_returning(meal: Meal) -> MockMealRepository {
    let mut meals = MockMealRepository::new();
    meals
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(meal)));
    meals
}

#[rstest]
#[tokio::test]
async fn settle_records_completed_payment_for_full_total(owner: Identity) {
    let meal = pending_meal(*owner.user_id());
    let meal_id = meal.id;
    let mut settled = meal.clone();
    settled.payment_status = PaymentStatus::Completed;

    let mut payments = MockPaymentRepository::new();
    payments
        .expect_settle()
        .withf(move |payment| {
            payment.meal_id == meal_id
                && payment.amount == 2100
                && payment.status == PaymentRecordStatus::Completed
        })
        .times(1)
        .return_once(move |_| Ok(settled));

    let service = make_service(meals_returning(meal), payments);
    let settlement = service
        .settle(&owner, settle_request(meal_id))
        .await
        .expect("settlement succeeds");

    assert_eq!(settlement.payment.amount, 2100);
    assert_eq!(settlement.payment.user_id, *owner.user_id());
    assert_eq!(settlement.payment.transaction_id.as_deref(), Some("txn-42"));
    assert_eq!(settlement.meal.payment_status, PaymentStatus::Completed);
}

#[rstest]
#[tokio::test]
async fn settle_reports_missing_booking(owner: Identity) {
    let mut meals = MockMealRepository::new();
    meals.expect_find_by_id().return_once(|_| Ok(None));
    let mut payments = MockPaymentRepository::new();
    payments.expect_settle().never();

    let service = make_service(meals, payments);
    let err = service
        .settle(&owner, settle_request(MealId::random()))
        .await
        .expect_err("missing booking");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Meal booking not found");
}

#[rstest]
#[tokio::test]
async fn settle_rejects_non_owner_without_writing(owner: Identity) {
    let meal = pending_meal(UserId::random());
    let meal_id = meal.id;
    let mut payments = MockPaymentRepository::new();
    payments.expect_settle().never();

    let service = make_service(meals_returning(meal), payments);
    let err = service
        .settle(&owner, settle_request(meal_id))
        .await
        .expect_err("non-owner rejected");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "Unauthorized access to this meal booking");
}

#[rstest]
#[tokio::test]
async fn settle_rejects_already_paid_booking(owner: Identity) {
    let mut meal = pending_meal(*owner.user_id());
    meal.payment_status = PaymentStatus::Completed;
    let meal_id = meal.id;
    let mut payments = MockPaymentRepository::new();
    payments.expect_settle().never();

    let service = make_service(meals_returning(meal), payments);
    let err = service
        .settle(&owner, settle_request(meal_id))
        .await
        .expect_err("already settled");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().map(|details| details["code"].clone()),
        Some(serde_json::json!("booking_already_settled"))
    );
}

#[rstest]
#[tokio::test]
async fn settle_maps_lost_race_to_conflict(owner: Identity) {
    let meal = pending_meal(*owner.user_id());
    let meal_id = meal.id;
    let mut payments = MockPaymentRepository::new();
    payments
        .expect_settle()
        .return_once(move |_| Err(PaymentRepositoryError::already_settled(meal_id)));

    let service = make_service(meals_returning(meal), payments);
    let err = service
        .settle(&owner, settle_request(meal_id))
        .await
        .expect_err("concurrent settlement lost");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn settle_maps_store_outage_to_service_unavailable(owner: Identity) {
    let meal = pending_meal(*owner.user_id());
    let meal_id = meal.id;
    let mut payments = MockPaymentRepository::new();
    payments
        .expect_settle()
        .return_once(|_| Err(PaymentRepositoryError::connection("connection closed")));

    let service = make_service(meals_returning(meal), payments);
    let err = service
        .settle(&owner, settle_request(meal_id))
        .await
        .expect_err("store offline");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn history_expands_bookings(owner: Identity) {
    let meal = pending_meal(*owner.user_id());
    let payment = Payment::settling(&meal, PaymentMethod::Cash, None, fixture_now());
    let listed_meal = meal.clone();

    let mut meals = MockMealRepository::new();
    meals
        .expect_list_for_user()
        .return_once(move |_| Ok(vec![listed_meal]));
    let mut payments = MockPaymentRepository::new();
    payments
        .expect_list_for_user()
        .return_once(move |_| Ok(vec![payment]));

    let service = make_service(meals, payments);
    let history = service.history(&owner).await.expect("history");

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].meal.as_ref().map(|m| m.id), Some(meal.id));
}

#[rstest]
#[tokio::test]
async fn admin_listing_rejects_members_before_data_access(owner: Identity) {
    let mut payments = MockPaymentRepository::new();
    payments.expect_list_all().never();

    let service = make_service(MockMealRepository::new(), payments);
    let err = service.list_all(&owner).await.expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn admin_listing_joins_meal_and_payer() {
    let admin = Identity::new(UserId::random(), Role::Admin);
    let payer = UserId::random();
    let meal = pending_meal(payer);
    let payment = Payment::settling(&meal, PaymentMethod::Online, None, fixture_now());
    let listed_meal = meal.clone();

    let mut meals = MockMealRepository::new();
    meals.expect_list_all().return_once(move || Ok(vec![listed_meal]));
    let mut payments = MockPaymentRepository::new();
    payments.expect_list_all().return_once(move || Ok(vec![payment]));
    let mut users = MockUserDirectory::new();
    users.expect_find_contacts().return_once(move |_| {
        Ok(HashMap::from([(
            payer,
            UserContact {
                name: "Ravi".to_owned(),
                email: "ravi@example.com".to_owned(),
                phone: "555-0111".to_owned(),
            },
        )]))
    });

    let service = make_service_with_users(meals, payments, users);
    let rows = service.list_all(&admin).await.expect("admin listing");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].meal.as_ref().map(|m| m.id), Some(meal.id));
    assert_eq!(rows[0].user.as_ref().map(|u| u.email.as_str()), Some("ravi@example.com"));
}
