//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users, written by the identity provider.
    users (id) {
        /// Primary key.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Unique contact email.
        email -> Varchar,
        /// `member` or `admin`; `user` is accepted as a legacy member value.
        role -> Varchar,
        /// Contact phone number.
        phone -> Varchar,
        /// Reference path of the uploaded identity proof.
        identity_proof -> Nullable<Varchar>,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Meal bookings.
    meals (id) {
        /// Primary key.
        id -> Uuid,
        /// Booking owner.
        user_id -> Uuid,
        /// 1 or 2, enforced by a check constraint.
        meals_per_day -> Int2,
        /// At least 1.
        number_of_members -> Int8,
        /// At least 1.
        total_days -> Int8,
        /// First day, inclusive.
        start_date -> Date,
        /// Last day, inclusive.
        end_date -> Date,
        /// Price frozen at creation.
        total_amount -> Int8,
        /// `pending` or `completed`.
        payment_status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Payment records. A partial unique index allows at most one
    /// `completed` row per meal.
    payments (id) {
        /// Primary key.
        id -> Uuid,
        /// Booking paid for.
        meal_id -> Uuid,
        /// Payer.
        user_id -> Uuid,
        /// Copied from the booking total.
        amount -> Int8,
        /// `online` or `cash`.
        payment_method -> Varchar,
        /// Opaque external reference.
        transaction_id -> Nullable<Varchar>,
        /// `pending`, `completed` or `failed`.
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(payments -> meals (meal_id));
diesel::allow_tables_to_appear_in_same_query!(users, meals, payments);
