//! Read-side aggregates over bookings.
//!
//! Everything here is a pure function of the booking snapshot and "today".
//! Nothing is cached, so dashboards always reflect committed state.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Meal, MealWithOwner, PaymentStatus};

/// Whether the booking is awaiting payment.
#[must_use]
pub const fn is_pending(meal: &Meal) -> bool {
    matches!(meal.payment_status, PaymentStatus::Pending)
}

/// Paid and not yet over: `endDate >= today`.
#[must_use]
pub fn is_active(meal: &Meal, today: NaiveDate) -> bool {
    meal.is_settled() && meal.end_date >= today
}

/// Paid and not yet started: `startDate > today`. Upcoming bookings are also
/// active.
#[must_use]
pub fn is_upcoming(meal: &Meal, today: NaiveDate) -> bool {
    meal.is_settled() && meal.start_date > today
}

/// Paid and over: `endDate < today`.
#[must_use]
pub fn is_past(meal: &Meal, today: NaiveDate) -> bool {
    meal.is_settled() && meal.end_date < today
}

/// Booking counts per dashboard tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseCounts {
    /// Awaiting payment.
    pub pending: u64,
    /// Paid and not yet over.
    pub active: u64,
    /// Paid and not yet started.
    pub upcoming: u64,
    /// Paid and over.
    pub past: u64,
}

/// Classify every booking relative to `today`.
#[must_use]
pub fn phase_counts(meals: &[Meal], today: NaiveDate) -> PhaseCounts {
    meals.iter().fold(PhaseCounts::default(), |mut counts, meal| {
        counts.pending += u64::from(is_pending(meal));
        counts.active += u64::from(is_active(meal, today));
        counts.upcoming += u64::from(is_upcoming(meal, today));
        counts.past += u64::from(is_past(meal, today));
        counts
    })
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Individual meals across all bookings.
    pub total_meals: u64,
    /// Sum of totals of paid bookings.
    pub total_revenue: u64,
    /// Sum of totals of unpaid bookings.
    pub pending_revenue: u64,
    /// Distinct booking owners.
    pub distinct_users: u64,
    /// Per-tab booking counts.
    pub phases: PhaseCounts,
}

/// Compute dashboard statistics from the current bookings.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use meal_ledger::domain::reconciliation::dashboard_stats;
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 1).expect("date");
/// let stats = dashboard_stats(&[], today);
/// assert_eq!(stats.total_meals, 0);
/// assert_eq!(stats.distinct_users, 0);
/// ```
#[must_use]
pub fn dashboard_stats(meals: &[Meal], today: NaiveDate) -> DashboardStats {
    let owners: HashSet<_> = meals.iter().map(|meal| meal.user_id).collect();
    let (total_revenue, pending_revenue) =
        meals
            .iter()
            .fold((0_u64, 0_u64), |(paid, unpaid), meal| match meal.payment_status {
                PaymentStatus::Completed => (paid.saturating_add(meal.total_amount), unpaid),
                PaymentStatus::Pending => (paid, unpaid.saturating_add(meal.total_amount)),
            });

    DashboardStats {
        total_meals: meals
            .iter()
            .fold(0_u64, |total, meal| total.saturating_add(meal.meal_count())),
        total_revenue,
        pending_revenue,
        distinct_users: u64::try_from(owners.len()).unwrap_or(u64::MAX),
        phases: phase_counts(meals, today),
    }
}

/// Optional filters applied to the admin booking list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// Keep only bookings in this state.
    pub status: Option<PaymentStatus>,
    /// Keep bookings that end on or after this date.
    pub from: Option<NaiveDate>,
    /// Keep bookings that start on or before this date.
    pub to: Option<NaiveDate>,
    /// Case-insensitive match on owner name, owner email or booking id.
    pub search: Option<String>,
}

impl BookingFilter {
    /// Whether the filter keeps every booking.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.from.is_none()
            && self.to.is_none()
            && self.search.as_deref().is_none_or(|term| term.trim().is_empty())
    }

    /// Whether `entry` passes every configured filter.
    #[must_use]
    pub fn matches(&self, entry: &MealWithOwner) -> bool {
        let meal = &entry.meal;
        if self.status.is_some_and(|status| status != meal.payment_status) {
            return false;
        }
        if self.from.is_some_and(|from| meal.end_date < from) {
            return false;
        }
        if self.to.is_some_and(|to| meal.start_date > to) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => matches_search(entry, &term.to_lowercase()),
            _ => true,
        }
    }
}

fn matches_search(entry: &MealWithOwner, needle: &str) -> bool {
    let in_contact = entry.user.as_ref().is_some_and(|user| {
        user.name.to_lowercase().contains(needle) || user.email.to_lowercase().contains(needle)
    });
    in_contact || entry.meal.id.to_string().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MealId, UserContact, UserId};
    use chrono::{Days, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).expect("valid date")
    }

    fn meal(
        owner: UserId,
        start: NaiveDate,
        days: u32,
        status: PaymentStatus,
        total_amount: u64,
    ) -> Meal {
        Meal {
            id: MealId::random(),
            user_id: owner,
            meals_per_day: 1,
            number_of_members: 1,
            total_days: days,
            start_date: start,
            end_date: crate::domain::booking::end_date(start, days).expect("valid range"),
            total_amount,
            payment_status: status,
            created_at: Utc::now(),
        }
    }

    fn shift(date: NaiveDate, days: i64) -> NaiveDate {
        if days >= 0 {
            date.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            date.checked_sub_days(Days::new(days.unsigned_abs()))
        }
        .expect("valid date")
    }

    #[rstest]
    fn stats_sum_meals_and_split_revenue(today: NaiveDate) {
        let alice = UserId::random();
        let bob = UserId::random();
        let meals = vec![
            meal(alice, today, 3, PaymentStatus::Completed, 210),
            meal(alice, today, 2, PaymentStatus::Pending, 140),
            meal(bob, today, 5, PaymentStatus::Pending, 350),
        ];

        let stats = dashboard_stats(&meals, today);

        assert_eq!(stats.total_meals, 10);
        assert_eq!(stats.total_revenue, 210);
        assert_eq!(stats.pending_revenue, 490);
        assert_eq!(stats.distinct_users, 2);
    }

    #[rstest]
    fn classification_is_relative_to_today(today: NaiveDate) {
        let owner = UserId::random();
        let running = meal(owner, shift(today, -2), 5, PaymentStatus::Completed, 350);
        let future = meal(owner, shift(today, 3), 2, PaymentStatus::Completed, 140);
        let finished = meal(owner, shift(today, -10), 3, PaymentStatus::Completed, 210);
        let unpaid = meal(owner, shift(today, 1), 1, PaymentStatus::Pending, 70);

        assert!(is_active(&running, today) && !is_upcoming(&running, today));
        assert!(is_active(&future, today) && is_upcoming(&future, today));
        assert!(is_past(&finished, today) && !is_active(&finished, today));
        assert!(is_pending(&unpaid) && !is_active(&unpaid, today));

        let counts = phase_counts(&[running, future, finished, unpaid], today);
        assert_eq!(
            counts,
            PhaseCounts {
                pending: 1,
                active: 2,
                upcoming: 1,
                past: 1
            }
        );
    }

    #[rstest]
    fn booking_ending_today_is_still_active(today: NaiveDate) {
        let ends_today = meal(UserId::random(), shift(today, -1), 2, PaymentStatus::Completed, 140);
        assert!(is_active(&ends_today, today));
        assert!(!is_past(&ends_today, today));
    }

    fn owned(meal: Meal, name: &str, email: &str) -> MealWithOwner {
        MealWithOwner {
            meal,
            user: Some(UserContact {
                name: name.to_owned(),
                email: email.to_owned(),
                phone: "555-0100".to_owned(),
            }),
        }
    }

    #[rstest]
    fn date_filter_keeps_overlapping_bookings(today: NaiveDate) {
        let entry = owned(
            meal(UserId::random(), today, 5, PaymentStatus::Pending, 350),
            "Asha",
            "asha@example.com",
        );
        let overlapping = BookingFilter {
            from: Some(shift(today, 4)),
            to: Some(shift(today, 20)),
            ..BookingFilter::default()
        };
        let after = BookingFilter {
            from: Some(shift(today, 5)),
            ..BookingFilter::default()
        };
        let before = BookingFilter {
            to: Some(shift(today, -1)),
            ..BookingFilter::default()
        };

        assert!(overlapping.matches(&entry));
        assert!(!after.matches(&entry));
        assert!(!before.matches(&entry));
    }

    #[rstest]
    #[case("ASHA", true)]
    #[case("example.com", true)]
    #[case("nobody", false)]
    #[case("   ", true)]
    fn search_matches_contact_fields(today: NaiveDate, #[case] term: &str, #[case] kept: bool) {
        let entry = owned(
            meal(UserId::random(), today, 1, PaymentStatus::Pending, 70),
            "Asha Rao",
            "asha@example.com",
        );
        let filter = BookingFilter {
            search: Some(term.to_owned()),
            ..BookingFilter::default()
        };
        assert_eq!(filter.matches(&entry), kept);
    }

    #[rstest]
    fn search_matches_booking_id_without_owner(today: NaiveDate) {
        let booking = meal(UserId::random(), today, 1, PaymentStatus::Pending, 70);
        let id_prefix: String = booking.id.to_string().chars().take(8).collect();
        let entry = MealWithOwner {
            meal: booking,
            user: None,
        };
        let filter = BookingFilter {
            search: Some(id_prefix.to_uppercase()),
            ..BookingFilter::default()
        };
        assert!(filter.matches(&entry));
    }

    #[rstest]
    fn status_filter_excludes_other_states(today: NaiveDate) {
        let entry = owned(
            meal(UserId::random(), today, 1, PaymentStatus::Pending, 70),
            "Asha",
            "asha@example.com",
        );
        let filter = BookingFilter {
            status: Some(PaymentStatus::Completed),
            ..BookingFilter::default()
        };
        assert!(!filter.matches(&entry));
        assert!(!filter.is_empty());
    }
}
