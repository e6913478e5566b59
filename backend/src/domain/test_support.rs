//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{AuthenticatedUser, Email, Role, UserAccount, UserId};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    clock_at(fixture_timestamp())
}

pub(crate) fn clock_at(utc_now: DateTime<Utc>) -> Arc<dyn Clock> {
    Arc::new(FixtureClock { utc_now })
}

pub(crate) fn account(role: Role, email: &str) -> UserAccount {
    UserAccount {
        id: UserId::random(),
        email: Email::new(email).expect("fixture email"),
        role,
        password_hash: "$argon2id$fixture".to_owned(),
        force_password_reset: false,
        created_by: None,
        last_login: None,
        created_at: fixture_timestamp(),
    }
}

pub(crate) fn actor(role: Role) -> AuthenticatedUser {
    AuthenticatedUser::from(&account(role, &format!("{}@example.com", role.as_str())))
}
