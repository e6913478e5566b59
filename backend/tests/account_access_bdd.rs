//! Behaviour tests for the account management matrix and the
//! force-password-reset gate.
//!
//! Scenarios drive the public authorisation rules directly, so they run
//! without a database or HTTP server.

use chrono::{TimeZone, Utc};
use field_reports::domain::access::{
    ensure_can_create, ensure_can_delete, ensure_can_reset_password,
};
use field_reports::domain::{
    AuthenticatedUser, Email, Error, ErrorCode, Role, UserAccount, UserId,
    ensure_password_current,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::json;

#[derive(Default, ScenarioState)]
struct AccessWorld {
    actor: Slot<AuthenticatedUser>,
    target: Slot<UserAccount>,
    outcome: Slot<Result<(), Error>>,
}

impl AccessWorld {
    fn actor(&self) -> AuthenticatedUser {
        self.actor.get().expect("a signed-in actor")
    }

    fn target(&self) -> UserAccount {
        self.target.get().expect("a target account")
    }

    fn outcome(&self) -> Result<(), Error> {
        self.outcome.get().expect("an outcome should be recorded")
    }

    fn rejection(&self) -> Error {
        self.outcome().expect_err("the request should be rejected")
    }
}

#[fixture]
fn world() -> AccessWorld {
    AccessWorld::default()
}

fn parse_role(raw: &str) -> Role {
    raw.parse().expect("known role")
}

fn account(role: Role, created_by: Option<UserId>) -> UserAccount {
    UserAccount {
        id: UserId::random(),
        email: Email::new(format!("{}.{}@example.com", role.as_str(), UserId::random()))
            .expect("valid email"),
        role,
        password_hash: "hash".to_owned(),
        force_password_reset: false,
        created_by,
        last_login: None,
        created_at: Utc
            .with_ymd_and_hms(2025, 1, 6, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("a signed-in {role}")]
fn a_signed_in(world: &AccessWorld, role: String) {
    let account = account(parse_role(&role), None);
    world.actor.set(AuthenticatedUser::from(&account));
}

#[given("a flagged account awaiting a password reset")]
fn a_flagged_account(world: &AccessWorld) {
    let mut flagged = account(Role::User, None);
    flagged.force_password_reset = true;
    world.actor.set(AuthenticatedUser::from(&flagged));
}

#[given("an admin account created by the signed-in reviewer")]
fn an_admin_created_by_the_reviewer(world: &AccessWorld) {
    world
        .target
        .set(account(Role::Admin, Some(world.actor().id)));
}

#[given("a field staff account created by the signed-in reviewer")]
fn field_staff_created_by_the_reviewer(world: &AccessWorld) {
    world
        .target
        .set(account(Role::User, Some(world.actor().id)));
}

#[given("an admin account created by someone else")]
fn an_admin_created_by_someone_else(world: &AccessWorld) {
    world
        .target
        .set(account(Role::Admin, Some(UserId::random())));
}

#[given("the ceo account as the target")]
fn the_ceo_account_as_the_target(world: &AccessWorld) {
    world.target.set(account(Role::Ceo, None));
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("they create an account with role {role}")]
fn they_create_an_account(world: &AccessWorld, role: String) {
    let outcome = ensure_can_create(&world.actor(), parse_role(&role));
    world.outcome.set(outcome);
}

#[when("they reset the password of that account")]
fn they_reset_the_password(world: &AccessWorld) {
    let outcome = ensure_can_reset_password(&world.actor(), &world.target());
    world.outcome.set(outcome);
}

#[when("they delete that account")]
fn they_delete_that_account(world: &AccessWorld) {
    let outcome = ensure_can_delete(&world.actor(), &world.target());
    world.outcome.set(outcome);
}

#[when("they pass the password gate")]
fn they_pass_the_password_gate(world: &AccessWorld) {
    let outcome = ensure_password_current(&world.actor());
    world.outcome.set(outcome);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the request is allowed")]
fn the_request_is_allowed(world: &AccessWorld) {
    if let Err(err) = world.outcome() {
        panic!("expected the request to be allowed, got {err:?}");
    }
}

#[then("the request is rejected as forbidden")]
fn the_request_is_rejected_as_forbidden(world: &AccessWorld) {
    assert_eq!(world.rejection().code(), ErrorCode::Forbidden);
}

#[then("the request is rejected as invalid")]
fn the_request_is_rejected_as_invalid(world: &AccessWorld) {
    assert_eq!(world.rejection().code(), ErrorCode::InvalidRequest);
}

#[then("the rejection says {message}")]
fn the_rejection_says(world: &AccessWorld, message: String) {
    assert_eq!(world.rejection().message(), message);
}

#[then("the rejection asks for a password reset")]
fn the_rejection_asks_for_a_password_reset(world: &AccessWorld) {
    let err = world.rejection();
    assert_eq!(err.message(), "Password reset required");
    assert_eq!(err.details(), Some(&json!({ "forceReset": true })));
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/account_access.feature",
    name = "The CEO creates an admin account"
)]
fn ceo_creates_admin(world: AccessWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_access.feature",
    name = "An admin creates a field staff account"
)]
fn admin_creates_field_staff(world: AccessWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_access.feature",
    name = "An admin cannot create another admin"
)]
fn admin_cannot_create_admin(world: AccessWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_access.feature",
    name = "Nobody creates a second CEO"
)]
fn nobody_creates_a_ceo(world: AccessWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_access.feature",
    name = "Field staff cannot manage accounts"
)]
fn field_staff_cannot_manage_accounts(world: AccessWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_access.feature",
    name = "An admin cannot reset an admin they created"
)]
fn admin_cannot_reset_managed_admin(world: AccessWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_access.feature",
    name = "An admin resets field staff they created"
)]
fn admin_resets_managed_field_staff(world: AccessWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_access.feature",
    name = "An admin cannot reset an unrelated admin"
)]
fn admin_cannot_reset_unrelated_admin(world: AccessWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_access.feature",
    name = "The CEO account cannot be deleted"
)]
fn ceo_account_cannot_be_deleted(world: AccessWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_access.feature",
    name = "Flagged accounts are held at the password gate"
)]
fn flagged_accounts_are_gated(world: AccessWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_access.feature",
    name = "Current accounts pass the password gate"
)]
fn current_accounts_pass_the_gate(world: AccessWorld) {
    let _ = world;
}
