//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Staff accounts.
    users (id) {
        id -> Uuid,
        /// Lower-cased, unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// One of `user`, `admin`, `ceo`.
        role -> Text,
        force_password_reset -> Bool,
        /// Reviewer who created the account; cleared when they are deleted.
        created_by -> Nullable<Uuid>,
        last_login -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// SHA-256 digests of outstanding refresh tokens.
    refresh_tokens (id) {
        id -> Int8,
        user_id -> Uuid,
        token_hash -> Bpchar,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail.
    audit_logs (id) {
        id -> Int8,
        action -> Text,
        user_id -> Nullable<Uuid>,
        meta -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Depot visits.
    submissions_depo (id) {
        id -> Uuid,
        user_id -> Uuid,
        area -> Varchar,
        accompanied_by -> Nullable<Varchar>,
        person_met -> Varchar,
        competition_activity -> Text,
        discussion -> Nullable<Text>,
        outcome -> Nullable<Text>,
        submitted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Vendor visits.
    submissions_vendor (id) {
        id -> Uuid,
        user_id -> Uuid,
        area -> Varchar,
        accompanied_by -> Nullable<Varchar>,
        vendor_name -> Varchar,
        phone -> Varchar,
        outcome -> Nullable<Text>,
        submitted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Dealer collection visits.
    submissions_dealer (id) {
        id -> Uuid,
        user_id -> Uuid,
        area -> Varchar,
        accompanied_by -> Nullable<Varchar>,
        dealer_name -> Varchar,
        dues_amount -> Nullable<Float8>,
        collection_mode -> Nullable<Varchar>,
        collection_amount -> Nullable<Float8>,
        /// Array of `{name, number}` objects.
        competition_newspapers -> Jsonb,
        discussion -> Nullable<Text>,
        outcome -> Nullable<Text>,
        submitted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Stall collection visits.
    submissions_stall (id) {
        id -> Uuid,
        user_id -> Uuid,
        area -> Varchar,
        accompanied_by -> Nullable<Varchar>,
        stall_owner -> Varchar,
        dues_amount -> Nullable<Float8>,
        collection_mode -> Nullable<Varchar>,
        collection_amount -> Nullable<Float8>,
        competition_newspapers -> Jsonb,
        discussion -> Nullable<Text>,
        outcome -> Nullable<Text>,
        submitted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reader surveys.
    submissions_reader (id) {
        id -> Uuid,
        user_id -> Uuid,
        area -> Varchar,
        reader_name -> Varchar,
        contact_details -> Varchar,
        present_reading -> Array<Text>,
        readers_feedback -> Nullable<Text>,
        submitted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Out-of-home (institutional) surveys.
    submissions_ooh (id) {
        id -> Uuid,
        user_id -> Uuid,
        area -> Varchar,
        segment -> Varchar,
        contact_person -> Varchar,
        existing_newspaper -> Array<Text>,
        feedback_suggestion -> Nullable<Text>,
        submitted_at -> Timestamptz,
    }
}

diesel::joinable!(refresh_tokens -> users (user_id));
diesel::joinable!(submissions_depo -> users (user_id));
diesel::joinable!(submissions_vendor -> users (user_id));
diesel::joinable!(submissions_dealer -> users (user_id));
diesel::joinable!(submissions_stall -> users (user_id));
diesel::joinable!(submissions_reader -> users (user_id));
diesel::joinable!(submissions_ooh -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    refresh_tokens,
    audit_logs,
    submissions_depo,
    submissions_vendor,
    submissions_dealer,
    submissions_stall,
    submissions_reader,
    submissions_ooh,
);
