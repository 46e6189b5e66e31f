//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name (max 64 characters).
        name -> Varchar,
        /// Unique login email, stored lowercased.
        email -> Varchar,
        /// Authorisation role token: `user` or `admin`.
        role -> Varchar,
        /// bcrypt hash of the password.
        password_hash -> Varchar,
        /// SHA-256 fingerprint of the active bearer token, if any.
        token_fingerprint -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Citizen-submitted complaints.
    complaints (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user; immutable after insert.
        reporter_id -> Uuid,
        /// Short summary of the issue.
        title -> Varchar,
        /// Full description of the issue.
        description -> Text,
        /// Category token: `INFRASTRUCTURE`, `PUBLIC_SERVICE`, or `OTHER`.
        category -> Varchar,
        /// Priority token: `LOW`, `MEDIUM`, or `HIGH`.
        priority -> Varchar,
        /// Latitude in decimal degrees.
        latitude -> Float8,
        /// Longitude in decimal degrees.
        longitude -> Float8,
        /// Free-text address.
        address -> Text,
        /// Attached image URLs, in submission order.
        images -> Array<Text>,
        /// Status token: `OPEN`, `IN_PROGRESS`, or `CLOSED`.
        status -> Varchar,
        /// Record creation timestamp; listing sorts on this, descending.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(complaints -> users (reporter_id));

diesel::allow_tables_to_appear_in_same_query!(complaints, users);
