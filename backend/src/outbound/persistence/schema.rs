//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// User accounts.
    ///
    /// `lower(email)` carries a unique index; `updated_at` is maintained by
    /// the `users_set_updated_at` trigger.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Login email, unique case-insensitively.
        email -> Varchar,
        /// `admin` or `user`.
        role -> Varchar,
        /// Set once the address is verified; cleared on email change.
        email_verified_at -> Nullable<Timestamptz>,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Outstanding password reset tokens, one per email.
    password_reset_tokens (email) {
        /// Email the token was issued for.
        email -> Varchar,
        /// Hex SHA-256 digest of the plaintext token.
        token_digest -> Varchar,
        /// Issue time used for expiry.
        created_at -> Timestamptz,
    }
}
