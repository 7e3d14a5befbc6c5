//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// User profile documents.
    users (uid) {
        /// Identity key issued by the identity provider.
        uid -> Text,
        display_name -> Text,
        email -> Text,
        photo_url -> Text,
        /// `citizen` or `government`; other values read as no role.
        role -> Nullable<Text>,
        push_token -> Nullable<Text>,
        created_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Complaint documents. Business fields are nullable so the as-written
    /// document survives until intake validates it.
    complaints (id) {
        id -> Text,
        title -> Nullable<Text>,
        description -> Nullable<Text>,
        category -> Nullable<Text>,
        author_id -> Nullable<Text>,
        status -> Nullable<Text>,
        upvote_count -> Nullable<Int8>,
        comment_count -> Nullable<Int8>,
        /// JSON array of `{from, to, changedAt}` objects.
        status_history -> Jsonb,
        created_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// One row per (complaint, user) upvote.
    complaint_upvotes (complaint_id, user_id) {
        complaint_id -> Text,
        user_id -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only comments.
    complaint_comments (id) {
        id -> Uuid,
        complaint_id -> Text,
        author_id -> Text,
        author_name -> Text,
        text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// In-app notifications keyed under their recipient.
    notifications (id) {
        id -> Uuid,
        recipient -> Text,
        title -> Text,
        body -> Text,
        read -> Bool,
        extra -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(complaint_upvotes -> complaints (complaint_id));
diesel::joinable!(complaint_comments -> complaints (complaint_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    complaints,
    complaint_upvotes,
    complaint_comments,
    notifications,
);
