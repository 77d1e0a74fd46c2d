//! Diesel table definitions. Must match `backend/migrations`.

diesel::table! {
    /// Accounts owned by the authentication service; read for identity
    /// joins and recipient lookup.
    users (id) {
        id -> Int8,
        username -> Varchar,
        email -> Varchar,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    complaints (id) {
        id -> Int8,
        user_id -> Int8,
        title -> Text,
        description -> Text,
        category -> Nullable<Text>,
        visibility -> Varchar,
        urgency -> Varchar,
        status -> Varchar,
        escalated_to -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Attachment tokens in upload order.
    complaint_files (id) {
        id -> Int8,
        complaint_id -> Int8,
        file_token -> Text,
        position -> Int4,
    }
}

diesel::table! {
    /// Append-only notes (`kind = 'note'`) and replies (`kind = 'reply'`).
    thread_entries (id) {
        id -> Int8,
        complaint_id -> Int8,
        kind -> Varchar,
        author_id -> Int8,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(complaints -> users (user_id));
diesel::joinable!(complaint_files -> complaints (complaint_id));
diesel::joinable!(thread_entries -> complaints (complaint_id));
diesel::joinable!(thread_entries -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, complaints, complaint_files, thread_entries);
