//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        /// Argon2id hash in PHC string format.
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Named authorisation levels.
    roles (id) {
        id -> Uuid,
        name -> Varchar,
        auth_level -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// User to role associations; rows cascade with either side.
    role_users (user_id, role_id) {
        user_id -> Uuid,
        role_id -> Uuid,
    }
}

diesel::table! {
    /// Tasks owned by exactly one user.
    todos (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Varchar,
        is_completed -> Bool,
        user_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(role_users -> users (user_id));
diesel::joinable!(role_users -> roles (role_id));
diesel::joinable!(todos -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, roles, role_users, todos);
