//! Diesel schema for task storage.

diesel::table! {
    /// Task records owned by application users.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Identifier of the owning user.
        #[max_length = 255]
        owner_id -> Varchar,
        /// Display title.
        title -> Text,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Completion flag.
        completed -> Bool,
        /// In-progress flag; meaningful only while not completed.
        in_progress -> Bool,
        /// Optional priority (`low`, `medium`, `high`).
        #[max_length = 16]
        priority -> Nullable<Varchar>,
        /// Optional category (`work`, `personal`, `study`).
        #[max_length = 16]
        category -> Nullable<Varchar>,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
