//! Diesel schema for the marketplace document tables.

diesel::table! {
    /// Task documents with the columns used for filtering and versioning.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Posting user.
        poster_id -> Uuid,
        /// Lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Task category label.
        #[max_length = 64]
        category -> Varchar,
        /// Full task aggregate as JSON.
        document -> Jsonb,
        /// Optimistic-concurrency version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Provider profile documents.
    providers (id) {
        /// Provider user identifier.
        id -> Uuid,
        /// Full provider profile as JSON.
        document -> Jsonb,
        /// Optimistic-concurrency version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Chat message documents in insertion order.
    chat_messages (sequence) {
        /// Insertion sequence used to break send-time ties.
        sequence -> Int8,
        /// Message identifier.
        id -> Uuid,
        /// Task the conversation is about.
        task_id -> Uuid,
        /// Sending user.
        sender_id -> Uuid,
        /// Receiving user.
        receiver_id -> Uuid,
        /// Full message as JSON.
        document -> Jsonb,
        /// Send timestamp.
        sent_at -> Timestamptz,
        /// Read receipt timestamp.
        read_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(tasks, providers, chat_messages);
