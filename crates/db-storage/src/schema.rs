// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

table! {
    use crate::sql_types::*;

    events (id) {
        id -> Uuid,
        created_by -> Uuid,
        title -> Varchar,
        description -> Text,
        location -> Varchar,
        date -> Timestamptz,
        created_at -> Timestamptz,
    }
}

table! {
    use crate::sql_types::*;

    event_rsvps (id) {
        id -> Uuid,
        event_id -> Uuid,
        user_id -> Uuid,
        status -> Rsvp_status,
        updated_at -> Timestamptz,
    }
}

table! {
    use crate::sql_types::*;

    profiles (id) {
        id -> Uuid,
        user_id -> Uuid,
        bio -> Nullable<Text>,
        phone_number -> Nullable<Varchar>,
        address -> Nullable<Varchar>,
        avatar_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

table! {
    use crate::sql_types::*;

    refinery_schema_history (version) {
        version -> Int4,
        name -> Nullable<Varchar>,
        applied_on -> Nullable<Varchar>,
        checksum -> Nullable<Varchar>,
    }
}

table! {
    use crate::sql_types::*;

    tags (id) {
        id -> Uuid,
        event_id -> Uuid,
        name -> Varchar,
    }
}

table! {
    use crate::sql_types::*;

    users (id) {
        id -> Uuid,
        email -> Varchar,
        display_name -> Varchar,
        created_at -> Timestamptz,
    }
}

joinable!(events -> users (created_by));
joinable!(event_rsvps -> events (event_id));
joinable!(event_rsvps -> users (user_id));
joinable!(profiles -> users (user_id));
joinable!(tags -> events (event_id));

allow_tables_to_appear_in_same_query!(
    events,
    event_rsvps,
    profiles,
    refinery_schema_history,
    tags,
    users,
);
