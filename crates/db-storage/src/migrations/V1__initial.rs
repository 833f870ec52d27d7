// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

use barrel::backend::Pg;
use barrel::{types, Migration};

pub fn migration() -> String {
    let mut migr = Migration::new();

    migr.create_table("users", |table| {
        table.add_column(
            "id",
            types::custom("UUID DEFAULT gen_random_uuid()").primary(true),
        );
        table.add_column("email", types::varchar(255).unique(true).nullable(false));
        table.add_column("display_name", types::varchar(255).nullable(false));
        table.add_column(
            "created_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
    });

    migr.create_table("profiles", |table| {
        table.add_column(
            "id",
            types::custom("UUID DEFAULT gen_random_uuid()").primary(true),
        );
        table.add_column(
            "user_id",
            types::custom("UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE")
                .unique(true),
        );
        table.add_column("bio", types::text().nullable(true));
        table.add_column("phone_number", types::varchar(255).nullable(true));
        table.add_column("address", types::varchar(255).nullable(true));
        table.add_column("avatar_url", types::varchar(255).nullable(true));
        table.add_column(
            "created_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
    });

    migr.create_table("events", |table| {
        table.add_column(
            "id",
            types::custom("UUID DEFAULT gen_random_uuid()").primary(true),
        );
        table.add_column(
            "created_by",
            types::custom("UUID NOT NULL REFERENCES users(id)"),
        );
        table.add_column("title", types::varchar(255).nullable(false));
        table.add_column("description", types::text().nullable(false));
        table.add_column("location", types::varchar(255).nullable(false));
        table.add_column("date", types::custom("TIMESTAMPTZ NOT NULL"));
        table.add_column(
            "created_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
    });

    migr.create_table("tags", |table| {
        table.add_column(
            "id",
            types::custom("UUID DEFAULT gen_random_uuid()").primary(true),
        );
        // tag names are not unique within an event
        table.add_column(
            "event_id",
            types::custom("UUID NOT NULL REFERENCES events(id) ON DELETE CASCADE"),
        );
        table.add_column("name", types::varchar(255).nullable(false));
    });

    migr.create_table("event_rsvps", |table| {
        table.add_column(
            "id",
            types::custom("UUID DEFAULT gen_random_uuid()").primary(true),
        );
        table.add_column(
            "event_id",
            types::custom("UUID NOT NULL REFERENCES events(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "user_id",
            types::custom("UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column("status", types::custom("rsvp_status NOT NULL"));
        table.add_column(
            "updated_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
        // at most one response per (event, user) pair
        table.inject_custom("UNIQUE (event_id, user_id)");
    });

    // the uuid defaults need pgcrypto, the status column needs the enum type
    let mut sql = String::from("CREATE EXTENSION IF NOT EXISTS pgcrypto;\n");
    sql.push_str("CREATE TYPE rsvp_status AS ENUM ('going', 'maybe', 'not_going');\n");
    sql.push_str(&migr.make::<Pg>());

    sql
}
