// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

use database::DatabaseError;
use muster_db_storage::profiles::{NewProfile, Profile, UpdateProfile};
use pretty_assertions::assert_eq;
use serial_test::serial;

use crate::common::make_user;

mod common;

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn at_most_one_profile_per_user() {
    let db = common::setup().await;
    let mut conn = db.get_conn().unwrap();

    let user = make_user(&mut conn, "User");

    let profile = NewProfile {
        user_id: user.id,
        bio: Some("hello".into()),
        phone_number: None,
        address: None,
    }
    .try_insert(&mut conn)
    .unwrap()
    .expect("first create must succeed");

    // the second create hits the unique index and yields None
    let second = NewProfile {
        user_id: user.id,
        bio: Some("again".into()),
        phone_number: None,
        address: None,
    }
    .try_insert(&mut conn)
    .unwrap();
    assert_eq!(second, None);

    // the first profile is unaffected
    let unchanged = Profile::get(&mut conn, profile.id).unwrap();
    assert_eq!(unchanged, profile);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn only_the_owner_may_modify() {
    let db = common::setup().await;
    let mut conn = db.get_conn().unwrap();

    let owner = make_user(&mut conn, "Owner");
    let other = make_user(&mut conn, "Other");

    let profile = NewProfile {
        user_id: owner.id,
        bio: None,
        phone_number: None,
        address: None,
    }
    .try_insert(&mut conn)
    .unwrap()
    .unwrap();

    let result = UpdateProfile {
        bio: Some(Some("not yours".into())),
        phone_number: None,
        address: None,
    }
    .apply_owned(&mut conn, other.id, profile.id);
    assert!(matches!(result, Err(DatabaseError::NotFound)));

    let result = Profile::delete_owned(&mut conn, other.id, profile.id);
    assert!(matches!(result, Err(DatabaseError::NotFound)));

    // the owner may
    let updated = UpdateProfile {
        bio: Some(Some("mine".into())),
        phone_number: None,
        address: None,
    }
    .apply_owned(&mut conn, owner.id, profile.id)
    .unwrap();
    assert_eq!(updated.bio.as_deref(), Some("mine"));

    Profile::delete_owned(&mut conn, owner.id, profile.id).unwrap();
    let gone = Profile::get_for_user(&mut conn, owner.id).unwrap();
    assert_eq!(gone, None);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn avatar_reference_is_stored_on_the_profile() {
    let db = common::setup().await;
    let mut conn = db.get_conn().unwrap();

    let user = make_user(&mut conn, "User");

    // without a profile there is nothing to attach the avatar to
    let result = Profile::set_avatar_url(&mut conn, user.id, "https://cdn.example.org/a.png");
    assert!(matches!(result, Err(DatabaseError::NotFound)));

    NewProfile {
        user_id: user.id,
        bio: None,
        phone_number: None,
        address: None,
    }
    .try_insert(&mut conn)
    .unwrap()
    .unwrap();

    let updated =
        Profile::set_avatar_url(&mut conn, user.id, "https://cdn.example.org/a.png").unwrap();
    assert_eq!(
        updated.avatar_url.as_deref(),
        Some("https://cdn.example.org/a.png")
    );
}
