// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use event_booking_domain::{OrganizerStatus, Role};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{ProfileChanges, format_timestamp};
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::queries::count_admins;

#[derive(Insertable)]
#[diesel(table_name = users)]
struct NewUserRow<'a> {
    email: &'a str,
    full_name: &'a str,
    password_hash: &'a str,
    role: &'a str,
    status: Option<&'a str>,
    is_disabled: i32,
    created_at: &'a str,
}

fn duplicate_email(email: &str) -> impl FnOnce(PersistenceError) -> PersistenceError + '_ {
    move |err| match err {
        PersistenceError::UniqueViolation(_) => PersistenceError::DuplicateEmail(email.to_string()),
        other => other,
    }
}

/// Creates a new account.
///
/// The caller supplies an already normalized email and an already hashed
/// password.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateEmail` if the email is taken, or
/// another error if the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    email: &str,
    full_name: &str,
    password_hash: &str,
    role: Role,
    status: Option<OrganizerStatus>,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(OffsetDateTime::now_utc())?;

    diesel::insert_into(users::table)
        .values(NewUserRow {
            email,
            full_name,
            password_hash,
            role: role.as_str(),
            status: status.as_ref().map(OrganizerStatus::as_str),
            is_disabled: 0,
            created_at: &created_at,
        })
        .execute(conn)
        .map_err(PersistenceError::from)
        .map_err(duplicate_email(email))?;

    let user_id: i64 = get_last_insert_rowid(conn)?;

    info!(user_id, role = %role, "User created");
    Ok(user_id)
}

/// Creates the first admin account.
///
/// The admin count and the insert run in one immediate transaction, so when
/// several connections race only one of them creates an admin.
///
/// # Errors
///
/// Returns `PersistenceError::AdminAlreadyExists` if any admin account
/// exists, `PersistenceError::DuplicateEmail` if the email is taken, or
/// another error if a statement fails.
pub fn create_first_admin(
    conn: &mut SqliteConnection,
    email: &str,
    full_name: &str,
    password_hash: &str,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let admins: i64 = count_admins(conn)?;
        if admins > 0 {
            debug!(admins, "Admin bootstrap refused");
            return Err(PersistenceError::AdminAlreadyExists);
        }

        create_user(conn, email, full_name, password_hash, Role::Admin, None)
    })
}

/// Sets the approval status of an organizer account.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no organizer has this ID.
pub fn set_organizer_status(
    conn: &mut SqliteConnection,
    user_id: i64,
    status: OrganizerStatus,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .filter(users::role.eq(Role::Organizer.as_str()))
        .set(users::status.eq(status.as_str()))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("organizer {user_id}")));
    }

    info!(user_id, status = %status, "Organizer status updated");
    Ok(())
}

/// Sets or clears the disabled flag of an account.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no user has this ID.
pub fn set_user_disabled(
    conn: &mut SqliteConnection,
    user_id: i64,
    disabled: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::is_disabled.eq(i32::from(disabled)))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("user {user_id}")));
    }

    info!(user_id, disabled, "User disabled flag updated");
    Ok(())
}

/// Overwrites the profile fields present in `changes`.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateEmail` if the new email is taken,
/// `PersistenceError::NotFound` if no user has this ID, or another error if
/// the update fails.
pub fn update_user_profile(
    conn: &mut SqliteConnection,
    user_id: i64,
    changes: &ProfileChanges,
) -> Result<(), PersistenceError> {
    if changes.is_empty() {
        debug!(user_id, "Profile update carries no changes");
        return Ok(());
    }

    let new_email: &str = changes.email.as_deref().unwrap_or_default();
    let updated: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(changes)
        .execute(conn)
        .map_err(PersistenceError::from)
        .map_err(duplicate_email(new_email))?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("user {user_id}")));
    }

    info!(
        user_id,
        email_changed = changes.email.is_some(),
        name_changed = changes.full_name.is_some(),
        password_changed = changes.password_hash.is_some(),
        "User profile updated"
    );
    Ok(())
}
