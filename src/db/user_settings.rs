//! Notification settings, one row per user

use diesel::prelude::*;

use super::diesel_schema::user_settings;
use super::models::UserSettings;
use crate::error::GenmaveError;

/// Stored settings, or the defaults if the user never changed anything
pub fn get_or_default(conn: &mut SqliteConnection, user_id: &str) -> Result<UserSettings, GenmaveError> {
    let stored = user_settings::table
        .filter(user_settings::user_id.eq(user_id))
        .select(UserSettings::as_select())
        .first(conn)
        .optional()?;
    Ok(stored.unwrap_or_else(|| UserSettings::defaults_for(user_id)))
}

pub fn upsert(conn: &mut SqliteConnection, settings: &UserSettings) -> Result<(), GenmaveError> {
    diesel::insert_into(user_settings::table)
        .values(settings)
        .on_conflict(user_settings::user_id)
        .do_update()
        .set(settings)
        .execute(conn)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_defaults_then_upsert() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let mut settings = get_or_default(conn, "u1")?;
            assert!(settings.email_notifications);
            assert!(settings.reflection_reminders);

            settings.email_notifications = false;
            upsert(conn, &settings)?;
            settings.reflection_reminders = false;
            upsert(conn, &settings)?;

            let stored = get_or_default(conn, "u1")?;
            assert!(!stored.email_notifications);
            assert!(!stored.reflection_reminders);
            assert!(get_or_default(conn, "u2")?.email_notifications);
            Ok(())
        })
        .unwrap();
    }
}
