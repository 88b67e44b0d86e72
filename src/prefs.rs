use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::{error::PrefsError, models::{inventory::SteamId, web::STEAMID_PREF_KEY}};

/// Small persisted key/value store, in practice only holding the last used SteamID64.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;

    ///A stored value that no longer validates is treated as missing.
    fn last_steamid(&self) -> Result<Option<SteamId>, PrefsError> {
        Ok( match self.get(STEAMID_PREF_KEY)? {
            Some(saved) => match SteamId::parse(&saved) {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(saved = %saved, "ignoring invalid saved steamid");
                    None
                }
            },
            None => None,
        })
    }

    fn remember_steamid(&self, steamid: &SteamId) -> Result<(), PrefsError> {
        self.set(STEAMID_PREF_KEY, steamid.as_str())
    }
}

pub struct SqlitePreferences {
    conn: Connection,
}

impl SqlitePreferences {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PrefsError> {
        Self::init( Connection::open(path)? )
    }

    pub fn in_memory() -> Result<Self, PrefsError> {
        Self::init( Connection::open_in_memory()? )
    }

    fn init(conn: Connection) -> Result<Self, PrefsError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS preferences (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );"
        )?;
        Ok( SqlitePreferences { conn } )
    }
}

impl PreferenceStore for SqlitePreferences {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        let value = self.conn
            .query_row("SELECT value FROM preferences WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let now = chrono::Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_overwrites() {
        let prefs = SqlitePreferences::in_memory().unwrap();
        assert_eq!(prefs.get("steamid64").unwrap(), None);

        prefs.set("steamid64", "76561198000000000").unwrap();
        prefs.set("steamid64", "76561198000000001").unwrap();
        assert_eq!(prefs.get("steamid64").unwrap().as_deref(), Some("76561198000000001"));
    }

    #[test]
    fn remembers_last_steamid() {
        let prefs = SqlitePreferences::in_memory().unwrap();
        assert_eq!(prefs.last_steamid().unwrap(), None);

        let id = SteamId::parse("76561198000000000").unwrap();
        prefs.remember_steamid(&id).unwrap();
        assert_eq!(prefs.last_steamid().unwrap(), Some(id));
    }

    #[test]
    fn garbage_in_the_store_is_ignored() {
        let prefs = SqlitePreferences::in_memory().unwrap();
        prefs.set(STEAMID_PREF_KEY, "not a steamid").unwrap();
        assert_eq!(prefs.last_steamid().unwrap(), None);
    }

    #[test]
    fn updated_at_is_recorded() {
        let prefs = SqlitePreferences::in_memory().unwrap();
        prefs.set("k", "v").unwrap();

        let stamp: String = prefs.conn
            .query_row("SELECT updated_at FROM preferences WHERE key = 'k'", [], |row| row.get(0))
            .unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
