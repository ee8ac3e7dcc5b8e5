use crate::models::error::SError;
use crate::models::mod_dto::ModEntry;
use crate::models::profile::{Profile, ProfileUpdate, DEFAULT_PROFILE_ID, DEFAULT_PROFILE_NAME};
use crate::utils::time::{now_millis, to_iso};
use camino::Utf8Path;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use tracing::{debug, info};

const PROFILE_COLUMNS: &str =
    "id, name, enabled_mods, load_order, notes, readonly, is_active, created_at, updated_at";

/// SQLite-backed profile persistence.
pub struct ProfileStore {
    conn: Connection,
}

/// A row as stored; list columns are still JSON text.
struct ProfileRow {
    id: String,
    name: String,
    enabled_mods: String,
    load_order: String,
    notes: Option<String>,
    readonly: bool,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

impl ProfileRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            enabled_mods: row.get(2)?,
            load_order: row.get(3)?,
            notes: row.get(4)?,
            readonly: row.get(5)?,
            is_active: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_profile(self) -> Result<Profile, SError> {
        Ok(Profile {
            enabled_mods: serde_json::from_str(&self.enabled_mods)?,
            load_order: serde_json::from_str(&self.load_order)?,
            id: self.id,
            name: self.name,
            notes: self.notes,
            readonly: self.readonly,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ProfileStore {
    /// Opens (or creates) the database file.
    pub fn open(path: &Utf8Path) -> Result<Self, SError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, SError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), SError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                enabled_mods TEXT NOT NULL DEFAULT '[]',
                load_order TEXT NOT NULL DEFAULT '[]',
                notes TEXT,
                readonly INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    // ========== CRUD ==========

    pub fn create(&self, name: &str, enabled_mods: BTreeSet<String>) -> Result<Profile, SError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.insert(&id, name, enabled_mods)
    }

    fn insert(&self, id: &str, name: &str, enabled_mods: BTreeSet<String>) -> Result<Profile, SError> {
        let now = to_iso(now_millis());
        let profile = Profile {
            id: id.to_string(),
            name: name.to_string(),
            load_order: enabled_mods.iter().cloned().collect(),
            enabled_mods,
            notes: None,
            readonly: false,
            is_active: false,
            created_at: now.clone(),
            updated_at: now,
        };

        self.conn.execute(
            r#"
            INSERT INTO profiles (id, name, enabled_mods, load_order, notes, readonly, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                profile.id,
                profile.name,
                serde_json::to_string(&profile.enabled_mods)?,
                serde_json::to_string(&profile.load_order)?,
                profile.notes,
                profile.readonly,
                profile.is_active,
                profile.created_at,
                profile.updated_at,
            ],
        )?;

        info!("created profile {} ({})", profile.name, profile.id);
        Ok(profile)
    }

    pub fn get(&self, id: &str) -> Result<Option<Profile>, SError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
                params![id],
                ProfileRow::from_row,
            )
            .optional()?;
        row.map(ProfileRow::into_profile).transpose()
    }

    /// Like [`get`](Self::get), with a missing profile as `NotFound`.
    pub fn require(&self, id: &str) -> Result<Profile, SError> {
        self.get(id)?
            .ok_or_else(|| SError::NotFound(format!("profile {id}")))
    }

    pub fn list(&self) -> Result<Vec<Profile>, SError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at, name"
        ))?;
        let rows = stmt.query_map([], ProfileRow::from_row)?;

        let profiles = rows
            .map(|row| row.map_err(SError::from).and_then(ProfileRow::into_profile))
            .collect();
        profiles
    }

    pub fn count(&self) -> Result<usize, SError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?;
        Ok(n.max(0) as usize)
    }

    pub fn update(&self, id: &str, changes: ProfileUpdate) -> Result<Profile, SError> {
        let mut profile = self.require(id)?;
        if let Some(name) = changes.name {
            profile.name = name;
        }
        if let Some(enabled) = changes.enabled_mods {
            profile.enabled_mods = enabled;
        }
        if let Some(order) = changes.load_order {
            profile.load_order = order;
        }
        if let Some(notes) = changes.notes {
            profile.notes = Some(notes).filter(|n| !n.is_empty());
        }
        self.save(&mut profile)?;
        Ok(profile)
    }

    /// Writes every mutable column of `profile` and bumps `updated_at`.
    pub fn save(&self, profile: &mut Profile) -> Result<(), SError> {
        profile.updated_at = to_iso(now_millis());
        let changed = self.conn.execute(
            r#"
            UPDATE profiles
            SET name = ?2, enabled_mods = ?3, load_order = ?4, notes = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
            params![
                profile.id,
                profile.name,
                serde_json::to_string(&profile.enabled_mods)?,
                serde_json::to_string(&profile.load_order)?,
                profile.notes,
                profile.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(SError::NotFound(format!("profile {}", profile.id)));
        }
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), SError> {
        let profile = self.require(id)?;
        if profile.readonly {
            return Err(SError::ReadonlyProfile(id.to_string()));
        }
        self.conn
            .execute("DELETE FROM profiles WHERE id = ?1", params![id])?;
        info!("deleted profile {} ({id})", profile.name);
        Ok(())
    }

    /// Marks `id` active and clears the flag everywhere else.
    pub fn set_active(&self, id: &str) -> Result<(), SError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("UPDATE profiles SET is_active = 0 WHERE is_active <> 0", [])?;
        let changed = tx.execute(
            "UPDATE profiles SET is_active = 1 WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            // Dropping the transaction rolls back the clear above.
            return Err(SError::NotFound(format!("profile {id}")));
        }
        tx.commit()?;
        Ok(())
    }

    pub fn active(&self) -> Result<Option<Profile>, SError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE is_active = 1 LIMIT 1"),
                [],
                ProfileRow::from_row,
            )
            .optional()?;
        row.map(ProfileRow::into_profile).transpose()
    }

    // ========== Default profile ==========

    /// Seeds the default profile from the currently enabled entries when no
    /// profile exists at all. Returns the seeded profile, if any.
    pub fn ensure_default(&self, entries: &[ModEntry]) -> Result<Option<Profile>, SError> {
        if self.count()? > 0 {
            return Ok(None);
        }

        let enabled: BTreeSet<String> = entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.id.clone())
            .collect();
        let profile = self.insert(DEFAULT_PROFILE_ID, DEFAULT_PROFILE_NAME, enabled)?;
        self.set_active(&profile.id)?;
        Ok(self.get(&profile.id)?)
    }

    /// Drops ids from the default profile that no longer exist on disk.
    /// Returns true if the profile was rewritten.
    pub fn reconcile_default(&self, existing: &BTreeSet<String>) -> Result<bool, SError> {
        let Some(mut profile) = self.get(DEFAULT_PROFILE_ID)? else {
            return Ok(false);
        };
        if !profile.retain_existing(existing) {
            return Ok(false);
        }
        debug!("default profile trimmed to {} mod(s)", profile.enabled_mods.len());
        self.save(&mut profile)?;
        Ok(true)
    }
}
