//! Durable session store backed by a small JSON file.
//!
//! The file holds three string-valued entries under fixed keys: `access_token`,
//! `refresh_token` and `user` (the serialized profile). There is no schema
//! versioning; an entry that no longer decodes is treated as absent and the file
//! is removed, forcing a fresh login.

use super::{Session, TokenStore, User};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};
use tracing::{debug, warn};

const KEY_ACCESS_TOKEN: &str = "access_token";
const KEY_REFRESH_TOKEN: &str = "refresh_token";
const KEY_USER: &str = "user";

#[derive(Serialize, Deserialize, Default)]
struct StoredEntries {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<String>,
}

/// Session store persisted to disk so a login survives process restarts.
///
/// Reads are served from memory; the file is rewritten on every `set` and removed
/// on `clear`.
pub struct FileTokenStore {
    path: PathBuf,
    session: RwLock<Option<Session>>,
}

impl FileTokenStore {
    /// Open the store at `path`, loading any previously persisted session.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = load(&path);

        Self {
            path,
            session: RwLock::new(session),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, session: &Session) {
        let user = match serde_json::to_string(&session.user) {
            Ok(user) => user,
            Err(err) => {
                warn!(path = %self.path.display(), "failed to encode user profile: {err}");
                return;
            }
        };

        let entries = StoredEntries {
            access_token: Some(session.access_token.expose_secret().to_string()),
            refresh_token: Some(session.refresh_token.expose_secret().to_string()),
            user: Some(user),
        };

        if let Err(err) = write_entries(&self.path, &entries) {
            warn!(path = %self.path.display(), "failed to persist session: {err}");
        } else {
            debug!(path = %self.path.display(), "session persisted");
        }
    }

    fn remove(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "session file removed"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %self.path.display(), "failed to remove session file: {err}"),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, access_token: SecretString, refresh_token: SecretString, user: User) {
        let session = Session {
            access_token,
            refresh_token,
            user,
        };

        // hold the lock across the write so memory and disk change together
        let mut guard = self.session.write().unwrap_or_else(PoisonError::into_inner);
        self.persist(&session);
        *guard = Some(session);
    }

    fn clear(&self) {
        let mut guard = self.session.write().unwrap_or_else(PoisonError::into_inner);
        self.remove();
        *guard = None;
    }
}

fn load(path: &Path) -> Option<Session> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            warn!(path = %path.display(), "failed to read session file: {err}");
            return None;
        }
    };

    match decode(&raw) {
        Ok(session) => session,
        Err(reason) => {
            warn!(path = %path.display(), "discarding stored session: {reason}");
            if let Err(err) = fs::remove_file(path) {
                warn!(path = %path.display(), "failed to remove session file: {err}");
            }
            None
        }
    }
}

fn decode(raw: &str) -> Result<Option<Session>, String> {
    let entries: StoredEntries =
        serde_json::from_str(raw).map_err(|err| format!("invalid session file: {err}"))?;

    match (entries.access_token, entries.refresh_token, entries.user) {
        (None, None, None) => Ok(None),
        (Some(access), Some(refresh), Some(user)) => {
            let user: User = serde_json::from_str(&user)
                .map_err(|err| format!("invalid `{KEY_USER}` entry: {err}"))?;
            Ok(Some(Session {
                access_token: SecretString::from(access),
                refresh_token: SecretString::from(refresh),
                user,
            }))
        }
        _ => Err(format!(
            "`{KEY_ACCESS_TOKEN}`, `{KEY_REFRESH_TOKEN}` and `{KEY_USER}` must be stored together"
        )),
    }
}

fn write_entries(path: &Path, entries: &StoredEntries) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let payload = serde_json::to_vec_pretty(entries)?;

    // write to a sibling file and rename so readers never see a partial session
    let tmp = path.with_extension("tmp");
    {
        let mut file = open_private(&tmp)?;
        file.write_all(&payload)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::{student, Role};
    use serde_json::Value;

    #[test]
    fn session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileTokenStore::open(&path);
        assert!(!store.is_authenticated());
        store.set(SecretString::from("A1"), SecretString::from("R1"), student("alex"));

        let reopened = FileTokenStore::open(&path);
        let session = reopened.get().expect("session persisted");
        assert_eq!(session.access_token.expose_secret(), "A1");
        assert_eq!(session.refresh_token.expose_secret(), "R1");
        assert_eq!(session.user.role, Role::Student);
    }

    #[test]
    fn layout_uses_three_string_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileTokenStore::open(&path);
        store.set(SecretString::from("A1"), SecretString::from("R1"), student("alex"));

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[KEY_ACCESS_TOKEN], "A1");
        assert_eq!(raw[KEY_REFRESH_TOKEN], "R1");
        let user = raw[KEY_USER].as_str().expect("user stored as string");
        assert!(user.contains("\"role\":\"student\""));
    }

    #[test]
    fn clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileTokenStore::open(&path);
        store.set(SecretString::from("A1"), SecretString::from("R1"), student("alex"));
        assert!(path.exists());

        store.clear();
        assert!(!path.exists());
        assert!(!store.is_authenticated());

        store.clear();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn undecodable_user_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            r#"{"access_token":"A1","refresh_token":"R1","user":"{\"name\":\"old-shape\"}"}"#,
        )
        .unwrap();

        let store = FileTokenStore::open(&path);
        assert!(store.get().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn partial_session_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"access_token":"A1"}"#).unwrap();

        let store = FileTokenStore::open(&path);
        assert!(store.get().is_none());
    }

    #[test]
    fn write_failure_keeps_memory_session() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let path = blocker.join("session.json");

        let store = FileTokenStore::open(&path);
        store.set(SecretString::from("A1"), SecretString::from("R1"), student("alex"));
        assert!(store.is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::open(&path);
        store.set(SecretString::from("A1"), SecretString::from("R1"), student("alex"));

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
