use crate::db::models::DbUser;
use crate::db::schema::{SEED_INSERT, SEED_PASSWORD, SEED_USERNAME, USERS_INIT};
use crate::error::LoginError;
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::OnceCell;
use tracing::{debug, info};

const FIND_BY_CREDENTIALS: &str =
    "SELECT id, username, password FROM users WHERE username = ? AND password = ? LIMIT 1";

/// Create the store at `path` unless something already exists there.
///
/// Missing parent directories are created with `dir_mode` (before umask).
/// Returns `true` if the store was created, `false` if the path was already
/// taken. A pre-existing file is trusted as-is; its schema is not checked.
pub async fn initialize(path: &Path, dir_mode: u32) -> Result<bool, LoginError> {
    if fs::try_exists(path).await? {
        debug!(path = %path.display(), "store already present; skipping initialization");
        return Ok(false);
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir, dir_mode).await?;
    }

    let opts = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&opts).await?;

    let mut tx = conn.begin().await?;
    sqlx::query(USERS_INIT).execute(&mut *tx).await?;
    sqlx::query(SEED_INSERT)
        .bind(SEED_USERNAME)
        .bind(SEED_PASSWORD)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    conn.close().await?;

    info!(path = %path.display(), "created credential store with seed user");
    Ok(true)
}

async fn create_dir_all(dir: &Path, mode: u32) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(dir).await
}

/// Handle to the credential store. Cheap to clone; clones share the
/// one-time initialization state.
#[derive(Clone)]
pub struct UsersStore {
    path: Arc<PathBuf>,
    dir_mode: u32,
    ready: Arc<OnceCell<()>>,
}

impl UsersStore {
    pub fn new(path: impl Into<PathBuf>, dir_mode: u32) -> Self {
        Self {
            path: Arc::new(path.into()),
            dir_mode,
            ready: Arc::new(OnceCell::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run [`initialize`] at most once for this handle and its clones.
    /// Concurrent callers wait for the first one. An attempt that fails before
    /// the file exists is retried by the next caller; once the file exists it
    /// is never recreated or repaired, even if it is later removed.
    pub async fn ensure_initialized(&self) -> Result<(), LoginError> {
        self.ready
            .get_or_try_init(|| async {
                initialize(&self.path, self.dir_mode).await.map(|_| ())
            })
            .await?;
        Ok(())
    }

    /// Open a fresh connection to an existing store.
    pub async fn open(&self) -> Result<SqliteConnection, LoginError> {
        let opts = SqliteConnectOptions::new().filename(self.path.as_path());
        Ok(SqliteConnection::connect_with(&opts).await?)
    }

    /// Exact, case-sensitive match on both columns. The connection is closed
    /// before returning.
    pub async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<DbUser>, LoginError> {
        let mut conn = self.open().await?;
        let user = sqlx::query_as::<_, DbUser>(FIND_BY_CREDENTIALS)
            .bind(username)
            .bind(password)
            .fetch_optional(&mut conn)
            .await;
        conn.close().await?;
        Ok(user?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn scalar(store: &UsersStore, sql: &str) -> i64 {
        let mut conn = store.open().await.expect("open store");
        let n = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&mut conn)
            .await
            .expect("scalar query");
        conn.close().await.expect("close store");
        n
    }

    #[tokio::test]
    async fn initialize_creates_directories_table_and_seed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("data").join("users.db");

        assert!(initialize(&path, 0o755).await.unwrap());
        assert!(path.is_file());

        let store = UsersStore::new(&path, 0o755);
        assert_eq!(scalar(&store, "SELECT COUNT(*) FROM users").await, 1);
        let seed = store
            .find_by_credentials(SEED_USERNAME, SEED_PASSWORD)
            .await
            .unwrap()
            .expect("seed user present");
        assert_eq!(seed.id, 1);
        assert_eq!(seed.username, "admin");
    }

    #[tokio::test]
    async fn second_initialize_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("users.db");

        assert!(initialize(&path, 0o755).await.unwrap());
        assert!(!initialize(&path, 0o755).await.unwrap());

        let store = UsersStore::new(&path, 0o755);
        assert_eq!(
            scalar(
                &store,
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'users'"
            )
            .await,
            1
        );
        assert_eq!(scalar(&store, "SELECT COUNT(*) FROM users").await, 1);
    }

    #[tokio::test]
    async fn existing_file_is_left_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("users.db");
        std::fs::write(&path, b"").unwrap();

        assert!(!initialize(&path, 0o755).await.unwrap());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn default_dir_mode_is_not_world_writable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("data");
        initialize(&dir.join("users.db"), 0o755).await.unwrap();

        let mode = std::fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o022, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn world_writable_dir_mode_is_applied() {
        use std::os::unix::fs::DirBuilderExt;
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let mode_of = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;

        // Reference directories carry the same umask as the store's.
        let ref_open = tmp.path().join("ref_open");
        let ref_default = tmp.path().join("ref_default");
        std::fs::DirBuilder::new().mode(0o777).create(&ref_open).unwrap();
        std::fs::DirBuilder::new().mode(0o755).create(&ref_default).unwrap();

        let open_dir = tmp.path().join("open");
        let default_dir = tmp.path().join("default");
        initialize(&open_dir.join("users.db"), 0o777).await.unwrap();
        initialize(&default_dir.join("users.db"), 0o755).await.unwrap();

        assert_eq!(mode_of(&open_dir), mode_of(&ref_open));
        assert_eq!(mode_of(&default_dir), mode_of(&ref_default));
        assert_eq!(mode_of(&open_dir) & mode_of(&default_dir), mode_of(&default_dir));
    }

    #[tokio::test]
    async fn removed_store_is_not_recreated() {
        let tmp = TempDir::new().unwrap();
        let store = UsersStore::new(tmp.path().join("users.db"), 0o755);
        store.ensure_initialized().await.unwrap();
        assert_eq!(store.path(), tmp.path().join("users.db"));

        std::fs::remove_file(store.path()).unwrap();

        store.ensure_initialized().await.unwrap();
        assert!(store.find_by_credentials("admin", "1234").await.is_err());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn concurrent_first_use_seeds_once() {
        let tmp = TempDir::new().unwrap();
        let store = UsersStore::new(tmp.path().join("users.db"), 0o755);

        let other = store.clone();
        let (a, b) = tokio::join!(store.ensure_initialized(), other.ensure_initialized());
        a.unwrap();
        b.unwrap();

        assert_eq!(scalar(&store, "SELECT COUNT(*) FROM users").await, 1);
    }

    #[tokio::test]
    async fn lookup_is_exact_and_case_sensitive() {
        let tmp = TempDir::new().unwrap();
        let store = UsersStore::new(tmp.path().join("users.db"), 0o755);
        store.ensure_initialized().await.unwrap();

        assert!(store.find_by_credentials("admin", "1234").await.unwrap().is_some());
        assert!(store.find_by_credentials("Admin", "1234").await.unwrap().is_none());
        assert!(store.find_by_credentials("admin", "12345").await.unwrap().is_none());
        assert!(store.find_by_credentials("admin ", "1234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn open_does_not_create_missing_store() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("users.db");
        let store = UsersStore::new(&path, 0o755);

        assert!(store.open().await.is_err());
        assert!(!path.exists());
    }
}
