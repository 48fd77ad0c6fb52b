use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Where and how long first-fetch locks live.
#[derive(Debug, Clone)]
pub struct FetchLockConfig {
    pub dir: PathBuf,
    /// A lock file not refreshed for this long is assumed abandoned.
    pub stale_after: Duration,
    pub poll_interval: Duration,
}

impl FetchLockConfig {
    pub fn new(dir: impl Into<PathBuf>, stale_after: Duration) -> Self {
        Self {
            dir: dir.into(),
            stale_after,
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// Exclusive per-model lock on the shared model volume.
///
/// Instances cold-starting against the same volume take this before pulling
/// a model, so only one of them downloads it and the rest find it cached.
/// The holder keeps the file's mtime fresh; the file is removed on drop.
#[derive(Debug)]
pub struct FetchLock {
    path: PathBuf,
    released: Arc<AtomicBool>,
}

impl FetchLock {
    pub async fn acquire(config: &FetchLockConfig, model: &str) -> io::Result<FetchLock> {
        fs::create_dir_all(&config.dir).await?;
        let path = config.dir.join(lock_file_name(model));
        let mut waiting = false;

        loop {
            if try_create(&path).await? {
                tracing::debug!(lock=%path.display(), %model, "acquired fetch lock");
                return Ok(FetchLock::hold(path, config.stale_after));
            }
            if is_stale(&path, config.stale_after).await
                && break_stale(&path, config.stale_after, model).await?
            {
                return Ok(FetchLock::hold(path, config.stale_after));
            }
            if !waiting {
                tracing::info!(
                    lock=%path.display(),
                    %model,
                    "another instance is fetching this model, waiting"
                );
                waiting = true;
            }
            tokio::time::sleep(config.poll_interval).await;
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn hold(path: PathBuf, stale_after: Duration) -> Self {
        let released = Arc::new(AtomicBool::new(false));
        let refresh_every = (stale_after / 4).max(Duration::from_millis(50));
        let refresh_path = path.clone();
        let refresh_released = released.clone();

        // Keep the mtime fresh so a long pull is never mistaken for an
        // abandoned lock. Opens without `create` so a released lock stays gone.
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(refresh_every).await;
                if refresh_released.load(Ordering::Relaxed) {
                    break;
                }
                let refreshed = async {
                    let mut f = OpenOptions::new().write(true).open(&refresh_path).await?;
                    f.write_all(owner_line().as_bytes()).await?;
                    f.flush().await
                };
                if let Err(e) = refreshed.await {
                    tracing::debug!(error=%e, lock=%refresh_path.display(), "fetch lock refresh stopped");
                    break;
                }
            }
        });

        Self { path, released }
    }
}

impl Drop for FetchLock {
    fn drop(&mut self) {
        self.released.store(true, Ordering::Relaxed);
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(error=%e, lock=%self.path.display(), "failed to release fetch lock");
            }
        }
    }
}

/// Held while one waiter replaces an abandoned lock. Without it two waiters
/// that both saw the same stale lock could each remove the other's fresh one.
struct BreakGuard {
    path: PathBuf,
}

impl Drop for BreakGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(error=%e, guard=%self.path.display(), "failed to remove lock break guard");
            }
        }
    }
}

/// Create the lock file with our owner line. `Ok(false)` if it exists.
async fn try_create(path: &Path) -> io::Result<bool> {
    match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(mut file) => {
            file.write_all(owner_line().as_bytes()).await?;
            file.flush().await?;
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

/// Replace a stale lock with our own. Staleness is re-checked under the
/// break guard, so only a lock nobody has replaced since is removed.
/// `Ok(true)` means we now hold the lock.
async fn break_stale(path: &Path, stale_after: Duration, model: &str) -> io::Result<bool> {
    let guard_path = break_guard_path(path);
    let _guard = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&guard_path)
        .await
    {
        Ok(_) => BreakGuard { path: guard_path },
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            // The guard lives for a few syscalls; an old one means its
            // owner died mid-break.
            if is_stale(&guard_path, stale_after).await {
                match fs::remove_file(&guard_path).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e),
                }
            }
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    if !is_stale(path, stale_after).await {
        return Ok(false);
    }
    tracing::warn!(lock=%path.display(), %model, "breaking stale fetch lock");
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    // A waiter outside the guard may still win the fresh create.
    try_create(path).await
}

fn break_guard_path(lock: &Path) -> PathBuf {
    let mut name = lock.as_os_str().to_owned();
    name.push(".break");
    PathBuf::from(name)
}

/// `deepseek-r1:14b` -> `deepseek-r1_14b.lock`
pub fn lock_file_name(model: &str) -> String {
    let safe: String = model
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}.lock")
}

fn owner_line() -> String {
    format!(
        "pid={} at={}\n",
        std::process::id(),
        chrono::Utc::now().to_rfc3339()
    )
}

async fn is_stale(path: &Path, stale_after: Duration) -> bool {
    let Ok(meta) = fs::metadata(path).await else {
        return false;
    };
    let Ok(modified) = meta.modified() else {
        return false;
    };
    SystemTime::now()
        .duration_since(modified)
        .map(|age| age > stale_after)
        .unwrap_or(false)
}
