#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use airnav::db::repository::{LocationRepository, PathRepository, WallRepository};
use airnav::db::LocalRepository;
use airnav::models::{NewLocation, NewPath, NewWall};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Env vars read by `AppConfig::apply_env_overrides`, all unset.
pub const CLEAN_ENV: &[(&str, Option<&str>)] = &[
    ("AIRNAV_CONFIG", None),
    ("REPOSITORY_TYPE", None),
    ("DATABASE_URL", None),
    ("PG_DATABASE_URL", None),
    ("HOST", None),
    ("PORT", None),
    ("CHECKPOINT_IDS", None),
    ("CONGESTION_SEED", None),
    ("SEED_MAP", None),
];

/// Three locations in a triangle:
///
/// ```text
///        3 (5,5)
///       /      \
///  1 (0,0) --- 2 (10,0)
/// ```
///
/// Paths 1-2 (10), 1-3 (7), 3-2 (7). No walls.
pub async fn triangle_repo() -> LocalRepository {
    let repo = LocalRepository::new();
    for (id, x, y) in [(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 5.0, 5.0)] {
        repo.create_location(NewLocation::new(format!("Node {}", id), "gate", x, y).with_id(id))
            .await
            .unwrap();
    }
    repo.create_path(NewPath::new(1, 2, 10.0)).await.unwrap();
    repo.create_path(NewPath::new(1, 3, 7.0)).await.unwrap();
    repo.create_path(NewPath::new(3, 2, 7.0)).await.unwrap();
    repo
}

/// Vertical wall crossing the direct 1-2 edge of [`triangle_repo`].
pub async fn block_direct_edge(repo: &LocalRepository) {
    repo.create_wall(NewWall::new(5.0, -1.0, 5.0, 1.0))
        .await
        .unwrap();
}
