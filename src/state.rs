use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Settings;
use crate::db::HistoryRepo;

#[derive(Clone)]
pub struct AppState {
    repo: Arc<RwLock<HistoryRepo>>,
    pub settings: Arc<Settings>,
    pub config_file: Arc<PathBuf>,
}

impl AppState {
    pub fn new(repo: HistoryRepo, settings: Settings) -> Self {
        let config_file = settings.config_file();
        Self {
            repo: Arc::new(RwLock::new(repo)),
            settings: Arc::new(settings),
            config_file: Arc::new(config_file),
        }
    }

    /// Clone out the current repository handle. Requests keep the handle
    /// they started with across a swap.
    pub async fn repo(&self) -> HistoryRepo {
        self.repo.read().await.clone()
    }

    /// Replace the repository used by subsequent requests. The previous
    /// pool is dropped once its remaining holders finish.
    pub async fn swap_repo(&self, repo: HistoryRepo) {
        *self.repo.write().await = repo;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings(data_dir: &str) -> Settings {
        Settings {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: None,
            database_path: None,
            data_dir: data_dir.to_string(),
            static_dir: "static".to_string(),
            top_sites_count: 6,
        }
    }

    #[tokio::test]
    async fn test_swap_replaces_handle_for_new_requests() {
        let first = HistoryRepo::connect("sqlite::memory:").await.unwrap();
        let state = AppState::new(first, test_settings("./data"));

        let held = state.repo().await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swapped.db");
        let second = HistoryRepo::open(&path.to_string_lossy()).await.unwrap();
        state.swap_repo(second).await;

        // The held handle still points at the old source; new lookups see
        // the replacement.
        assert_eq!(held.source(), "sqlite::memory:");
        assert_eq!(state.repo().await.source(), path.to_string_lossy());
    }

    #[tokio::test]
    async fn test_config_file_derived_from_data_dir() {
        let repo = HistoryRepo::connect("sqlite::memory:").await.unwrap();
        let state = AppState::new(repo, test_settings("/tmp/webtrail"));

        assert_eq!(
            state.config_file.as_path(),
            std::path::Path::new("/tmp/webtrail/config.json")
        );
    }
}
