// Command implementations for the `courtside` binary.
//
// Every command opens a `Context`: config, HTTP client, and a session
// restored from the token database.

pub mod account;
pub mod catalog;
pub mod games;
pub mod live;
pub mod social;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::info;

use courtside_api::{ApiClient, Backend, Gateway, Session};
use courtside_core::config::{self, Config};
use courtside_core::storage::SqliteTokenStore;

pub struct Context {
    pub config: Config,
    pub api: Arc<ApiClient>,
    pub session: Arc<Session>,
}

impl Context {
    pub async fn open() -> Result<Self> {
        let config = config::load_config().context("failed to load configuration")?;
        let gateway = Gateway::from_config(&config.api).context("failed to build HTTP client")?;
        let api = Arc::new(ApiClient::new(gateway));

        let db_path = config.storage.token_db_path();
        let store = SqliteTokenStore::open(&db_path.to_string_lossy())
            .with_context(|| format!("failed to open token store at {}", db_path.display()))?;

        let session = Arc::new(Session::new(api.clone(), Arc::new(store)));
        let user = session
            .hydrate()
            .await
            .context("failed to restore session")?;
        info!(
            api = %config.api.base_url,
            user = user.as_ref().map(|u| u.username.as_str()).unwrap_or("-"),
            "context opened"
        );

        Ok(Self {
            config,
            api,
            session,
        })
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        self.api.clone()
    }
}
