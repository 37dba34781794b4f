use std::sync::Arc;

use anyhow::Result;
use remote::{Backend, HttpBackend};
use schedule::SessionPolicy;
use tokio::sync::RwLock;

use super::{config::Config, policy::RouteTable};

pub struct AppState {
    pub config: Config,
    pub backend: Arc<dyn Backend>,
    pub routes: RouteTable,
    /// Admin managed, lives for the process.
    pub session_policy: RwLock<SessionPolicy>,
}

impl AppState {
    pub fn new() -> Result<Arc<Self>> {
        let config = Config::load()?;
        let backend = HttpBackend::new(&config.upstream_url, config.upstream_timeout)?;

        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> Arc<Self> {
        Arc::new(Self {
            config,
            backend,
            routes: RouteTable::default(),
            session_policy: RwLock::new(SessionPolicy::default()),
        })
    }
}
