pub mod cli;
pub mod core;
pub mod providers;

use crate::core::RateCache;
use crate::core::config::{self, AppConfig};
use crate::providers::OpenExchangeRatesProvider;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Interactive,
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Rates,
}

/// Everything a command needs, assembled once at startup.
pub struct App {
    config: AppConfig,
    cache: Arc<RateCache>,
}

impl App {
    /// Loads configuration and the credential from the environment.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let config = match config_path {
            Some(path) => AppConfig::load_from_path(path)?,
            None => AppConfig::load()?,
        };
        debug!("Loaded config: {config:#?}");

        let api_key = config::load_api_key();
        if api_key.is_none() {
            debug!("No {} configured", config::API_KEY_VAR);
        }
        Self::new(config, api_key)
    }

    pub fn new(config: AppConfig, api_key: Option<String>) -> Result<Self> {
        let ttl = config.cache.ttl()?;
        let provider = OpenExchangeRatesProvider::new(
            &config.provider.base_url,
            api_key,
            Duration::from_secs(config.provider.timeout_secs),
        )?;
        let cache = Arc::new(RateCache::new(Arc::new(provider), ttl));
        Ok(Self { config, cache })
    }

    pub fn cache(&self) -> Arc<RateCache> {
        Arc::clone(&self.cache)
    }

    pub async fn run(&self, command: AppCommand) -> Result<()> {
        match command {
            AppCommand::Interactive => {
                info!("Currency converter starting...");
                cli::interactive::run(
                    self.cache(),
                    cli::form::ConsoleInput::new(),
                    self.config.defaults.clone(),
                )
                .await
            }
            AppCommand::Convert { amount, from, to } => {
                cli::convert::run(self.cache(), &amount, &from, &to).await
            }
            AppCommand::Rates => cli::rates::run(self.cache()).await,
        }
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    App::load(config_path)?.run(command).await
}
