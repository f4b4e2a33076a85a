//! Application configuration.
//!
//! Stored as pretty-printed JSON (`config.json`) in the [`DataStorage`]
//! directory. A missing file is not an error: every field has a default, so
//! the client works against a local backend without running `planty init`.
//! The API URL can be overridden per invocation with `PLANTY_API_URL`, which
//! is also picked up from a `.env` file.

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const API_URL_ENV: &str = "PLANTY_API_URL";

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Planty backend, without the `/api` prefix.
    pub api_url: String,
    /// Last account used with `planty login`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Archive tasks as soon as they are completed.
    pub auto_archive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: APP_METADATA_DEFAULT_API_URL.to_string(),
            email: None,
            auto_archive: true,
        }
    }
}

impl Config {
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn delete() -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }

    /// Effective API URL: the environment override wins over the file.
    pub fn api_url(&self) -> String {
        let url = env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.api_url.clone());
        url.trim_end_matches('/').to_string()
    }

    fn modules() -> Vec<ConfigModule> {
        vec![
            ConfigModule {
                key: "server".to_string(),
                name: Message::ConfigModuleServer.to_string(),
            },
            ConfigModule {
                key: "account".to_string(),
                name: Message::ConfigModuleAccount.to_string(),
            },
            ConfigModule {
                key: "tasks".to_string(),
                name: Message::ConfigModuleTasks.to_string(),
            },
        ]
    }

    /// Interactive setup wizard; existing values are offered as defaults.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let modules = Self::modules();

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "server" => {
                    msg_print!(Message::ConfigModuleServer);
                    config.api_url = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptApiUrl.to_string())
                        .default(config.api_url.clone())
                        .interact_text()?;
                }
                "account" => {
                    msg_print!(Message::ConfigModuleAccount);
                    let email: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptEmail.to_string())
                        .default(config.email.clone().unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    config.email = (!email.trim().is_empty()).then(|| email.trim().to_string());
                }
                "tasks" => {
                    msg_print!(Message::ConfigModuleTasks);
                    config.auto_archive = Confirm::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptAutoArchive.to_string())
                        .default(config.auto_archive)
                        .interact()?;
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
