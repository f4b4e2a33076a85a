//! `planty login`: cookie session login.
//!
//! The password comes from the encrypted cache when one exists, otherwise it
//! is prompted for (and cached). After a rejected password the user is asked
//! again, up to [`MAX_RETRY_COUNT`] times.

use super::store;
use crate::api::ApiError;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::secret::Secret;
use crate::{msg_bail_anyhow, msg_error, msg_success};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input};

pub const SECRET_FILE: &str = ".planty_secret";
pub const MAX_RETRY_COUNT: u32 = 3;

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email; defaults to the last one used
    email: Option<String>,
}

pub async fn cmd(login_args: LoginArgs) -> Result<()> {
    let mut config = Config::read()?;
    let email = match login_args.email.or_else(|| config.email.clone()) {
        Some(email) => email,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptEmail.to_string())
            .interact_text()?,
    };

    let store = store()?;
    let secret = Secret::new(SECRET_FILE, &Message::PromptPassword(email.clone()).to_string());
    let mut retries = 0;
    loop {
        let password = match retries > 0 {
            true => secret.prompt()?,
            false => secret.get_or_prompt()?,
        };

        match store.login(&email, &password).await {
            Ok(()) => break,
            Err(ApiError::Status { status: 400, .. } | ApiError::Unauthorized) => {
                secret.clear()?;
                if retries + 1 >= MAX_RETRY_COUNT {
                    msg_bail_anyhow!(Message::WrongPassword(MAX_RETRY_COUNT));
                }
                msg_error!(Message::BadCredentials);
                retries += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    config.email = Some(email.clone());
    config.save()?;
    msg_success!(Message::LoggedIn(email));
    Ok(())
}
