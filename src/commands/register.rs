use super::store;
use crate::libs::messages::Message;
use crate::{msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Password};

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(required = true)]
    email: String,
}

pub async fn cmd(register_args: RegisterArgs) -> Result<()> {
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptNewPassword.to_string())
        .with_confirmation(Message::PromptRepeatPassword.to_string(), Message::PasswordMismatch.to_string())
        .interact()?;

    let user = store()?.register(&register_args.email, &password).await?;
    msg_success!(Message::Registered(user.email));
    msg_info!(Message::LoginHint);
    Ok(())
}
