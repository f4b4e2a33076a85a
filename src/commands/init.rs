//! `planty init`: configuration wizard.

use super::login::SECRET_FILE;
use crate::{
    libs::{config::Config, messages::Message, secret::Secret},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove the configuration and the cached password instead
    #[arg(short, long)]
    delete: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.delete {
        Config::delete()?;
        Secret::new(SECRET_FILE, "").clear()?;
        msg_success!(Message::ConfigDeleted);
        return Ok(());
    }

    Config::init()?.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
