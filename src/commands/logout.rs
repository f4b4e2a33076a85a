use super::{login::SECRET_FILE, store};
use crate::libs::messages::Message;
use crate::libs::secret::Secret;
use crate::msg_success;
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    store()?.logout().await?;
    Secret::new(SECRET_FILE, "").clear()?;
    msg_success!(Message::LoggedOut);
    Ok(())
}
