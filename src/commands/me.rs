use super::store;
use crate::libs::{messages::Message, view::View};
use crate::{msg_info, msg_warning};
use anyhow::Result;

/// A 401 from the backend only means "not logged in".
pub async fn cmd() -> Result<()> {
    match store()?.me().await? {
        Some(user) => View::user(&user),
        None => {
            msg_warning!(Message::NotLoggedIn);
            msg_info!(Message::LoginHint);
        }
    }
    Ok(())
}
