use dotenv::dotenv;
use planty::api::ApiError;
use planty::commands::Cli;
use planty::libs::{logging, messages::Message};
use planty::{msg_error, msg_info};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    if let Err(e) = logging::init() {
        msg_error!(e);
    }

    let Err(e) = Cli::menu().await else {
        return ExitCode::SUCCESS;
    };
    match e.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized) => {
            msg_error!(Message::NotLoggedIn);
            msg_info!(Message::LoginHint);
        }
        _ => msg_error!(format!("{:#}", e)),
    }
    ExitCode::FAILURE
}
