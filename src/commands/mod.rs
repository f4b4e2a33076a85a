//! Command-line interface.
//!
//! Every subcommand lives in its own module with an `XArgs` struct and an
//! async `cmd` function. Commands build a [`Store`] from the saved
//! configuration, run their requests through it and render the result.

pub mod archived;
pub mod attach;
pub mod calendar;
pub mod init;
pub mod login;
pub mod logout;
pub mod me;
pub mod register;
pub mod section;
pub mod task;

use crate::api::Store;
use crate::libs::config::Config;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configure the API URL, account and task defaults")]
    Init(init::InitArgs),
    #[command(about = "Log in to the Planty backend")]
    Login(login::LoginArgs),
    #[command(about = "Log out and forget the cached password")]
    Logout,
    #[command(about = "Create a new account")]
    Register(register::RegisterArgs),
    #[command(about = "Show the logged in user")]
    Me,
    #[command(about = "Manage sections", arg_required_else_help = true)]
    Section(section::SectionArgs),
    #[command(about = "Manage tasks", arg_required_else_help = true)]
    Task(task::TaskArgs),
    #[command(about = "Show tasks due in a week")]
    Calendar(calendar::CalendarArgs),
    #[command(about = "List archived tasks")]
    Archived(archived::ArchivedArgs),
    #[command(about = "Manage encrypted task attachments", arg_required_else_help = true)]
    Attach(attach::AttachArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Login(args) => login::cmd(args).await,
            Commands::Logout => logout::cmd().await,
            Commands::Register(args) => register::cmd(args).await,
            Commands::Me => me::cmd().await,
            Commands::Section(args) => section::cmd(args).await,
            Commands::Task(args) => task::cmd(args).await,
            Commands::Calendar(args) => calendar::cmd(args).await,
            Commands::Archived(args) => archived::cmd(args).await,
            Commands::Attach(args) => attach::cmd(args).await,
        }
    }
}

pub(crate) fn store() -> Result<Store> {
    Ok(Store::from_config(&Config::read()?))
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
