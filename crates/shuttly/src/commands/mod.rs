//! Command dispatch.
//!
//! `config` and `completions` run without network or session; every
//! other command builds the `AppContext` (profile + client + rehydrated
//! session) first.

pub mod admin;
pub mod auth;
pub mod book;
pub mod bookings;
pub mod config_cmd;
pub mod review;
pub mod search;
pub mod util;

use clap::CommandFactory;

use crate::cli::{Cli, Command};
use crate::config::AppContext;
use crate::error::CliError;

pub async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let global = cli.global;

    match cli.command {
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "shuttly", &mut std::io::stdout());
            Ok(())
        }

        Command::Config(args) => config_cmd::handle(args, &global),

        command => {
            let mut ctx = AppContext::init(&global).await?;
            match command {
                Command::Login(args) => auth::login(&mut ctx, args, &global).await,
                Command::Register(args) => auth::register(&mut ctx, args, &global).await,
                Command::Logout => auth::logout(&mut ctx, &global),
                Command::Whoami => auth::whoami(&ctx, &global),
                Command::Search(args) => search::handle(&ctx, args, &global).await,
                Command::Book(args) => book::handle(&mut ctx, args, &global).await,
                Command::Bookings(args) => bookings::handle(&ctx, args, &global).await,
                Command::Review(args) => review::handle(&ctx, args, &global).await,
                Command::Admin(args) => admin::handle(&ctx, args, &global).await,
                Command::Config(_) | Command::Completions { .. } => unreachable!("handled above"),
            }
        }
    }
}
