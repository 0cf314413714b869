//! Config command handlers: show, set-server, use, path.
//!
//! These operate on the local config file only -- no context, no
//! network, no session.

use shuttly_config::{Profile, config_path, load_config_or_default, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let config = load_config_or_default();
            let out = output::render_single(
                &global.output,
                &config,
                |c| toml::to_string_pretty(c).unwrap_or_default(),
                |c| c.default_profile.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetServer { url, name } => {
            // Validate before persisting anything.
            let probe = Profile {
                server: url.clone(),
                ..Profile::default()
            };
            probe.server_url()?;

            let mut config = load_config_or_default();
            config
                .profiles
                .entry(name.clone())
                .or_insert_with(Profile::default)
                .server = url;
            if config.default_profile.is_none() {
                config.default_profile = Some(name.clone());
            }
            save_config(&config)?;
            if !global.quiet {
                eprintln!("Profile '{name}' updated");
            }
            Ok(())
        }

        ConfigCommand::Use { profile } => {
            let mut config = load_config_or_default();
            if !config.profiles.contains_key(&profile) {
                return Err(CliError::NotFound {
                    resource: "profile".into(),
                    identifier: profile,
                    list_command: "config show".into(),
                });
            }
            config.default_profile = Some(profile.clone());
            save_config(&config)?;
            if !global.quiet {
                eprintln!("Default profile is now '{profile}'");
            }
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }
    }
}
