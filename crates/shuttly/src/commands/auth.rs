//! Auth command handlers: login, OTP registration, logout, whoami.

use dialoguer::Input;
use secrecy::SecretString;

use shuttly_api::{LoginOutcome, OtpOutcome};
use shuttly_core::User;

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::config::AppContext;
use crate::error::CliError;
use crate::output;

use super::util;

/// Email/password login, or `--admin` for the admin console.
pub async fn login(
    ctx: &mut AppContext,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let route = if args.admin { "/admin-login" } else { "/login" };
    util::gate_command(&ctx.session, route)?;

    let email = match args.email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = SecretString::from(rpassword::prompt_password("Password: ")?);

    let spinner = util::spinner("Signing in...");
    let result = if args.admin {
        ctx.client.admin_login(&email, &password).await
    } else {
        ctx.client.login(&email, &password).await
    };
    spinner.finish_and_clear();

    let outcome = result.map_err(CliError::from_api)?;
    finish_login(ctx, outcome, global)
}

/// Phone/OTP registration-or-login flow.
pub async fn register(
    ctx: &mut AppContext,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::gate_command(&ctx.session, "/register")?;

    let phone = match args.phone {
        Some(phone) => phone,
        None => Input::new()
            .with_prompt("Phone (10 digits)")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    util::validate_phone(&phone)?;

    let spinner = util::spinner("Requesting OTP...");
    let result = ctx.client.send_otp(&phone).await;
    spinner.finish_and_clear();
    let message = result.map_err(CliError::from_api)?;
    if !global.quiet {
        eprintln!("{message}");
    }

    let otp: String = Input::new()
        .with_prompt("OTP")
        .interact_text()
        .map_err(util::prompt_err)?;

    let spinner = util::spinner("Verifying...");
    let result = ctx.client.verify_otp(&phone, &otp).await;
    spinner.finish_and_clear();

    match result.map_err(CliError::from_api)? {
        OtpOutcome::LoggedIn { token, user } => {
            finish_login(ctx, LoginOutcome { token, user }, global)
        }
        OtpOutcome::NeedsDetails {
            registration_token,
            phone,
        } => {
            if !global.quiet {
                eprintln!("New account for {phone} -- a couple of details to finish up.");
            }
            let name: String = Input::new()
                .with_prompt("Name")
                .interact_text()
                .map_err(util::prompt_err)?;
            let email: String = Input::new()
                .with_prompt("Email (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(util::prompt_err)?;
            let email = if email.trim().is_empty() {
                None
            } else {
                Some(email)
            };

            let spinner = util::spinner("Creating account...");
            let result = ctx
                .client
                .complete_registration(&registration_token, &name, email.as_deref())
                .await;
            spinner.finish_and_clear();

            finish_login(ctx, result.map_err(CliError::from_api)?, global)
        }
    }
}

/// End the session: clear the persisted token and in-memory user.
pub fn logout(ctx: &mut AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    if !ctx.session.is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    ctx.session
        .logout(&ctx.client)
        .map_err(CliError::from_core)?;
    if !global.quiet {
        eprintln!("Logged out");
    }
    Ok(())
}

/// Show the logged-in account.
pub fn whoami(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    let user = ctx.session.user().ok_or(CliError::NotLoggedIn)?;
    let out = output::render_single(&global.output, user, describe_user, |u| u.id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

fn describe_user(user: &User) -> String {
    let mut lines = vec![
        format!("Name:  {}", user.name),
        format!("Role:  {:?}", user.role),
    ];
    if let Some(email) = &user.email {
        lines.push(format!("Email: {email}"));
    }
    if let Some(phone) = &user.phone {
        lines.push(format!("Phone: {phone}"));
    }
    lines.join("\n")
}

/// Persist the exchange's credentials and report who we are now.
fn finish_login(
    ctx: &mut AppContext,
    outcome: LoginOutcome,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let user: User = outcome.user.into();
    let name = user.name.clone();
    ctx.session
        .login(&ctx.client, outcome.token, user)
        .map_err(CliError::from_core)?;
    if !global.quiet {
        eprintln!("Logged in as {name}");
    }
    Ok(())
}
