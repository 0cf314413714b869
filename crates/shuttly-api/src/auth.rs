// Authentication endpoints
//
// Phone/OTP first-contact flow, password login, admin login, and
// session rehydration. The auth endpoints return flat bodies
// (`{ success, token, user }`) rather than the `{ success, data }`
// envelope, so they go through `post_flat`.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{AuthResponse, MessageResponse, UserDto, VerifyOtpResponse};

/// Outcome of OTP verification.
///
/// An existing account logs straight in; a new phone number must finish
/// registration with the returned short-lived token.
#[derive(Debug)]
pub enum OtpOutcome {
    LoggedIn {
        token: SecretString,
        user: UserDto,
    },
    NeedsDetails {
        registration_token: String,
        phone: String,
    },
}

/// A completed auth exchange: bearer token plus the account it belongs to.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: SecretString,
    pub user: UserDto,
}

impl ApiClient {
    /// Request an OTP for a phone number.
    ///
    /// `POST /api/auth/send-otp`
    pub async fn send_otp(&self, phone: &str) -> Result<String, Error> {
        let url = self.api_url("auth/send-otp");
        debug!("requesting OTP");

        let resp: MessageResponse = self.post_flat(url, &json!({ "phone": phone })).await?;
        if !resp.success {
            return Err(Error::Api {
                message: resp.message.unwrap_or_else(|| "OTP dispatch failed".into()),
            });
        }
        Ok(resp.message.unwrap_or_else(|| "OTP sent".into()))
    }

    /// Verify a phone/OTP pair.
    ///
    /// `POST /api/auth/verify-otp`
    pub async fn verify_otp(&self, phone: &str, otp: &str) -> Result<OtpOutcome, Error> {
        let url = self.api_url("auth/verify-otp");
        debug!("verifying OTP");

        let resp: VerifyOtpResponse = self
            .post_flat(url, &json!({ "phone": phone, "otp": otp }))
            .await?;

        if !resp.success {
            return Err(Error::Api {
                message: "OTP verification failed".into(),
            });
        }

        if resp.logged_in {
            let (token, user) = require_credentials(resp.token, resp.user)?;
            return Ok(OtpOutcome::LoggedIn { token, user });
        }

        if resp.needs_details {
            let registration_token = resp.registration_token.ok_or_else(|| Error::Api {
                message: "verification succeeded but no registration token was returned".into(),
            })?;
            return Ok(OtpOutcome::NeedsDetails {
                registration_token,
                phone: resp.phone.unwrap_or_else(|| phone.to_owned()),
            });
        }

        Err(Error::Api {
            message: "unrecognized OTP verification response".into(),
        })
    }

    /// Finish signup for a phone number seen for the first time.
    ///
    /// `POST /api/auth/complete-registration`
    pub async fn complete_registration(
        &self,
        registration_token: &str,
        name: &str,
        email: Option<&str>,
    ) -> Result<LoginOutcome, Error> {
        let url = self.api_url("auth/complete-registration");
        debug!("completing registration");

        let resp: AuthResponse = self
            .post_flat(
                url,
                &json!({
                    "registrationToken": registration_token,
                    "name": name,
                    "email": email,
                }),
            )
            .await?;

        into_login_outcome(resp)
    }

    /// Email/password login.
    ///
    /// `POST /api/auth/login`
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginOutcome, Error> {
        let url = self.api_url("auth/login");
        debug!("logging in");

        let resp: AuthResponse = self
            .post_flat(
                url,
                &json!({ "email": email, "password": password.expose_secret() }),
            )
            .await?;

        into_login_outcome(resp)
    }

    /// Admin login. Same shape as password login, separate endpoint.
    ///
    /// `POST /api/auth/admin-login`
    pub async fn admin_login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginOutcome, Error> {
        let url = self.api_url("auth/admin-login");
        debug!("logging in (admin)");

        let resp: AuthResponse = self
            .post_flat(
                url,
                &json!({ "email": email, "password": password.expose_secret() }),
            )
            .await?;

        into_login_outcome(resp)
    }

    /// Fetch the account the installed bearer token belongs to.
    ///
    /// `GET /api/auth/me` -- used for session rehydration at startup.
    /// Any failure (including 401 on an expired token) means the
    /// persisted token is no longer usable.
    pub async fn current_user(&self) -> Result<UserDto, Error> {
        let url = self.api_url("auth/me");
        debug!("fetching current user");
        self.get(url, &[]).await
    }
}

fn into_login_outcome(resp: AuthResponse) -> Result<LoginOutcome, Error> {
    if !resp.success {
        return Err(Error::Api {
            message: "authentication failed".into(),
        });
    }
    let (token, user) = require_credentials(resp.token, resp.user)?;
    Ok(LoginOutcome { token, user })
}

fn require_credentials(
    token: Option<String>,
    user: Option<UserDto>,
) -> Result<(SecretString, UserDto), Error> {
    match (token, user) {
        (Some(token), Some(user)) => Ok((SecretString::from(token), user)),
        _ => Err(Error::Api {
            message: "auth response was missing token or user".into(),
        }),
    }
}
