//! Account login and identity.

use crate::{request, Client, Error};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tracing::debug;

pub const SESSIONS_PATH: &str = "sessions";
pub const ME_PATH: &str = "me";

/// The JSON payload for a login request.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthPayload {
    pub email: String,
    pub password: String,
}

/// The JSON payload for a successful login or token exchange.
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenPayload {
    pub token: String,
}

/// The account the session belongs to.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Account {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub organization_id: u64,
}

/// The JSON payload returned by `me`.
///
/// Organization and user details are passed through untyped.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct UserInfo {
    pub account: Account,
    pub organization: serde_json::Value,
    pub user: serde_json::Value,
}

impl Client {
    /// Logs in with the configured credentials and stores the session token.
    ///
    /// Every later request made through this client (or any of its clones)
    /// carries the token.
    pub async fn login(&self) -> Result<(), Error> {
        let url = self.endpoint(&[SESSIONS_PATH])?;
        let body = AuthPayload {
            email: self.email.to_string(),
            password: self.password.to_string(),
        };

        let req = self.request(Method::POST, url).await.json(&body);
        let payload: TokenPayload = request::send_json("login", req).await?;
        *self.token.write().await = Some(payload.token);

        debug!(email = %self.email, "logged in");
        Ok(())
    }

    /// Returns the account, organization and user behind the session.
    pub async fn me(&self) -> Result<UserInfo, Error> {
        let url = self.endpoint(&[ME_PATH])?;
        let req = self.request(Method::GET, url).await;
        request::send_json("me", req).await
    }
}
