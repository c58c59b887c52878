//! Client of a passkey server, driving the registration and login ceremonies

use crate::{
    authenticator::Authenticator,
    error::PasskeyError,
    key::webauthn_key_from_spki,
    types::{AuthenticationCredential, CreationOptions, RegistrationCredential, RequestOptions},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sigil_primitives::WebAuthnKey;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, trace};

#[derive(Debug, Serialize)]
struct RegisterOptionsRequest<'a> {
    username: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterOptionsResponse {
    options: CreationOptions,
    user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterVerifyRequest<'a> {
    user_id: &'a str,
    username: &'a str,
    cred: &'a RegistrationCredential,
}

#[derive(Debug, Deserialize)]
struct Verified {
    #[serde(default)]
    verified: bool,
}

/// Login options are returned either wrapped in `{ options }` or bare
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LoginOptionsResponse {
    Wrapped { options: RequestOptions },
    Bare(RequestOptions),
}

impl From<LoginOptionsResponse> for RequestOptions {
    fn from(res: LoginOptionsResponse) -> Self {
        match res {
            LoginOptionsResponse::Wrapped { options } | LoginOptionsResponse::Bare(options) => {
                options
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginVerifyRequest<'a> {
    cred: &'a AuthenticationCredential,
}

#[derive(Debug, Deserialize)]
struct LoginVerifyResponse {
    verification: Verified,
    pubkey: Option<String>,
}

/// Passkey server client
///
/// Keeps a cookie session, since servers tie the `/verify` step to the challenge issued by the
/// preceding `/options` step.
#[derive(Debug)]
pub struct PasskeyServerClient<A> {
    http: reqwest::Client,
    url: String,
    authenticator: Arc<A>,
}

impl<A: Authenticator> PasskeyServerClient<A> {
    pub fn new(url: &str, authenticator: Arc<A>, timeout: Duration) -> Result<Self, PasskeyError> {
        let http = reqwest::Client::builder().cookie_store(true).timeout(timeout).build()?;
        Ok(Self { http, url: url.trim_end_matches('/').into(), authenticator })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn authenticator(&self) -> Arc<A> {
        self.authenticator.clone()
    }

    /// Creates a new passkey for `username` and returns its public key
    pub async fn register(&self, username: &str) -> Result<WebAuthnKey, PasskeyError> {
        let RegisterOptionsResponse { options, user_id } =
            self.post("/register/options", &RegisterOptionsRequest { username }).await?;
        debug!("Received registration options for user {user_id}");

        let cred = self.authenticator.create_credential(&options).await?;

        let res: Verified = self
            .post(
                "/register/verify",
                &RegisterVerifyRequest { user_id: &user_id, username, cred: &cred },
            )
            .await?;
        if !res.verified {
            return Err(PasskeyError::NotVerified("registration"));
        }

        let spki = cred.response.public_key.as_deref().ok_or_else(|| {
            PasskeyError::Encoding("registration response carries no public key".into())
        })?;
        let key = webauthn_key_from_spki(spki, &cred.raw_id)?;
        info!("Registered passkey {} for {username:?}", cred.id);
        Ok(key)
    }

    /// Authenticates with an existing passkey and returns its public key
    pub async fn login(&self) -> Result<WebAuthnKey, PasskeyError> {
        let options: LoginOptionsResponse =
            self.post("/login/options", &serde_json::Map::new()).await?;
        let cred = self.authenticator.get_assertion(&options.into()).await?;

        let res: LoginVerifyResponse =
            self.post("/login/verify", &LoginVerifyRequest { cred: &cred }).await?;
        if !res.verification.verified {
            return Err(PasskeyError::NotVerified("login"));
        }

        let spki = res.pubkey.as_deref().ok_or_else(|| {
            PasskeyError::Encoding("login response carries no public key".into())
        })?;
        let key = webauthn_key_from_spki(spki, &cred.raw_id)?;
        info!("Logged in with passkey {}", cred.id);
        Ok(key)
    }

    async fn post<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, PasskeyError> {
        let res = self.http.post(format!("{}{path}", self.url)).json(body).send().await?;
        let status = res.status();
        let text = res.text().await?;
        trace!("POST {path} returned {status}: {text}");

        if !status.is_success() {
            return Err(PasskeyError::Server { path: path.into(), status: status.as_u16(), body: text });
        }
        Ok(serde_json::from_str(&text)?)
    }
}
