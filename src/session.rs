use serde::{Deserialize, Serialize};

use crate::client::{IicsClient, V2_SESSION_HEADER, decode_json};
use crate::error::{Error, Result};
use crate::util::normalize_region_url;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// An authenticated context for one organization: the API base returned by
/// login plus the session token. The credentials ride along because the
/// logout endpoint requires them again. Sessions are plain values, never
/// shared between the two orgs.
#[derive(Debug, Clone)]
pub struct Session {
    /// `serverUrl` from the login response; base for all v3 calls.
    pub base_url: String,
    /// `icSessionId` from the login response.
    pub token: String,
    /// Normalized region URL the login went through; base for logout.
    pub login_base: String,
    pub credentials: Credentials,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    server_url: Option<String>,
    ic_session_id: Option<String>,
}

#[derive(Serialize)]
struct LogoutRequest<'a> {
    #[serde(rename = "@type")]
    kind: &'a str,
    username: &'a str,
    password: &'a str,
}

pub async fn login(
    client: &IicsClient,
    region_url: &str,
    credentials: Credentials,
) -> Result<Session> {
    let login_base = normalize_region_url(region_url);
    let url = format!("{login_base}/ma/api/v2/user/login");
    let reply = client
        .post_json(
            &url,
            None,
            &LoginRequest {
                username: &credentials.username,
                password: &credentials.password,
            },
        )
        .await?;
    if reply.status != 200 {
        return Err(Error::Auth {
            status: reply.status,
        });
    }
    let decoded: LoginResponse = decode_json(&reply.body, "login")?;
    let base_url = decoded.server_url.ok_or(Error::MissingField {
        context: "login",
        field: "serverUrl",
    })?;
    let token = decoded.ic_session_id.ok_or(Error::MissingField {
        context: "login",
        field: "icSessionId",
    })?;
    Ok(Session {
        base_url,
        token,
        login_base,
        credentials,
    })
}

/// Tears down one session. The token is attached as a header and the
/// original credentials are resent in the body, per the v2 API. A non-200
/// is reported to the caller but must never stop the other session's
/// logout; the session value is simply not used afterwards either way.
pub async fn logout(client: &IicsClient, session: &Session) -> Result<()> {
    let url = format!("{}/ma/api/v2/user/logout", session.login_base);
    let body = LogoutRequest {
        kind: "login",
        username: &session.credentials.username,
        password: &session.credentials.password,
    };
    let reply = client
        .post_json(&url, Some((V2_SESSION_HEADER, &session.token)), &body)
        .await?;
    if reply.status != 200 {
        return Err(Error::Auth {
            status: reply.status,
        });
    }
    Ok(())
}
