use reqwest::{Client, multipart::Form};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Session token header for the v2 (login/logout) API.
pub const V2_SESSION_HEADER: &str = "icSessionId";
/// Session token header for the v3 (export/import) API.
pub const V3_SESSION_HEADER: &str = "INFA-SESSION-ID";

/// A completed HTTP exchange: status code plus the raw body text. Callers
/// decide whether a non-200 status is fatal and which error it maps to.
#[derive(Debug)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Thin wrapper around a shared `reqwest::Client`. Holds no session state;
/// the two org sessions are explicit values passed into every call.
pub struct IicsClient {
    http: Client,
    verbose: bool,
}

impl IicsClient {
    pub fn new(verbose: bool) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("icmig/", env!("CARGO_PKG_VERSION")))
            .use_rustls_tls()
            .build()?;
        Ok(Self { http, verbose })
    }

    async fn finish(
        &self,
        method: &str,
        url: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<HttpReply> {
        let res = req.send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        if self.verbose {
            eprintln!("{method} {url} -> {status} ({} bytes)", body.len());
        }
        Ok(HttpReply { status, body })
    }

    pub async fn post_json<B: Serialize>(
        &self,
        url: &str,
        session: Option<(&str, &str)>,
        body: &B,
    ) -> Result<HttpReply> {
        let mut req = self.http.post(url).json(body);
        if let Some((name, token)) = session {
            req = req.header(name, token);
        }
        self.finish("POST", url, req).await
    }

    /// Empty-body POST, used to kick off an already-uploaded import job.
    pub async fn post_empty(&self, url: &str, session: (&str, &str)) -> Result<HttpReply> {
        let req = self
            .http
            .post(url)
            .header(session.0, session.1)
            .header("Content-Type", "application/json");
        self.finish("POST", url, req).await
    }

    pub async fn post_multipart(
        &self,
        url: &str,
        session: (&str, &str),
        form: Form,
    ) -> Result<HttpReply> {
        let req = self.http.post(url).header(session.0, session.1).multipart(form);
        self.finish("POST", url, req).await
    }

    pub async fn get(&self, url: &str, session: (&str, &str)) -> Result<HttpReply> {
        let req = self.http.get(url).header(session.0, session.1);
        self.finish("GET", url, req).await
    }

    /// GET returning the raw body bytes, for package downloads.
    pub async fn get_bytes(&self, url: &str, session: (&str, &str)) -> Result<(u16, Vec<u8>)> {
        let res = self
            .http
            .get(url)
            .header(session.0, session.1)
            .send()
            .await?;
        let status = res.status().as_u16();
        let body = res.bytes().await?;
        if self.verbose {
            eprintln!("GET {url} -> {status} ({} bytes)", body.len());
        }
        Ok((status, body.to_vec()))
    }
}

/// Decodes a response body into the endpoint's typed shape. A body that is
/// not valid JSON for that shape is a `MalformedBody` error; absent fields
/// are left as `None` and checked by the caller, so "field missing" stays
/// distinguishable from "unparseable body".
pub fn decode_json<T: DeserializeOwned>(body: &str, context: &'static str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| Error::MalformedBody { context, source })
}
