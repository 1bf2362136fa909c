use std::net::Ipv4Addr;

use crate::config::Config;
use crate::http::{self, Client};

use super::{Outcome, UpdateError};

/// Hurricane Electric's dyndns2-style update endpoint. Credentials go in
/// the form body (`password` is the per-host key, not the account
/// password), and the verdict comes back as a short plaintext token.
pub struct Service {
    url: Box<str>,
    hostname: Box<str>,
    key: Box<str>,
}

impl Service {
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.update_url.clone(),
            hostname: config.hostname.clone(),
            key: config.key.clone(),
        }
    }

    /// Pushes `ip` to the provider. Success means the provider answered
    /// `good` or `nochg` with a success status; everything else fails.
    pub fn update(&self, client: &Client, ip: Ipv4Addr) -> Result<Outcome, UpdateError> {
        let myip = ip.to_string();
        let form = [
            ("hostname", self.hostname.as_ref()),
            ("password", self.key.as_ref()),
            ("myip", myip.as_str()),
        ];

        match client.post_form(&self.url, &form) {
            Ok(resp) => {
                let body = resp
                    .into_string()
                    .map_err(|e| UpdateError::UnreadableBody(e.to_string().into()))?;

                interpret(&body)
            }

            // Error bodies can still carry a token worth showing, but a
            // non-success status is never a successful update.
            Err(http::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(UpdateError::Status(code, body.trim().into()))
            }

            Err(http::Error::Transport(tp)) => Err(UpdateError::Transport(tp)),
        }
    }
}

/// Decodes a dyndns2 response body. The first whitespace-delimited token,
/// lower-cased, carries the verdict; anything after it (usually the echoed
/// address) is informational.
fn interpret(body: &str) -> Result<Outcome, UpdateError> {
    let token = body
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    let reason = match token.as_str() {
        "good" => return Ok(Outcome::Updated),
        "nochg" => return Ok(Outcome::NoChange),
        "" => "empty response body",
        "badauth" => "bad authentication details were provided",
        "notfqdn" => "hostname is not a fully-qualified domain name",
        "nohost" => "hostname does not exist in this account",
        "abuse" => "hostname is blocked for abuse",
        "badagent" => "the user agent was rejected",
        "911" | "dnserr" => "the provider is having server trouble",
        _ => "unrecognized response code",
    };

    Err(UpdateError::Rejected {
        reason: reason.into(),
        raw: body.trim().into(),
    })
}
