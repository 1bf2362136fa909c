use std::net::Ipv4Addr;

use regex::Regex;
use thiserror::Error;

use crate::http::{self, Client};

/// Dotted quads with every octet in 0-255. Word boundaries keep longer
/// digit runs (like "999.1.2.3") from yielding a bogus partial match, and
/// leading-zero octets are excluded so every match parses as `Ipv4Addr`.
const IPV4_PATTERN: &str = r"\b(?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\b";

/// Finds the current public IPv4 address by asking an ordered list of
/// lookup mirrors.
pub struct Resolver {
    endpoints: Vec<Box<str>>,
    pattern: Regex,
}

#[derive(Debug, Error, Clone)]
pub enum ResolveError {
    #[error("no lookup endpoint yielded a usable IPv4 address")]
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extraction {
    None,
    One(Ipv4Addr),
    Many(Ipv4Addr, usize),
}

impl Resolver {
    pub fn new(endpoints: &[Box<str>]) -> Self {
        // UNWRAP-SAFETY: the pattern is a constant and known to compile.
        let pattern = Regex::new(IPV4_PATTERN).unwrap();

        Self {
            endpoints: endpoints.to_vec(),
            pattern,
        }
    }

    /// Tries each mirror in order and returns the first address found.
    /// Mirror failures (transport errors, error statuses, bodies without
    /// an address) are warnings; only running out of mirrors is an error.
    pub fn resolve(&self, client: &Client) -> Result<Ipv4Addr, ResolveError> {
        for url in self.endpoints.iter() {
            let response = match client.get(url) {
                Ok(resp) => resp,
                Err(http::Error::Status(code, _)) => {
                    eprintln!("[WARN] lookup {} answered with HTTP {}", url, code);
                    continue;
                }
                Err(http::Error::Transport(tp)) => {
                    eprintln!("[WARN] lookup {} failed: {}", url, tp);
                    continue;
                }
            };

            let text = match response.into_string() {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("[WARN] lookup {} returned an unreadable body: {}", url, e);
                    continue;
                }
            };

            match self.extract(&text) {
                Extraction::None => {
                    eprintln!("[WARN] lookup {} returned no IPv4 address", url);
                }
                Extraction::One(ip) => return Ok(ip),
                Extraction::Many(ip, total) => {
                    eprintln!(
                        "[WARN] lookup {} returned {} addresses, using the first: {}",
                        url, total, ip
                    );
                    return Ok(ip);
                }
            }
        }

        Err(ResolveError::Exhausted)
    }

    fn extract(&self, text: &str) -> Extraction {
        let found = self
            .pattern
            .find_iter(text)
            .filter_map(|m| m.as_str().parse::<Ipv4Addr>().ok())
            .collect::<Vec<_>>();

        match found.as_slice() {
            [] => Extraction::None,
            [ip] => Extraction::One(*ip),
            [first, ..] => Extraction::Many(*first, found.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver {
        Resolver::new(&[])
    }

    #[test]
    fn plain_address_is_extracted() {
        assert_eq!(
            resolver().extract("203.0.113.9\n"),
            Extraction::One(Ipv4Addr::new(203, 0, 113, 9)),
        );
    }

    #[test]
    fn address_inside_html_is_extracted() {
        let body = "<html><body>Your IP address is 198.51.100.7</body></html>";
        assert_eq!(
            resolver().extract(body),
            Extraction::One(Ipv4Addr::new(198, 51, 100, 7)),
        );
    }

    #[test]
    fn octet_boundaries_hold() {
        assert_eq!(
            resolver().extract("255.255.255.255"),
            Extraction::One(Ipv4Addr::new(255, 255, 255, 255)),
        );
        assert_eq!(
            resolver().extract("0.0.0.0"),
            Extraction::One(Ipv4Addr::new(0, 0, 0, 0)),
        );
    }

    #[test]
    fn octets_over_255_do_not_match() {
        assert_eq!(resolver().extract("256.200.100.0"), Extraction::None);
        assert_eq!(resolver().extract("999.1.2.3"), Extraction::None);
        assert_eq!(resolver().extract("1.2.3.256"), Extraction::None);
    }

    #[test]
    fn leading_zero_octets_do_not_match() {
        assert_eq!(resolver().extract("203.0.113.009"), Extraction::None);
        assert_eq!(resolver().extract("010.1.2.3"), Extraction::None);
    }

    #[test]
    fn first_of_several_addresses_wins() {
        assert_eq!(
            resolver().extract("via 198.51.100.7, before that 203.0.113.9"),
            Extraction::Many(Ipv4Addr::new(198, 51, 100, 7), 2),
        );
    }

    #[test]
    fn body_without_an_address_yields_nothing() {
        assert_eq!(resolver().extract("access denied"), Extraction::None);
        assert_eq!(resolver().extract(""), Extraction::None);
    }
}
