mod cache;
mod config;
mod http;
mod ip;
mod services;

use std::net::Ipv4Addr;
use std::process::ExitCode;

use cache::Cache;
use config::Config;
use ip::Resolver;
use services::{he_net, Outcome};

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = http::Client::new(config.timeout, &config.user_agent);

    let current = match Resolver::new(&config.lookup_urls).resolve(&client) {
        Ok(ip) => ip,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cache = Cache::new(config.cache_file.clone());
    let cached = cache.read();

    if !needs_update(cached, current) {
        println!("[INFO] IP unchanged ({}), skipping update", current);
        return ExitCode::SUCCESS;
    }

    match cached {
        Some(old) => println!("[INFO] IP changed from {} to {}, updating DNS", old, current),
        None => println!("[INFO] no cached IP, updating DNS with {}", current),
    }

    let service = he_net::Service::new(&config);

    match service.update(&client, current) {
        Ok(Outcome::Updated) => {
            println!("[INFO] dynamic DNS for {} updated to {}", config.hostname, current);
        }

        Ok(Outcome::NoChange) => {
            println!("[INFO] provider already had {} for {}", current, config.hostname);
        }

        Err(e) => {
            eprintln!(
                "[ERROR] updating dynamic DNS for {} failed: {}",
                config.hostname, e
            );
            return ExitCode::FAILURE;
        }
    }

    // The cache must only ever hold an address the provider accepted, so
    // it is written after the update, not before.
    if let Err(e) = cache.write(current) {
        eprintln!(
            "[WARN] could not write cache file {}: {}",
            config.cache_file.display(),
            e
        );
    }

    ExitCode::SUCCESS
}

fn needs_update(cached: Option<Ipv4Addr>, current: Ipv4Addr) -> bool {
    cached != Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_address_needs_no_update() {
        let ip = Ipv4Addr::new(203, 0, 113, 9);
        assert!(!needs_update(Some(ip), ip));
    }

    #[test]
    fn changed_address_needs_an_update() {
        let old = Ipv4Addr::new(203, 0, 113, 9);
        let new = Ipv4Addr::new(203, 0, 113, 10);
        assert!(needs_update(Some(old), new));
    }

    #[test]
    fn first_run_needs_an_update() {
        assert!(needs_update(None, Ipv4Addr::new(203, 0, 113, 9)));
    }
}
