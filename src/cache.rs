use std::fs;
use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;

/// Remembers the last address the provider accepted, as a one-line
/// plaintext file. Losing it is harmless; the next run just performs one
/// redundant (idempotent) update.
pub struct Cache {
    path: PathBuf,
}

impl Cache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the recorded address, or `None` if there is no usable
    /// record. Read failures degrade to `None` with a warning.
    pub fn read(&self) -> Option<Ipv4Addr> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                eprintln!(
                    "[WARN] could not read cache file {}: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        match text.trim().parse::<Ipv4Addr>() {
            Ok(ip) => Some(ip),
            Err(_) => {
                eprintln!(
                    "[WARN] cache file {} does not contain an IPv4 address",
                    self.path.display()
                );
                None
            }
        }
    }

    /// Replaces the recorded address. The content is written to a sibling
    /// temp file and renamed into place so a crash mid-write cannot leave
    /// a truncated record behind.
    pub fn write(&self, ip: Ipv4Addr) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, format!("{}\n", ip))?;

        // Best effort; the content is not secret.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            if let Err(e) = fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600)) {
                eprintln!("[WARN] could not restrict cache file permissions: {}", e);
            }
        }

        fs::rename(&tmp, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path().join("last-ip"));

        assert_eq!(cache.read(), None);
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path().join("last-ip"));
        let ip = Ipv4Addr::new(203, 0, 113, 9);

        cache.write(ip).unwrap();
        assert_eq!(cache.read(), Some(ip));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path().join("nested").join("deeper").join("last-ip"));

        cache.write(Ipv4Addr::new(192, 0, 2, 1)).unwrap();
        assert_eq!(cache.read(), Some(Ipv4Addr::new(192, 0, 2, 1)));
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last-ip");
        fs::write(&path, "  203.0.113.9\n\n").unwrap();

        assert_eq!(Cache::new(path).read(), Some(Ipv4Addr::new(203, 0, 113, 9)));
    }

    #[test]
    fn garbage_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last-ip");
        fs::write(&path, "not an address\n").unwrap();

        assert_eq!(Cache::new(path).read(), None);
    }

    #[cfg(unix)]
    #[test]
    fn cache_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last-ip");
        let cache = Cache::new(path.clone());

        cache.write(Ipv4Addr::new(198, 51, 100, 1)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
