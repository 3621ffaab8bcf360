//! Lab hosts.
//!
//! The pool is compiled in. Each host gets exactly one job per run, executed in its own tokio
//! task alongside every other host.

use std::fmt;

/// Domain every short host name lives under.
pub const DOMAIN: &str = "cs.wm.edu";

/// SSH port used by the in-process executor.
pub const SSH_PORT: u16 = 22;

/// First-floor lab machines.
const POOL: [&str; 26] = [
    "al", "anchor", "astro", "bart", "ca", "calvin", "daffy", "dilbert", "felix", "homer", "ia",
    "ickis", "il", "krumm", "me", "mn", "or", "pepe", "ren", "saranac", "steelhead", "stimpy",
    "tweety", "tx", "wi", "zippy",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host {
    /// Short name, e.g. `bart`.
    pub name: String,
    /// Domain the short name resolves under.
    domain: String,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_domain(name, DOMAIN)
    }

    pub fn with_domain(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }

    /// Fully-qualified address to connect to.
    pub fn address(&self) -> String {
        if self.domain.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.domain)
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Forward to `pad` so width and alignment flags apply to the short name.
        f.pad(&self.name)
    }
}

/// The static host pool, in compiled-in order.
pub fn get_hosts() -> Vec<Host> {
    POOL.iter().copied().map(Host::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_and_order() {
        let hosts = get_hosts();
        assert_eq!(hosts.len(), 26);
        assert_eq!(hosts[0].name, "al");
        assert_eq!(hosts[25].name, "zippy");
    }

    #[test]
    fn test_address_appends_domain() {
        assert_eq!(Host::new("bart").address(), "bart.cs.wm.edu");
        assert_eq!(Host::with_domain("localhost", "").address(), "localhost");
    }

    #[test]
    fn test_display_honours_padding() {
        let host = Host::new("ia");
        assert_eq!(format!("{}", host), "ia");
        assert_eq!(format!("{:<6}|", host), "ia    |");
    }
}
