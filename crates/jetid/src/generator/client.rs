use std::hash::{DefaultHasher, Hash, Hasher};

use crate::CoreId;

/// Derives a client id from the identity of the running process.
///
/// Hashes the process id together with the host name (from `HOSTNAME` or
/// `COMPUTERNAME`, when set) into the 10-bit client id space. The value is
/// deterministic for the lifetime of the process; uniqueness across hosts
/// remains the caller's responsibility.
pub fn default_client_id() -> u64 {
    let host = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_default();
    client_id_for(std::process::id(), &host)
}

fn client_id_for(pid: u32, host: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    pid.hash(&mut hasher);
    host.hash(&mut hasher);
    hasher.finish() & CoreId::CLIENT_ID_MASK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_id_is_stable_and_in_range() {
        let first = default_client_id();
        assert!(first <= CoreId::max_client_id());
        assert_eq!(first, default_client_id());
    }

    #[test]
    fn client_id_depends_on_host_and_pid() {
        let ids: std::collections::HashSet<_> = (0..64)
            .map(|pid| client_id_for(pid, "node-a"))
            .chain((0..64).map(|pid| client_id_for(pid, "node-b")))
            .collect();
        // 128 inputs into 1024 buckets: a handful of collisions at most.
        assert!(ids.len() > 100);
    }
}
