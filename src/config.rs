//! Configuration for the named resources and the generators' randomness

use std::env;

/// Environment variable selecting a namespace for all named resources.
pub const NAMESPACE_ENV: &str = "THREECOL_NAMESPACE";

/// Environment variable holding the generators' base random seed.
pub const SEED_ENV: &str = "THREECOL_SEED";

const SHM_NAME: &str = "3col";
const SEM_FREE: &str = "3col_free";
const SEM_USED: &str = "3col_used";
const SEM_MUTEX: &str = "3col_mutex";

/// Names of the shared memory region and the three semaphores.
///
/// The supervisor and every generator must use identical names to meet on
/// the same channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Name of the shared memory object holding the ring buffer.
    pub shm_name: String,
    /// Counting semaphore tracking free slots.
    pub free_name: String,
    /// Counting semaphore tracking used slots.
    pub used_name: String,
    /// Binary semaphore serializing writers.
    pub mutex_name: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            shm_name: format!("/{}", SHM_NAME),
            free_name: format!("/{}", SEM_FREE),
            used_name: format!("/{}", SEM_USED),
            mutex_name: format!("/{}", SEM_MUTEX),
        }
    }
}

impl ChannelConfig {
    /// Create a config whose names are all prefixed with `namespace`.
    pub fn namespaced(namespace: &str) -> Self {
        let namespace = namespace.trim_start_matches('/');
        if namespace.is_empty() {
            return Self::default();
        }
        Self {
            shm_name: format!("/{}_{}", namespace, SHM_NAME),
            free_name: format!("/{}_{}", namespace, SEM_FREE),
            used_name: format!("/{}_{}", namespace, SEM_USED),
            mutex_name: format!("/{}_{}", namespace, SEM_MUTEX),
        }
    }

    /// Build the config from `THREECOL_NAMESPACE`, falling back to the
    /// well-known names when it is unset.
    pub fn from_env() -> Self {
        match env::var(NAMESPACE_ENV) {
            Ok(ns) => Self::namespaced(&ns),
            Err(_) => Self::default(),
        }
    }
}

/// Per-generator settings.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Base random seed (each generator adds its pid). None = OS entropy.
    pub base_seed: Option<u64>,
}

impl GeneratorConfig {
    #[cfg(test)]
    pub(crate) fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = Some(seed);
        self
    }

    pub fn with_seed_option(mut self, seed: Option<u64>) -> Self {
        self.base_seed = seed;
        self
    }

    /// Read the base seed from `THREECOL_SEED`; unparsable values are ignored.
    pub fn from_env() -> Self {
        let seed = env::var(SEED_ENV).ok().and_then(|s| s.trim().parse::<u64>().ok());
        if seed.is_none() && env::var_os(SEED_ENV).is_some() {
            tracing::warn!("ignoring unparsable {}", SEED_ENV);
        }
        Self::default().with_seed_option(seed)
    }

    /// Seed for the generator running as process `pid`.
    pub fn seed_for(&self, pid: u32) -> Option<u64> {
        self.base_seed.map(|s| s.wrapping_add(pid as u64))
    }
}
