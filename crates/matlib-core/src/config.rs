//! Process-wide runtime configuration.
//!
//! The configuration is installed at most once per process, either explicitly
//! through [`init`] or lazily from the environment on first use. Everything
//! here is read-only after that point.

use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::error::{MatlibError, Result};

/// Environment variable overriding [`RuntimeConfig::num_threads`].
pub const ENV_NUM_THREADS: &str = "MATLIB_NUM_THREADS";
/// Environment variable overriding [`RuntimeConfig::parallel_threshold`].
pub const ENV_PARALLEL_THRESHOLD: &str = "MATLIB_PARALLEL_THRESHOLD";

const DEFAULT_PARALLEL_THRESHOLD: usize = 32 * 1024;

/// Threading model the library was built with.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallel {
    Sequential = 0,
    Thread = 1,
    OpenMp = 2,
}

/// Tunables for kernel execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Worker threads available to a single kernel call.
    pub num_threads: usize,
    /// Element count below which kernels always run on the calling thread.
    pub parallel_threshold: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            num_threads: nprocs(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl RuntimeConfig {
    /// Build a configuration from the defaults, overridden by
    /// `MATLIB_NUM_THREADS` and `MATLIB_PARALLEL_THRESHOLD`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(n) = env_usize(ENV_NUM_THREADS) {
            config.num_threads = n;
        }
        if let Some(n) = env_usize(ENV_PARALLEL_THRESHOLD) {
            config.parallel_threshold = n;
        }
        config
    }
}

fn env_usize(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    parse_positive(&raw).or_else(|| {
        warn!(key, value = %raw, "ignoring invalid value, using default");
        None
    })
}

fn parse_positive(raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

/// Install `config` as the process-wide configuration.
///
/// # Errors
/// Fails if a configuration is already installed, including one installed
/// implicitly by an earlier kernel call.
pub fn init(config: RuntimeConfig) -> Result<()> {
    if config.num_threads == 0 {
        return Err(MatlibError::invalid("num_threads must be at least 1"));
    }
    CONFIG
        .set(config)
        .map_err(|_| MatlibError::invalid("runtime configuration already initialised"))?;
    debug!(config = ?runtime(), "runtime configuration installed");
    Ok(())
}

/// The installed configuration, reading the environment on first access.
pub fn runtime() -> &'static RuntimeConfig {
    CONFIG.get_or_init(|| {
        let config = RuntimeConfig::from_env();
        debug!(?config, "runtime configuration loaded from environment");
        config
    })
}

/// Logical processor count, never below 1.
pub fn nprocs() -> usize {
    num_cpus::get().max(1)
}

/// Threading model compiled into this build.
pub fn parallel() -> Parallel {
    if cfg!(feature = "parallel") {
        Parallel::Thread
    } else {
        Parallel::Sequential
    }
}

/// Number of worker threads a kernel call may use.
pub fn num_threads() -> usize {
    #[cfg(feature = "parallel")]
    {
        pool().map(|p| p.current_num_threads()).unwrap_or(1)
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

/// Library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(feature = "parallel")]
pub(crate) fn pool() -> Option<&'static rayon::ThreadPool> {
    static POOL: OnceLock<Option<rayon::ThreadPool>> = OnceLock::new();
    POOL.get_or_init(|| {
        let threads = runtime().num_threads;
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("matlib-worker-{}", i))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!(error = %e, "failed to build thread pool, running sequentially");
                None
            }
        }
    })
    .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("4"), Some(4));
        assert_eq!(parse_positive(" 16 "), Some(16));
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive("-2"), None);
        assert_eq!(parse_positive("many"), None);
    }

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert!(config.num_threads >= 1);
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }

    #[test]
    fn test_introspection_is_defined() {
        assert!(nprocs() >= 1);
        assert!(num_threads() >= 1);
        assert!(!version().is_empty());
        match parallel() {
            Parallel::Sequential => assert!(!cfg!(feature = "parallel")),
            Parallel::Thread => assert!(cfg!(feature = "parallel")),
            Parallel::OpenMp => panic!("OpenMP is never reported"),
        }
    }

    #[test]
    fn test_init_after_runtime_fails() {
        let _ = runtime();
        assert!(init(RuntimeConfig::default()).is_err());
    }

    #[test]
    fn test_init_rejects_zero_threads() {
        let config = RuntimeConfig {
            num_threads: 0,
            parallel_threshold: 1,
        };
        assert_eq!(init(config).unwrap_err().code(), -107);
    }
}
