//! Macros de log internes.
//!
//! Avec la feature `logging`, elles passent à `tracing` ; sinon elles ne
//! produisent rien (les arguments sont seulement typés).

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::debug!($($arg)*);
        #[cfg(not(feature = "logging"))]
        let _ = || format!($($arg)*);
    }};
}

macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::info!($($arg)*);
        #[cfg(not(feature = "logging"))]
        let _ = || format!($($arg)*);
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::warn!($($arg)*);
        #[cfg(not(feature = "logging"))]
        let _ = || format!($($arg)*);
    }};
}

pub(crate) use log_debug;
pub(crate) use log_info;
pub(crate) use log_warn;
