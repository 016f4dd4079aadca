//! Default value functions for configuration.

/// Global command prefix used when none is configured.
pub fn default_prefix() -> String {
    "!".to_string()
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "info".to_string()
}
