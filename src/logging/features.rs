//! Feature-specific logging macros and utilities
//!
//! Each area of the crate logs under its own target so the engine can be
//! filtered per feature (for example, permission decisions at `debug` while
//! everything else stays at `info`).

/// Feature categories for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFeature {
    Permissions,
    Store,
    Schema,
    Config,
}

impl LogFeature {
    pub const ALL: [LogFeature; 4] = [
        LogFeature::Permissions,
        LogFeature::Store,
        LogFeature::Schema,
        LogFeature::Config,
    ];

    /// Get the target string for this feature
    pub fn target(&self) -> &'static str {
        match self {
            LogFeature::Permissions => "datafold_store::permissions",
            LogFeature::Store => "datafold_store::store",
            LogFeature::Schema => "datafold_store::schema",
            LogFeature::Config => "datafold_store::config",
        }
    }

    /// Name used for this feature in `LogConfig::features`
    pub fn name(&self) -> &'static str {
        match self {
            LogFeature::Permissions => "permissions",
            LogFeature::Store => "store",
            LogFeature::Schema => "schema",
            LogFeature::Config => "config",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|feature| feature.name() == name)
    }
}

// Permission-specific logging macros
#[macro_export]
macro_rules! log_permissions_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "datafold_store::permissions", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_permissions_info {
    ($($arg:tt)*) => {
        log::info!(target: "datafold_store::permissions", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_permissions_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "datafold_store::permissions", $($arg)*)
    };
}

// Store engine logging macros
#[macro_export]
macro_rules! log_store_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "datafold_store::store", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_store_info {
    ($($arg:tt)*) => {
        log::info!(target: "datafold_store::store", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_store_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "datafold_store::store", $($arg)*)
    };
}

// Schema-specific logging macros
#[macro_export]
macro_rules! log_schema_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "datafold_store::schema", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_schema_info {
    ($($arg:tt)*) => {
        log::info!(target: "datafold_store::schema", $($arg)*)
    };
}

// Configuration logging macros
#[macro_export]
macro_rules! log_config_info {
    ($($arg:tt)*) => {
        log::info!(target: "datafold_store::config", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_config_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "datafold_store::config", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for feature in LogFeature::ALL {
            assert_eq!(LogFeature::from_name(feature.name()), Some(feature));
            assert!(feature.target().ends_with(feature.name()));
        }
        assert_eq!(LogFeature::from_name("network"), None);
    }
}
