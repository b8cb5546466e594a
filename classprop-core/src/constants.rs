//! Defaults shared by classprop crates.

/// Property name used when a cache is built without one.
pub const DEFAULT_PROPERTY_NAME: &str = "value";

/// Environment variable suffix holding the property name.
pub const ENV_NAME_SUFFIX: &str = "_NAME";

/// Environment variable suffix holding the staleness timeout in milliseconds.
pub const ENV_TIMEOUT_MS_SUFFIX: &str = "_TIMEOUT_MS";
