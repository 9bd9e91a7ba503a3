//! Configuration access port trait.

/// Read-only access to sectioned key/value settings. Lookups never fail;
/// callers decide how to treat absent or malformed values.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
}
