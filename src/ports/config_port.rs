//! Configuration access port.

/// Raw string lookup by INI section and key. Typing and validation happen in
/// the domain so a malformed value is reported instead of defaulted.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
