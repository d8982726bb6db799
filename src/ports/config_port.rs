//! Configuration access port trait.
//!
//! Numeric getters fall back to the default for missing *and* malformed
//! values; use `malformed_number` to tell the two apart when validating.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// The raw value when the key is present but not a number.
    fn malformed_number(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .filter(|raw| raw.trim().parse::<f64>().is_err())
    }
}
