//! Configuration access port trait.
//!
//! Typed reads with caller-supplied defaults; only string lookup reports
//! absence, since every numeric knob in this crate has a sane default.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
