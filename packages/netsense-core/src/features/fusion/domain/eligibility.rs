//! Which nodes may appear in a ranking
//!
//! A signal is eligible when its kind is `wire` or `reg`, its name is not a
//! clock/reset/input-like name, carries no bus index, and does not end in a
//! flattened array suffix such as `o_sum_21`.

use once_cell::sync::Lazy;
use regex::Regex;

static EXCLUDED_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(clk|clock|rst|reset|in|input)").unwrap());

static ARRAY_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_\d+$").unwrap());

/// Name/kind filter for ranked signals
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalFilter;

impl SignalFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn is_eligible(&self, name: &str, kind: &str) -> bool {
        let kind = kind.to_ascii_lowercase();
        if kind != "wire" && kind != "reg" {
            return false;
        }
        if EXCLUDED_PREFIX.is_match(&name.to_lowercase()) {
            return false;
        }
        if name.contains('[') || name.contains(']') {
            return false;
        }
        !ARRAY_SUFFIX.is_match(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_cases() {
        let f = SignalFilter::new();
        assert!(f.is_eligible("n42", "wire"));
        assert!(f.is_eligible("carry", "REG"));
        assert!(!f.is_eligible("u1", "AND2_X1"));
        assert!(!f.is_eligible("clk_div", "wire"));
        assert!(!f.is_eligible("Reset_n", "wire"));
        assert!(!f.is_eligible("input_a", "wire"));
        assert!(!f.is_eligible("int_sig", "wire"));
        assert!(!f.is_eligible("data[3]", "wire"));
        assert!(!f.is_eligible("o_sum_21", "wire"));
        assert!(f.is_eligible("o_sum_x", "wire"));
    }
}
