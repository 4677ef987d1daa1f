//! Process-wide switch gating the Qwen executor.

/// Environment variable holding the switch (`true` enables, case-insensitive).
pub const ENABLE_QWEN_INTEGRATION: &str = "ENABLE_QWEN_INTEGRATION";

/// Interpret a raw switch value. Only a case-insensitive `true` enables.
pub fn parse_enabled(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

/// Read [`ENABLE_QWEN_INTEGRATION`] from the process environment.
///
/// Callers read this once and pass the result down; executors never consult
/// the environment themselves.
pub fn integration_enabled_from_env() -> bool {
    parse_enabled(std::env::var(ENABLE_QWEN_INTEGRATION).ok().as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_is_disabled() {
        assert!(!parse_enabled(None));
    }

    #[test]
    fn test_true_any_case_enables() {
        assert!(parse_enabled(Some("true")));
        assert!(parse_enabled(Some("TRUE")));
        assert!(parse_enabled(Some("True")));
    }

    #[test]
    fn test_other_values_disable() {
        assert!(!parse_enabled(Some("false")));
        assert!(!parse_enabled(Some("1")));
        assert!(!parse_enabled(Some("yes")));
        assert!(!parse_enabled(Some("")));
        assert!(!parse_enabled(Some(" true")));
    }
}
