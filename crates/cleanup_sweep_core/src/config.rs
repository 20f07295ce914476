use std::env;

pub const DEFAULT_TTL_HOURS: i64 = 4;

/// Run configuration, built once at process start and passed by reference
/// into the orchestrator. Nothing below the entry point reads the
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupConfig {
    pub dry_run: bool,
    pub default_ttl_hours: i64,
    pub notification_target: Option<String>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            default_ttl_hours: DEFAULT_TTL_HOURS,
            notification_target: None,
        }
    }
}

impl CleanupConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let dry_run = lookup("DRY_RUN")
            .map(|value| value.to_lowercase() == "true")
            .unwrap_or(false);
        let default_ttl_hours = lookup("DEFAULT_TTL_HOURS")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(DEFAULT_TTL_HOURS);
        let notification_target = lookup("NOTIFICATION_TARGET")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Self {
            dry_run,
            default_ttl_hours,
            notification_target,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + '_ {
        let map: BTreeMap<&str, &str> = pairs.iter().copied().collect();
        move |key| map.get(key).map(|value| value.to_string())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = CleanupConfig::from_lookup(|_| None);
        assert_eq!(config, CleanupConfig::default());
    }

    #[test]
    fn dry_run_accepts_mixed_case_true() {
        let config = CleanupConfig::from_lookup(lookup_from(&[("DRY_RUN", "True")]));
        assert!(config.dry_run);

        let config = CleanupConfig::from_lookup(lookup_from(&[("DRY_RUN", "yes")]));
        assert!(!config.dry_run);
    }

    #[test]
    fn unparseable_ttl_falls_back_to_default() {
        let config = CleanupConfig::from_lookup(lookup_from(&[("DEFAULT_TTL_HOURS", "many")]));
        assert_eq!(config.default_ttl_hours, DEFAULT_TTL_HOURS);

        let config = CleanupConfig::from_lookup(lookup_from(&[("DEFAULT_TTL_HOURS", "12")]));
        assert_eq!(config.default_ttl_hours, 12);
    }

    #[test]
    fn blank_notification_target_is_treated_as_absent() {
        let config = CleanupConfig::from_lookup(lookup_from(&[("NOTIFICATION_TARGET", "  ")]));
        assert_eq!(config.notification_target, None);

        let config = CleanupConfig::from_lookup(lookup_from(&[(
            "NOTIFICATION_TARGET",
            "arn:aws:sns:eu-west-1:123456789012:cleanup-reports",
        )]));
        assert_eq!(
            config.notification_target.as_deref(),
            Some("arn:aws:sns:eu-west-1:123456789012:cleanup-reports")
        );
    }
}
