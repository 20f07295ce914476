use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TAG_PURPOSE_KEY: &str = "Purpose";
pub const TAG_PURPOSE_VALUE: &str = "aws-coworker-test";
pub const TAG_CREATED_KEY: &str = "TestRun";
pub const TAG_TTL_KEY: &str = "TTL";

/// Creation timestamps are tagged as UTC without a zone suffix,
/// e.g. `20260130-143022`.
pub const CREATED_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Age in fractional hours derived from the first creation-timestamp tag.
///
/// A missing or unparseable timestamp yields positive infinity: these are
/// test-only resources, so an unknown age is treated as expired. Clock skew
/// can make the result negative, which callers never treat as expired
/// because the expiry comparison is strict.
pub fn resource_age_hours(tags: &[Tag], now: DateTime<Utc>) -> f64 {
    for tag in tags {
        if tag.key == TAG_CREATED_KEY {
            return match NaiveDateTime::parse_from_str(&tag.value, CREATED_TIMESTAMP_FORMAT) {
                Ok(created) => (now - created.and_utc()).num_seconds() as f64 / 3600.0,
                Err(_) => f64::INFINITY,
            };
        }
    }
    f64::INFINITY
}

/// TTL in hours from the first TTL tag, falling back to the run default.
///
/// Zero and negative values are honored as-is: they expire the resource as
/// soon as any positive age is observed.
pub fn ttl_hours(tags: &[Tag], default_ttl_hours: i64) -> i64 {
    for tag in tags {
        if tag.key == TAG_TTL_KEY {
            return match tag.value.trim().parse() {
                Ok(ttl) => ttl,
                Err(_) => default_ttl_hours,
            };
        }
    }
    default_ttl_hours
}

/// Exact, case-sensitive match on the purpose marker.
pub fn is_test_resource(tags: &[Tag]) -> bool {
    tags.iter()
        .any(|tag| tag.key == TAG_PURPOSE_KEY && tag.value == TAG_PURPOSE_VALUE)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 14, 12, 0, 0)
            .single()
            .expect("fixed timestamp should be valid")
    }

    fn created_tag(hours_ago: i64) -> Tag {
        let created = fixed_now() - Duration::hours(hours_ago);
        Tag::new(TAG_CREATED_KEY, created.format(CREATED_TIMESTAMP_FORMAT).to_string())
    }

    #[test]
    fn age_is_derived_from_creation_timestamp() {
        let tags = vec![created_tag(20)];
        assert_eq!(resource_age_hours(&tags, fixed_now()), 20.0);
    }

    #[test]
    fn age_is_infinite_without_creation_tag() {
        let tags = vec![Tag::new("Name", "leftover")];
        assert_eq!(resource_age_hours(&tags, fixed_now()), f64::INFINITY);
    }

    #[test]
    fn age_is_infinite_for_malformed_timestamp() {
        let tags = vec![Tag::new(TAG_CREATED_KEY, "last tuesday")];
        assert_eq!(resource_age_hours(&tags, fixed_now()), f64::INFINITY);
    }

    #[test]
    fn age_can_be_negative_under_clock_skew() {
        let created = fixed_now() + Duration::hours(2);
        let tags = vec![Tag::new(
            TAG_CREATED_KEY,
            created.format(CREATED_TIMESTAMP_FORMAT).to_string(),
        )];
        assert_eq!(resource_age_hours(&tags, fixed_now()), -2.0);
    }

    #[test]
    fn ttl_tag_overrides_default_including_zero() {
        let tags = vec![Tag::new(TAG_TTL_KEY, "0")];
        assert_eq!(ttl_hours(&tags, 4), 0);
    }

    #[test]
    fn malformed_ttl_falls_back_to_default() {
        let tags = vec![Tag::new(TAG_TTL_KEY, "soon")];
        assert_eq!(ttl_hours(&tags, 4), 4);
    }

    #[test]
    fn missing_ttl_falls_back_to_default() {
        assert_eq!(ttl_hours(&[], 7), 7);
    }

    #[test]
    fn purpose_marker_match_is_case_sensitive() {
        let marked = vec![Tag::new(TAG_PURPOSE_KEY, TAG_PURPOSE_VALUE)];
        let wrong_case = vec![Tag::new(TAG_PURPOSE_KEY, "AWS-Coworker-Test")];
        assert!(is_test_resource(&marked));
        assert!(!is_test_resource(&wrong_case));
    }
}
