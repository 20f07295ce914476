use chrono::{DateTime, Utc};

use crate::tags::{self, Tag};

/// Delete decision plus the numbers it was derived from, kept for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpiryVerdict {
    pub expired: bool,
    pub age_hours: f64,
    pub ttl_hours: i64,
}

/// Derives age and TTL from the tag set and compares them. A resource
/// exactly at its TTL boundary is not yet expired.
pub fn evaluate(tags: &[Tag], now: DateTime<Utc>, default_ttl_hours: i64) -> ExpiryVerdict {
    let age_hours = tags::resource_age_hours(tags, now);
    let ttl_hours = tags::ttl_hours(tags, default_ttl_hours);
    ExpiryVerdict {
        expired: age_hours > ttl_hours as f64,
        age_hours,
        ttl_hours,
    }
}

/// Full keep-or-delete verdict. Resources without the purpose marker never
/// evaluate age or TTL.
pub fn should_cleanup(tags: &[Tag], now: DateTime<Utc>, default_ttl_hours: i64) -> bool {
    if !tags::is_test_resource(tags) {
        return false;
    }
    evaluate(tags, now, default_ttl_hours).expired
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use crate::tags::{CREATED_TIMESTAMP_FORMAT, TAG_CREATED_KEY, TAG_PURPOSE_KEY, TAG_PURPOSE_VALUE, TAG_TTL_KEY};

    use super::*;

    const DEFAULT_TTL: i64 = 4;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 14, 12, 0, 0)
            .single()
            .expect("fixed timestamp should be valid")
    }

    fn marked_tags(created_ago: Duration) -> Vec<Tag> {
        let created = fixed_now() - created_ago;
        vec![
            Tag::new(TAG_PURPOSE_KEY, TAG_PURPOSE_VALUE),
            Tag::new(TAG_CREATED_KEY, created.format(CREATED_TIMESTAMP_FORMAT).to_string()),
        ]
    }

    #[test]
    fn unmarked_resources_are_never_expired() {
        let created = fixed_now() - Duration::hours(500);
        let tags = vec![Tag::new(
            TAG_CREATED_KEY,
            created.format(CREATED_TIMESTAMP_FORMAT).to_string(),
        )];
        assert!(!should_cleanup(&tags, fixed_now(), DEFAULT_TTL));
    }

    #[test]
    fn age_equal_to_ttl_is_not_expired() {
        let tags = marked_tags(Duration::hours(DEFAULT_TTL));
        assert!(!should_cleanup(&tags, fixed_now(), DEFAULT_TTL));
    }

    #[test]
    fn age_just_past_ttl_is_expired() {
        let tags = marked_tags(Duration::hours(DEFAULT_TTL) + Duration::minutes(1));
        assert!(should_cleanup(&tags, fixed_now(), DEFAULT_TTL));
    }

    #[test]
    fn marked_resource_without_timestamp_is_expired() {
        let tags = vec![
            Tag::new(TAG_PURPOSE_KEY, TAG_PURPOSE_VALUE),
            Tag::new(TAG_TTL_KEY, "10000"),
        ];
        assert!(should_cleanup(&tags, fixed_now(), DEFAULT_TTL));
    }

    #[test]
    fn marked_resource_with_malformed_timestamp_is_expired() {
        let mut tags = marked_tags(Duration::hours(1));
        tags[1].value = "not-a-timestamp".to_string();
        assert!(should_cleanup(&tags, fixed_now(), DEFAULT_TTL));
    }

    #[test]
    fn malformed_ttl_behaves_like_missing_ttl() {
        let mut tags = marked_tags(Duration::hours(2));
        tags.push(Tag::new(TAG_TTL_KEY, "garbage"));
        let verdict = evaluate(&tags, fixed_now(), DEFAULT_TTL);
        assert_eq!(verdict.ttl_hours, DEFAULT_TTL);
        assert!(!verdict.expired);
    }

    #[test]
    fn zero_ttl_expires_any_positive_age() {
        let mut tags = marked_tags(Duration::minutes(5));
        tags.push(Tag::new(TAG_TTL_KEY, "0"));
        assert!(should_cleanup(&tags, fixed_now(), DEFAULT_TTL));
    }

    #[test]
    fn negative_age_is_not_expired_even_with_zero_ttl() {
        let created = fixed_now() + Duration::hours(1);
        let tags = vec![
            Tag::new(TAG_PURPOSE_KEY, TAG_PURPOSE_VALUE),
            Tag::new(TAG_CREATED_KEY, created.format(CREATED_TIMESTAMP_FORMAT).to_string()),
            Tag::new(TAG_TTL_KEY, "0"),
        ];
        assert!(!should_cleanup(&tags, fixed_now(), DEFAULT_TTL));
    }

    #[test]
    fn per_resource_ttl_overrides_default() {
        let mut tags = marked_tags(Duration::hours(6));
        tags.push(Tag::new(TAG_TTL_KEY, "12"));
        let verdict = evaluate(&tags, fixed_now(), DEFAULT_TTL);
        assert_eq!(verdict.ttl_hours, 12);
        assert!(!verdict.expired);
    }
}
