//! Cache entries with per-entry expiration

use chrono::{DateTime, Duration, Utc};

/// A cached value together with when it was stored and how long it lives
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized value
    pub value: String,

    /// When the value was written
    pub stored_at: DateTime<Utc>,

    /// Time to live from `stored_at`
    pub ttl: Duration,
}

impl CacheEntry {
    /// Creates an entry stored now
    pub fn new(value: String, ttl: std::time::Duration) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(36_500)),
        }
    }

    /// Absolute expiry instant
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.stored_at
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// An entry is expired once its TTL has fully elapsed
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at()
    }

    /// Time left before expiry, `None` once expired
    pub fn remaining(&self) -> Option<std::time::Duration> {
        (self.expires_at() - Utc::now()).to_std().ok().filter(|d| !d.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_not_expired() {
        let entry = CacheEntry::new("v".to_string(), std::time::Duration::from_secs(3600));
        assert!(!entry.is_expired());
        let remaining = entry.remaining().unwrap();
        assert!(remaining.as_secs() > 3590 && remaining.as_secs() <= 3600);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let mut entry = CacheEntry::new("v".to_string(), std::time::Duration::from_secs(3600));
        entry.stored_at = Utc::now() - Duration::hours(2);
        assert!(entry.is_expired());
        assert!(entry.remaining().is_none());
    }

    #[test]
    fn test_entry_not_expired_just_before_ttl() {
        let mut entry = CacheEntry::new("v".to_string(), std::time::Duration::from_secs(86_400));
        entry.stored_at = Utc::now() - Duration::hours(23);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let entry = CacheEntry::new("v".to_string(), std::time::Duration::ZERO);
        assert!(entry.is_expired());
    }
}
