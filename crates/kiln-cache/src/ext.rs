//! Extension trait for [`CacheBucket`] with string convenience methods.

use crate::CacheBucket;

/// String convenience methods for [`CacheBucket`].
///
/// Implemented through a blanket impl, so [`CacheBucket`] implementors only
/// handle raw bytes.
///
/// # Example
///
/// ```
/// use kiln_cache::{Cache, CacheBucketExt, MemoryCache};
///
/// let cache = MemoryCache::new();
/// let bucket = cache.bucket("titles");
///
/// bucket.set_string("/about/index", "About");
/// assert_eq!(bucket.get_string("/about/index").as_deref(), Some("About"));
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve a cached UTF-8 string.
    ///
    /// Returns `None` on cache miss or invalid UTF-8.
    fn get_string(&self, key: &str) -> Option<String> {
        let bytes = self.get(key)?;
        String::from_utf8(bytes).ok()
    }

    /// Store a string value in the cache.
    fn set_string(&self, key: &str, value: &str) {
        self.set(key, value.as_bytes());
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cache, MemoryCache, NullCache};

    #[test]
    fn test_string_round_trip_through_memory_bucket() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("titles");

        bucket.set_string("/about/index", "About");

        assert_eq!(bucket.get_string("/about/index").as_deref(), Some("About"));
    }

    #[test]
    fn test_null_bucket_always_misses() {
        let cache = NullCache;
        let bucket = cache.bucket("titles");

        bucket.set_string("/index", "Home");

        assert_eq!(bucket.get_string("/index"), None);
    }

    #[test]
    fn test_get_string_invalid_utf8_returns_none() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("titles");
        bucket.set("/index", &[0xff, 0xfe]);

        assert_eq!(bucket.get_string("/index"), None);
    }
}
