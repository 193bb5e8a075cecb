//! Latest-version selection
//!
//! Narrows a candidate list by prerelease policy, version lock, declared
//! range and minimum age, then picks the highest remaining version.

use super::VersionInfo;
use crate::domain::{NuGetVersion, PrereleasePolicy, VersionLock, VersionRange};
use chrono::{DateTime, Duration, Utc};

/// Selection engine for the latest eligible version
#[derive(Debug, Clone)]
pub struct VersionSelector {
    prerelease: PrereleasePolicy,
    lock: VersionLock,
    /// Candidates younger than this are ignored
    min_age: Option<Duration>,
    now: DateTime<Utc>,
}

impl VersionSelector {
    pub fn new(prerelease: PrereleasePolicy, lock: VersionLock) -> Self {
        Self {
            prerelease,
            lock,
            min_age: None,
            now: Utc::now(),
        }
    }

    /// Ignore candidates published less than `days` ago (builder pattern)
    pub fn with_min_age_days(mut self, days: u32) -> Self {
        self.min_age = Some(Duration::days(i64::from(days)));
        self
    }

    /// Use a fixed current time (for testing)
    pub fn with_time(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Returns true if a single candidate passes every filter
    pub fn is_eligible(
        &self,
        current: &NuGetVersion,
        range: Option<&VersionRange>,
        candidate: &VersionInfo,
    ) -> bool {
        if candidate.version.is_prerelease()
            && !self.prerelease.allows_prerelease(current.is_prerelease())
        {
            return false;
        }
        if !self.lock.permits(current, &candidate.version) {
            return false;
        }
        if range.is_some_and(|r| !r.satisfies(&candidate.version)) {
            return false;
        }
        match self.min_age {
            Some(age) => candidate.published_before(self.now - age),
            None => true,
        }
    }

    /// Picks the highest eligible candidate, if any
    pub fn select<'a>(
        &self,
        current: &NuGetVersion,
        range: Option<&VersionRange>,
        candidates: &'a [VersionInfo],
    ) -> Option<&'a VersionInfo> {
        candidates
            .iter()
            .filter(|c| self.is_eligible(current, range, c))
            .max()
    }
}
