//! Version validation and ordering.
//!
//! Both sides of a comparison go through [`parse_version`], so a malformed
//! string from the server and one from the running app fail the same way.
//! Surrounding whitespace and a leading `v` or `=` are accepted, the way
//! loose semver validators treat release tags.

use super::error::{Result, UpdateError, VersionOrigin};
use semver::{BuildMetadata, Version};
use std::cmp::Ordering;

pub fn parse_version(origin: VersionOrigin, value: &str) -> Result<Version> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_prefix('=').unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    Version::parse(trimmed).map_err(|_| UpdateError::InvalidVersion {
        origin,
        value: value.to_string(),
    })
}

/// Orders versions by precedence. Build metadata does not take part.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    strip_build(a).cmp(&strip_build(b))
}

/// `true` when `latest` should replace `running`.
pub fn is_newer(running: &Version, latest: &Version) -> bool {
    compare(running, latest) == Ordering::Less
}

fn strip_build(version: &Version) -> Version {
    let mut version = version.clone();
    version.build = BuildMetadata::EMPTY;
    version
}
