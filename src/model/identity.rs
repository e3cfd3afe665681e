//! Resource identity and its `~partition~name` path encoding.

use std::fmt;
use thiserror::Error;

/// Separator between the components of an encoded identity.
pub const PATH_SEPARATOR: char = '~';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path")]
pub struct PathError;

/// Identity of a configuration resource: unique `(partition, name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    pub partition: String,
    pub name: String,
}

impl ResourceId {
    pub fn new(partition: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            name: name.into(),
        }
    }

    /// Parse an encoded identity such as `~Common~myProfile`.
    ///
    /// A segment without any separator resolves to `default_partition` when
    /// one is configured; otherwise the segment must split into exactly three
    /// components. The leading component is not inspected.
    pub fn parse(segment: &str, default_partition: Option<&str>) -> Result<Self, PathError> {
        if let Some(partition) = default_partition {
            if !segment.is_empty() && !segment.contains(PATH_SEPARATOR) {
                return Ok(Self::new(partition, segment));
            }
        }

        let parts: Vec<&str> = segment.split(PATH_SEPARATOR).collect();
        match parts.as_slice() {
            [_, partition, name] => Ok(Self::new(*partition, *name)),
            _ => Err(PathError),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}~{}", self.partition, self.name)
    }
}
