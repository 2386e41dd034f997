//! Path construction with encoded identifiers.

use std::fmt;

/// Percent-encode an identifier for use as a single path segment.
///
/// Everything except ASCII alphanumerics, `-`, `_` and `~` is encoded,
/// including `/` and `.`. GitLab would otherwise read a trailing `.json`
/// style suffix as a response format.
///
/// ```
/// assert_eq!(gitlabapi::encode_path("my-group"), "my-group");
/// assert_eq!(gitlabapi::encode_path("my/group.v2"), "my%2Fgroup%2Ev2");
/// assert_eq!(gitlabapi::encode_path(42), "42");
/// ```
pub fn encode_path(id: impl fmt::Display) -> String {
    urlencoding::encode(&id.to_string()).replace('.', "%2E")
}

/// A group reference: numeric ID or full path (`parent/child`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupId {
    Id(u64),
    Path(String),
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Path(path) => f.write_str(path),
        }
    }
}

impl From<u64> for GroupId {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for GroupId {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for GroupId {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&GroupId> for GroupId {
    fn from(id: &GroupId) -> Self {
        id.clone()
    }
}

impl std::str::FromStr for GroupId {
    type Err = std::convert::Infallible;

    /// Digits parse as a numeric ID, anything else as a path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<u64>().map_or_else(|_| Self::Path(s.to_string()), Self::Id))
    }
}

/// One component of a [`ResourceLocator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Fixed text, inserted as-is.
    Literal(&'static str),
    /// Caller-supplied identifier, encoded on rendering.
    Dynamic(String),
}

/// An API path built from literal and dynamic segments.
///
/// ```
/// use gitlabapi::{GroupId, ResourceLocator};
///
/// let path = ResourceLocator::new("groups")
///     .id(GroupId::from("my/group"))
///     .literal("iterations")
///     .to_string();
/// assert_eq!(path, "groups/my%2Fgroup/iterations");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    segments: Vec<Segment>,
}

impl ResourceLocator {
    pub fn new(root: &'static str) -> Self {
        Self {
            segments: vec![Segment::Literal(root)],
        }
    }

    #[must_use]
    pub fn literal(mut self, segment: &'static str) -> Self {
        self.segments.push(Segment::Literal(segment));
        self
    }

    #[must_use]
    pub fn id(mut self, id: impl fmt::Display) -> Self {
        self.segments.push(Segment::Dynamic(id.to_string()));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            match segment {
                Segment::Literal(s) => f.write_str(s)?,
                Segment::Dynamic(id) => f.write_str(&encode_path(id))?,
            }
        }
        Ok(())
    }
}
