//! Location tracking for error reporting.
//!
//! Filters arrive as JSON trees rather than source text, so a location is
//! the chain of object keys and array indices leading to a node, rendered
//! as a JSON pointer (`/AND/1/OR/0/name/gt`).

use std::fmt;

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object member.
    Key(String),
    /// Array element.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(&key.replace('~', "~0").replace('/', "~1")),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// The location of a node inside a filter document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Child location under an object key.
    pub fn key(&self, key: impl Into<String>) -> Path {
        self.child(Segment::Key(key.into()))
    }

    /// Child location at an array index.
    pub fn index(&self, index: usize) -> Path {
        self.child(Segment::Index(index))
    }

    fn child(&self, segment: Segment) -> Path {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Path { segments }
    }

    /// The segments from the root down.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Check if this is the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(Path::root().to_string(), "/");
        assert!(Path::root().is_root());
    }

    #[test]
    fn test_nested_display() {
        let path = Path::root().key("AND").index(1).key("OR").index(0).key("name").key("gt");
        assert_eq!(path.to_string(), "/AND/1/OR/0/name/gt");
        assert_eq!(path.len(), 6);
        assert_eq!(path.segments()[1], Segment::Index(1));
    }

    #[test]
    fn test_child_does_not_modify_parent() {
        let parent = Path::root().key("AND");
        let child = parent.index(3);
        assert_eq!(parent.to_string(), "/AND");
        assert_eq!(child.to_string(), "/AND/3");
    }

    #[test]
    fn test_key_escaping() {
        let path = Path::root().key("a/b").key("c~d");
        assert_eq!(path.to_string(), "/a~1b/c~0d");
    }
}
