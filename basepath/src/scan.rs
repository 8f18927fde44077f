use crate::config::Separators;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    Empty,
    Current,
    Parent,
    Normal,
}

impl Segment {
    pub fn classify(segment: &str) -> Self {
        match segment {
            "" => Self::Empty,
            "." => Self::Current,
            ".." => Self::Parent,
            _ => Self::Normal,
        }
    }
}

/// Net depth below the base after the whole path, or `None` once a `..` would climb
/// above it. `a/../../a` escapes even though it ends back where it started.
pub fn depth(relative_path: &str, separators: Separators) -> Option<usize> {
    let normalized = separators.normalize(relative_path);

    let mut depth: usize = 0;
    for segment in normalized.split(Separators::CANONICAL) {
        match Segment::classify(segment) {
            Segment::Parent => depth = depth.checked_sub(1)?,
            Segment::Normal => depth += 1,
            Segment::Empty | Segment::Current => {}
        }
    }
    Some(depth)
}

pub fn escapes_base(relative_path: &str, separators: Separators) -> bool {
    depth(relative_path, separators).is_none()
}
