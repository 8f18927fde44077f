use std::ffi::OsString;
use std::path::{self, Path, PathBuf};

use tracing::debug;

use crate::config::Separators;
use crate::errors::SandboxViolation;
use crate::scan;

/// Lexical only: symlinks and the existence of either path are never consulted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Basepath {
    separators: Separators,
}

impl Basepath {
    pub fn new(separators: Separators) -> Self {
        Self { separators }
    }

    pub fn native() -> Self {
        Self::new(Separators::native())
    }

    pub fn separators(&self) -> Separators {
        self.separators
    }

    pub fn escapes_base(&self, relative_path: &str) -> bool {
        scan::escapes_base(relative_path, self.separators)
    }

    pub fn depth(&self, relative_path: &str) -> Option<usize> {
        scan::depth(relative_path, self.separators)
    }

    /// An absent or empty base yields the relative path on its own.
    pub fn combine(
        &self,
        base: Option<&Path>,
        relative_path: &str,
    ) -> Result<PathBuf, SandboxViolation> {
        if self.escapes_base(relative_path) {
            debug!(relative_path, "relative path escapes base path");
            return Err(SandboxViolation::new(relative_path));
        }

        match base {
            Some(base) if !base.as_os_str().is_empty() => {
                Ok(self.join(base, relative_path))
            }
            _ => Ok(PathBuf::from(relative_path)),
        }
    }

    pub fn concat(
        &self,
        base: impl AsRef<Path>,
        relative_path: &str,
    ) -> Result<PathBuf, SandboxViolation> {
        self.combine(Some(base.as_ref()), relative_path)
    }

    // Unlike `Path::join`, a rooted relative path never discards the base.
    fn join(&self, base: &Path, relative_path: &str) -> PathBuf {
        let mut joined = OsString::from(base.as_os_str());
        let base_terminated = base
            .as_os_str()
            .as_encoded_bytes()
            .last()
            .is_some_and(|&byte| self.is_separator_byte(byte));
        let relative_rooted = relative_path
            .as_bytes()
            .first()
            .is_some_and(|&byte| self.is_separator_byte(byte));

        match (base_terminated, relative_rooted) {
            (true, true) => joined.push(&relative_path[1..]),
            (false, false) => {
                joined.push(path::MAIN_SEPARATOR_STR);
                joined.push(relative_path);
            }
            _ => joined.push(relative_path),
        }
        PathBuf::from(joined)
    }

    fn is_separator_byte(&self, byte: u8) -> bool {
        byte.is_ascii() && self.separators.is_separator(char::from(byte))
    }
}

pub fn escapes_base(relative_path: &str) -> bool {
    Basepath::native().escapes_base(relative_path)
}

pub fn combine(base: Option<&Path>, relative_path: &str) -> Result<PathBuf, SandboxViolation> {
    Basepath::native().combine(base, relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward() -> Basepath {
        Basepath::new(Separators::Forward)
    }

    fn combined(base: &str, relative_path: &str) -> PathBuf {
        forward().concat(base, relative_path).unwrap()
    }

    #[test]
    fn joins_with_single_separator() {
        assert_eq!(combined("/a/b/c", "d/ee/f.ff"), PathBuf::from("/a/b/c/d/ee/f.ff"));
        assert_eq!(combined("/a/b/c/", "d"), PathBuf::from("/a/b/c/d"));
        assert_eq!(combined("/", "d"), PathBuf::from("/d"));
    }

    #[test]
    fn leading_separator_does_not_reroot() {
        let path = combined("/a/b/c", "/d/ee/f.ff");
        assert_eq!(path.as_os_str(), "/a/b/c/d/ee/f.ff");
        assert!(path.starts_with("/a/b/c"));
        assert_eq!(combined("/a/b/c/", "/d").as_os_str(), "/a/b/c/d");
    }

    #[test]
    fn keeps_trailing_separator_and_dot_segments() {
        assert_eq!(combined("/a/b/c", "/d/ee/f.ff/").as_os_str(), "/a/b/c/d/ee/f.ff/");
        assert_eq!(combined("/a/b/c", "d/ee/.").as_os_str(), "/a/b/c/d/ee/.");
        assert_eq!(combined("/a/b/c", "d/..").as_os_str(), "/a/b/c/d/..");
        assert_eq!(combined("/a/b/c", "").as_os_str(), "/a/b/c/");
    }

    #[test]
    fn absent_or_empty_base_yields_relative_path() {
        let guard = forward();
        assert_eq!(guard.combine(None, "d/ee/f.ff").unwrap(), PathBuf::from("d/ee/f.ff"));
        assert_eq!(
            guard.combine(Some(Path::new("")), "d/ee/f.ff").unwrap(),
            PathBuf::from("d/ee/f.ff")
        );
        assert_eq!(guard.combine(None, "/x").unwrap().as_os_str(), "/x");
    }

    #[test]
    fn rejects_before_joining() {
        let err = forward().concat("/a/b/c", "d/ee/../../../f.ff").unwrap_err();
        assert_eq!(err.relative_path(), "d/ee/../../../f.ff");

        let err = forward().combine(None, "..").unwrap_err();
        assert_eq!(err.to_string(), "Relative path \"..\" escapes base path");
    }

    #[test]
    fn backslash_policy_rejects_windows_style_traversal() {
        let guard = Basepath::new(Separators::ForwardAndBackslash);
        assert!(guard.concat("/srv/data", "..\\etc\\passwd").is_err());
    }

    #[cfg(not(windows))]
    #[test]
    fn forward_policy_keeps_backslash_in_names() {
        assert!(forward().concat("/srv/data", "..\\etc\\passwd").is_ok());
    }

    #[cfg(windows)]
    #[test]
    fn forward_policy_still_splits_native_separator() {
        let err = forward().concat("C:\\base", "..\\..\\secret").unwrap_err();
        assert_eq!(err.relative_path(), "..\\..\\secret");
        let joined = forward().concat("C:\\base\\", "\\d").unwrap();
        assert_eq!(joined.as_os_str(), "C:\\base\\d");
    }
}
