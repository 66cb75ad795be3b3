//=========================================================================
// Asset Path
//=========================================================================
//
// Normalized (directory, file name) identity of a resource.
//
// Normalization: `\` → `/`, empty and `.` segments dropped, `..` pops the
// previous segment. The last segment is the file name.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== AssetPath ===========================================================

/// Cache key for a resource.
///
/// Two spellings of the same location compare equal:
///
/// ```rust
/// # use stagecraft::core::resource::AssetPath;
/// assert_eq!(
///     AssetPath::new("textures/", "cell"),
///     AssetPath::parse("./textures//ui/../cell"),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetPath {
    directory: String,
    name: String,
}

impl AssetPath {
    /// Builds a path from a directory and a file name.
    pub fn new(directory: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        let joined = format!("{}/{}", directory.as_ref(), name.as_ref());
        Self::parse(&joined)
    }

    /// Splits a full path at its last separator.
    pub fn parse(full: &str) -> Self {
        let mut segments: Vec<&str> = Vec::new();

        for segment in full.split(|c| c == '/' || c == '\\') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }

        let name = segments.pop().unwrap_or_default().to_string();
        Self {
            directory: segments.join("/"),
            name,
        }
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

//--- Trait Implementations -----------------------------------------------

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.directory.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.directory, self.name)
        }
    }
}

impl From<&str> for AssetPath {
    fn from(full: &str) -> Self {
        Self::parse(full)
    }
}

impl From<&AssetPath> for AssetPath {
    fn from(path: &AssetPath) -> Self {
        path.clone()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_directory_and_name() {
        let path = AssetPath::parse("fonts/ui/title");
        assert_eq!(path.directory(), "fonts/ui");
        assert_eq!(path.name(), "title");
    }

    #[test]
    fn backslashes_normalized() {
        assert_eq!(
            AssetPath::parse("sounds\\pop"),
            AssetPath::new("sounds", "pop")
        );
    }

    #[test]
    fn redundant_segments_removed() {
        let path = AssetPath::parse("./models//virus/./mesh");
        assert_eq!(path.to_string(), "models/virus/mesh");
    }

    #[test]
    fn parent_segments_resolved() {
        let path = AssetPath::new("textures/cells/..", "background");
        assert_eq!(path.to_string(), "textures/background");
    }

    #[test]
    fn bare_name_has_empty_directory() {
        let path = AssetPath::from("logo");
        assert_eq!(path.directory(), "");
        assert_eq!(path.to_string(), "logo");
    }

    #[test]
    fn trailing_separator_on_directory_ignored() {
        assert_eq!(AssetPath::new("a/b/", "c"), AssetPath::new("a/b", "c"));
    }
}
