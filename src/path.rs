//! The path of a URL
//!
//! Most URLs carry a list of path segments, but URLs like `mailto:foo@bar`
//! that cannot be used as a base carry a single opaque string instead.

use crate::util;

/// [Specification](https://url.spec.whatwg.org/#concept-url-path)
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Path {
    /// A single string, not subject to segment-wise normalization
    Opaque(String),

    /// A list of percent-encoded path segments
    Segments(Vec<String>),
}

impl Path {
    /// Whether this is the opaque variant
    ///
    /// URLs with an opaque path cannot be used as a base for relative
    /// parsing.
    #[inline]
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }

    /// The path segments, unless the path is opaque
    #[must_use]
    pub fn segments(&self) -> Option<&[String]> {
        match self {
            Self::Opaque(_) => None,
            Self::Segments(segments) => Some(segments),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Self::Opaque(path) => path.is_empty(),
            Self::Segments(segments) => segments.is_empty(),
        }
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<String> {
        match self {
            Self::Segments(segments) => segments,
            Self::Opaque(_) => unreachable!("segment operation on an opaque path"),
        }
    }

    pub(crate) fn opaque_mut(&mut self) -> &mut String {
        match self {
            Self::Opaque(path) => path,
            Self::Segments(_) => unreachable!("opaque append to a segmented path"),
        }
    }

    pub(crate) fn push(&mut self, segment: String) {
        self.segments_mut().push(segment);
    }

    /// The first segment, if the path is segmented and non-empty
    pub(crate) fn first_segment(&self) -> Option<&str> {
        self.segments()?.first().map(String::as_str)
    }

    /// <https://url.spec.whatwg.org/#shorten-a-urls-path>
    ///
    /// Removes the last segment, except that the drive letter of a `file:`
    /// URL is never removed.
    pub(crate) fn shorten(&mut self, scheme: &str) {
        let segments = self.segments_mut();

        if scheme == "file"
            && segments.len() == 1
            && util::is_normalized_windows_drive_letter(&segments[0])
        {
            return;
        }

        segments.pop();
    }

    /// Drop leading empty segments until at most one remains
    ///
    /// `file:` URLs collapse superfluous empty segments before the drive
    /// letter or first real segment.
    pub(crate) fn trim_leading_empty_segments(&mut self) {
        let segments = self.segments_mut();

        while segments.len() > 1 && segments[0].is_empty() {
            segments.remove(0);
        }
    }

    /// <https://url.spec.whatwg.org/#url-path-serializer>
    pub(crate) fn serialize(&self, output: &mut String) {
        match self {
            Self::Opaque(path) => output.push_str(path),
            Self::Segments(segments) => {
                for segment in segments {
                    output.push('/');
                    output.push_str(segment);
                }
            },
        }
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::Segments(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(segments: &[&str]) -> Path {
        Path::Segments(segments.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn serialization() {
        let mut output = String::new();
        segments(&[]).serialize(&mut output);
        assert_eq!(output, "");

        let mut output = String::new();
        segments(&[""]).serialize(&mut output);
        assert_eq!(output, "/");

        let mut output = String::new();
        segments(&["a", "b", ""]).serialize(&mut output);
        assert_eq!(output, "/a/b/");

        let mut output = String::new();
        Path::Opaque("foo@bar".to_string()).serialize(&mut output);
        assert_eq!(output, "foo@bar");
    }

    #[test]
    fn shorten_preserves_drive_letter() {
        let mut path = segments(&["C:", "a"]);
        path.shorten("file");
        path.shorten("file");
        path.shorten("file");
        assert_eq!(path, segments(&["C:"]));

        let mut path = segments(&["C:"]);
        path.shorten("http");
        assert_eq!(path, segments(&[]));
    }

    #[test]
    fn trim_leading_empty() {
        let mut path = segments(&["", "", "a"]);
        path.trim_leading_empty_segments();
        assert_eq!(path, segments(&["a"]));

        let mut path = segments(&["", ""]);
        path.trim_leading_empty_segments();
        assert_eq!(path, segments(&[""]));
    }
}
