/// Line break convention of the document a region was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// U+000A -- LineFeed
    #[default]
    Lf,
    /// CarriageReturn followed by LineFeed.
    Crlf,
}

#[cfg(target_os = "windows")]
pub const NATIVE: LineEnding = LineEnding::Crlf;

#[cfg(not(target_os = "windows"))]
pub const NATIVE: LineEnding = LineEnding::Lf;

impl LineEnding {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }

    /// Returns the convention of the first line break in `text`, `Lf` when there is none.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(idx) if idx > 0 && text.as_bytes()[idx - 1] == b'\r' => Self::Crlf,
            _ => Self::Lf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_lf() {
        assert_eq!(LineEnding::detect("a\nb\r\n"), LineEnding::Lf);
    }

    #[test]
    fn test_detect_crlf() {
        assert_eq!(LineEnding::detect("a\r\nb\n"), LineEnding::Crlf);
    }

    #[test]
    fn test_detect_no_break() {
        assert_eq!(LineEnding::detect("single"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("\n"), LineEnding::Lf);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(LineEnding::Lf.as_str(), "\n");
        assert_eq!(LineEnding::Crlf.as_str(), "\r\n");
    }
}
