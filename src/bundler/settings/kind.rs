//! Content kinds and artifact naming.

use std::{convert::Infallible, fmt, str::FromStr};

/// MIME type for script bundles.
pub const JS_MIME_TYPE: &str = "text/javascript";

/// MIME type for stylesheet bundles.
pub const CSS_MIME_TYPE: &str = "text/css";

/// The declared kind of a bundle's content.
///
/// Determines the artifact's name prefix and extension, and which transform
/// (if any) is applied to each source.
///
/// # Examples
///
/// ```
/// use kodegen_bundler_assets::bundler::ContentKind;
///
/// let kind: ContentKind = "js".parse().unwrap();
/// assert_eq!(kind, ContentKind::Script);
/// assert_eq!(kind.artifact_name("abc"), "jsbuild-abc.js");
///
/// let unknown = ContentKind::from_mime("application/x-whatever");
/// assert_eq!(unknown.artifact_name("abc"), "txtbuild-abc.txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// `text/javascript`
    Script,
    /// `text/css`
    Stylesheet,
    /// `text/html`
    Html,
    /// `application/json`
    Json,
    /// Any other MIME type; bundled as plain text.
    Other(String),
}

impl ContentKind {
    /// Maps a MIME type to a kind. Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "text/javascript" | "application/javascript" | "application/x-javascript" => {
                Self::Script
            }
            "text/css" => Self::Stylesheet,
            "text/html" => Self::Html,
            "application/json" => Self::Json,
            _ => Self::Other(essence),
        }
    }

    /// Accepts short names (`js`, `script`, `css`, ...) as well as MIME types.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "js" | "script" | "javascript" => Self::Script,
            "css" | "stylesheet" | "style" => Self::Stylesheet,
            "html" | "htm" => Self::Html,
            "json" => Self::Json,
            other => Self::from_mime(other),
        }
    }

    /// Canonical MIME type.
    pub fn mime(&self) -> &str {
        match self {
            Self::Script => JS_MIME_TYPE,
            Self::Stylesheet => CSS_MIME_TYPE,
            Self::Html => "text/html",
            Self::Json => "application/json",
            Self::Other(mime) => mime,
        }
    }

    /// Extension without the leading dot.
    pub fn ext(&self) -> &'static str {
        match self {
            Self::Script => "js",
            Self::Stylesheet => "css",
            Self::Html => "html",
            Self::Json => "json",
            Self::Other(_) => "txt",
        }
    }

    /// Extension with the leading dot.
    pub fn extension(&self) -> String {
        format!(".{}", self.ext())
    }

    /// Artifact name prefix, e.g. `jsbuild`.
    pub fn prefix(&self) -> String {
        format!("{}build", self.ext())
    }

    /// `<prefix>-<digest><extension>`
    pub fn artifact_name(&self, digest: &str) -> String {
        format!("{}-{}{}", self.prefix(), digest, self.extension())
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

impl FromStr for ContentKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}
