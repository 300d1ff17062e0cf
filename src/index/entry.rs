//! Documentation entry records and their borrowed views.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One record of a search index: a single indexed location within a documentation site.
///
/// Every field is a string on the wire. Missing fields and explicit `null` read as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocEntry {
    #[serde(default, deserialize_with = "nullable_string")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub page: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub text: String,
    #[serde(default)]
    pub category: Category,
}

impl DocEntry {
    /// Parsed view of [`DocEntry::location`].
    pub fn location(&self) -> Location<'_> {
        Location::parse(&self.location)
    }

    /// First non-blank line of the entry text, trimmed.
    pub fn summary(&self) -> Option<&str> {
        self.text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }

    /// Entry text with the generator's trailing blank-line padding removed.
    pub fn body(&self) -> &str {
        self.text.trim_end()
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of an indexed entry.
///
/// The generator draws these from a small set; anything else is kept verbatim in
/// [`Category::Other`] so that writing an index back out is lossless.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Category {
    Page,
    Section,
    Module,
    Function,
    Method,
    Macro,
    Type,
    Constant,
    Keyword,
    /// Empty or missing category.
    #[default]
    Unspecified,
    Other(String),
}

impl Category {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Page => "page",
            Self::Section => "section",
            Self::Module => "module",
            Self::Function => "function",
            Self::Method => "method",
            Self::Macro => "macro",
            Self::Type => "type",
            Self::Constant => "constant",
            Self::Keyword => "keyword",
            Self::Unspecified => "",
            Self::Other(s) => s,
        }
    }

    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unspecified | Self::Other(_))
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s {
            "page" => Self::Page,
            "section" => Self::Section,
            "module" => Self::Module,
            "function" => Self::Function,
            "method" => Self::Method,
            "macro" => Self::Macro,
            "type" => Self::Type,
            "constant" => Self::Constant,
            "keyword" => Self::Keyword,
            "" => Self::Unspecified,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match Self::from(s.as_str()) {
            Self::Other(_) => Self::Other(s),
            known => known,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(nullable_string(deserializer)?.into())
    }
}

/// Borrowed view of a location string: `path#anchor`.
///
/// An empty path is the site's root page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    pub path: &'a str,
    pub anchor: Option<&'a str>,
}

impl<'a> Location<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once('#') {
            Some((path, anchor)) => Self {
                path,
                anchor: Some(anchor),
            },
            None => Self {
                path: raw,
                anchor: None,
            },
        }
    }

    /// Split a symbol anchor into its name and call signature.
    ///
    /// `Pkg.f-Tuple{Any, Any}` becomes `("Pkg.f", Some("Tuple{Any, Any}"))`. Anchors
    /// without a signature return the whole anchor as the name.
    pub fn symbol(&self) -> Option<(&'a str, Option<&'a str>)> {
        let anchor = self.anchor?;
        let split = ["-Tuple{", "-NTuple{"]
            .iter()
            .filter_map(|marker| anchor.find(marker))
            .min();

        Some(match split {
            Some(pos) => (&anchor[..pos], Some(&anchor[pos + 1..])),
            None => (anchor, None),
        })
    }
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.anchor {
            Some(anchor) => write!(f, "{}#{}", self.path, anchor),
            None => f.write_str(self.path),
        }
    }
}
