//! Front-matter extraction for post source files. The indexer
//! ([`crate::post`]) never parses metadata syntax itself; it delegates to a
//! [`Parser`], so the metadata format can be swapped without touching the
//! indexing contract. [`YamlParser`] is the default implementation:
//! `---`-fenced YAML at the top of the file.

use std::fmt;

use serde::Deserialize;

/// The metadata block of a post source file. Every field is optional in the
/// source; absent keys deserialize to empty strings rather than failing the
/// parse.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Frontmatter {
    /// The title of the post.
    pub title: String,

    /// The category of the post.
    pub category: String,

    /// A one-line description of the post.
    pub description: String,
}

/// A source file split into its metadata block and everything after it. The
/// body borrows from the input text.
#[derive(Debug, PartialEq)]
pub struct Document<'a> {
    pub frontmatter: Frontmatter,
    pub body: &'a str,
}

/// Splits raw source text into a [`Document`]. Implementations own both the
/// delimiting convention and the metadata syntax.
pub trait Parser {
    fn parse<'a>(&self, input: &'a str) -> Result<Document<'a>>;
}

/// The default [`Parser`]: YAML front matter fenced by `---` lines. A file
/// that does not begin with a fence has no front matter; the whole input is
/// body and the metadata fields are empty.
pub struct YamlParser;

impl Parser for YamlParser {
    fn parse<'a>(&self, input: &'a str) -> Result<Document<'a>> {
        const FENCE: &str = "---";
        if !input.starts_with(FENCE) {
            return Ok(Document {
                frontmatter: Frontmatter::default(),
                body: input,
            });
        }
        match input[FENCE.len()..].find(FENCE) {
            None => Err(Error::MissingEndFence),
            Some(offset) => {
                let yaml = &input[FENCE.len()..FENCE.len() + offset];
                let frontmatter = if yaml.trim().is_empty() {
                    // serde_yaml rejects an empty document; an empty block
                    // just means no metadata.
                    Frontmatter::default()
                } else {
                    serde_yaml::from_str(yaml)?
                };
                Ok(Document {
                    frontmatter,
                    body: &input[FENCE.len() + offset + FENCE.len()..],
                })
            }
        }
    }
}

/// The result of a front-matter parse.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error splitting front matter from a source file.
#[derive(Debug)]
pub enum Error {
    /// Returned when a starting fence (`---`) has no matching end fence.
    MissingEndFence,

    /// Returned when there was an error parsing the front matter as YAML.
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingEndFence => write!(f, "Missing closing `---`"),
            Error::DeserializeYaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_full_frontmatter() -> Result<()> {
        let doc = YamlParser.parse(
            "---\ntitle: Hello World\ncategory: General\ndescription: First post\n---\nBody text.",
        )?;
        assert_eq!(
            doc.frontmatter,
            Frontmatter {
                title: String::from("Hello World"),
                category: String::from("General"),
                description: String::from("First post"),
            }
        );
        assert_eq!(doc.body, "\nBody text.");
        Ok(())
    }

    #[test]
    fn test_parse_missing_field_defaults_to_empty() -> Result<()> {
        let doc = YamlParser
            .parse("---\ntitle: Untagged\ndescription: No category here\n---\nBody.")?;
        assert_eq!(doc.frontmatter.title, "Untagged");
        assert_eq!(doc.frontmatter.category, "");
        assert_eq!(doc.frontmatter.description, "No category here");
        Ok(())
    }

    #[test]
    fn test_parse_no_fence_is_all_body() -> Result<()> {
        let doc = YamlParser.parse("Just prose, no metadata at all.")?;
        assert_eq!(doc.frontmatter, Frontmatter::default());
        assert_eq!(doc.body, "Just prose, no metadata at all.");
        Ok(())
    }

    #[test]
    fn test_parse_empty_block() -> Result<()> {
        let doc = YamlParser.parse("---\n---\nBody.")?;
        assert_eq!(doc.frontmatter, Frontmatter::default());
        Ok(())
    }

    #[test]
    fn test_parse_missing_end_fence() {
        match YamlParser.parse("---\ntitle: Never closed\n") {
            Err(Error::MissingEndFence) => {}
            other => panic!("expected MissingEndFence, got {:?}", other),
        }
    }
}
