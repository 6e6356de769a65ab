//! Defines the [`PostSummary`] type and the build-time indexer
//! [`list_posts`]. The indexer runs exactly once per site build: it scans the
//! posts directory, splits each file's front matter from its body via a
//! [`frontmatter::Parser`], and produces the display metadata the homepage
//! listing is rendered from.

use std::{
    fmt,
    fs::{read_dir, File},
    path::Path,
};

use crate::frontmatter;

/// Display metadata for a single post, as consumed by the homepage listing.
/// Built once per source file at index time and never mutated; there is no
/// persistence, the whole collection is recomputed on every build.
#[derive(Clone, Debug, PartialEq)]
pub struct PostSummary {
    /// The title of the post, from front matter.
    pub title: String,

    /// The category of the post, from front matter.
    pub category: String,

    /// A one-line description of the post, from front matter.
    pub description: String,

    /// The number of whitespace-separated tokens in the entire source file,
    /// front matter included. Deliberately crude: the count feeds the
    /// reading-time estimate ([`crate::readtime`]), where the handful of
    /// metadata tokens doesn't move the needle.
    pub word_count: usize,

    /// The post's URL identifier: the source file name truncated at the
    /// first `.`. See [`slug_from_file_name`].
    pub slug: String,
}

/// Derives a post's slug from its source file name: everything up to the
/// first `.`. Note this truncates multi-dot names (`my.post.mdx` yields
/// `my`), so anything after a dot never reaches the URL.
pub fn slug_from_file_name(file_name: &str) -> &str {
    match file_name.find('.') {
        Some(i) => &file_name[..i],
        None => file_name,
    }
}

/// Indexes every file in `dir` into a [`PostSummary`] using the default
/// front-matter parser ([`frontmatter::YamlParser`]).
///
/// Every directory entry is processed; there is no extension filter, so a
/// stray non-post file will be indexed and may produce garbage metadata.
/// Results are sorted by slug so the listing is stable across platforms
/// (raw directory enumeration order is not).
///
/// The indexer is strict: a file that cannot be read or whose front matter
/// cannot be split aborts the whole listing. It runs once at build time with
/// no consumer for partial results, and the error names the offending file.
pub fn list_posts(dir: &Path) -> Result<Vec<PostSummary>> {
    list_posts_with(dir, &frontmatter::YamlParser)
}

/// [`list_posts`] with an explicit front-matter parser.
pub fn list_posts_with(
    dir: &Path,
    parser: &dyn frontmatter::Parser,
) -> Result<Vec<PostSummary>> {
    let mut posts = Vec::new();
    for result in read_dir(dir)? {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        posts.push(index_entry(&file_name, &entry.path(), parser)?);
    }
    posts.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(posts)
}

/// Indexes a single file, annotating any failure with the file name.
fn index_entry(
    file_name: &str,
    path: &Path,
    parser: &dyn frontmatter::Parser,
) -> Result<PostSummary> {
    match _index_entry(file_name, path, parser) {
        Ok(summary) => Ok(summary),
        Err(e) => Err(Error::Annotated(
            format!("indexing post `{}`", file_name),
            Box::new(e),
        )),
    }
}

fn _index_entry(
    file_name: &str,
    path: &Path,
    parser: &dyn frontmatter::Parser,
) -> Result<PostSummary> {
    use std::io::Read;
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;

    let document = parser.parse(&contents)?;
    Ok(PostSummary {
        title: document.frontmatter.title,
        category: document.frontmatter.category,
        description: document.frontmatter.description,
        word_count: contents.split_whitespace().count(),
        slug: slug_from_file_name(file_name).to_owned(),
    })
}

/// Represents the result of an indexing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error indexing the posts directory.
#[derive(Debug)]
pub enum Error {
    /// Returned when the posts directory or one of its files can't be read.
    Io(std::io::Error),

    /// Returned when a file's front matter can't be split or parsed.
    Frontmatter(frontmatter::Error),

    /// An error with an annotation naming the offending file.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Frontmatter(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Frontmatter(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<frontmatter::Error> for Error {
    /// Converts a [`frontmatter::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator when delegating to the front-matter parser.
    fn from(err: frontmatter::Error) -> Error {
        Error::Frontmatter(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::readtime;

    #[test]
    fn test_slug_from_file_name() {
        assert_eq!(slug_from_file_name("hello-world.mdx"), "hello-world");
        assert_eq!(slug_from_file_name("a.b.mdx"), "a");
        assert_eq!(slug_from_file_name("no-extension"), "no-extension");
    }

    #[test]
    fn test_list_posts() -> Result<()> {
        let posts = list_posts(Path::new("./testdata/posts/"))?;

        // One summary per file, ordered by slug.
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["hello-world", "missing-category", "multi"]);
        Ok(())
    }

    #[test]
    fn test_list_posts_end_to_end() -> Result<()> {
        let posts = list_posts(Path::new("./testdata/posts/"))?;
        let hello = &posts[0];

        assert_eq!(
            hello,
            &PostSummary {
                title: String::from("Hello World"),
                category: String::from("General"),
                description: String::from("First post"),
                word_count: 450,
                slug: String::from("hello-world"),
            }
        );
        assert_eq!(readtime::estimate(hello.word_count), "2 minutes");
        Ok(())
    }

    #[test]
    fn test_list_posts_missing_field_is_empty() -> Result<()> {
        let posts = list_posts(Path::new("./testdata/posts/"))?;
        let post = &posts[1];
        assert_eq!(post.slug, "missing-category");
        assert_eq!(post.title, "Uncategorized Thoughts");
        assert_eq!(post.category, "");
        Ok(())
    }

    #[test]
    fn test_list_posts_truncates_slug_at_first_dot() -> Result<()> {
        let posts = list_posts(Path::new("./testdata/posts/"))?;
        assert_eq!(posts[2].slug, "multi");
        assert_eq!(posts[2].title, "Dots Everywhere");
        Ok(())
    }

    #[test]
    fn test_word_count_includes_frontmatter() -> Result<()> {
        use std::io::Read;
        let posts = list_posts(Path::new("./testdata/posts/"))?;
        let mut raw = String::new();
        File::open("./testdata/posts/multi.dot.mdx")?.read_to_string(&mut raw)?;
        assert_eq!(posts[2].word_count, raw.split_whitespace().count());
        Ok(())
    }

    #[test]
    fn test_list_posts_aborts_on_bad_frontmatter() {
        match list_posts(Path::new("./testdata/bad/")) {
            Err(Error::Annotated(annotation, err)) => {
                assert!(annotation.contains("unterminated.mdx"));
                match *err {
                    Error::Frontmatter(frontmatter::Error::MissingEndFence) => {}
                    other => panic!("expected MissingEndFence, got {:?}", other),
                }
            }
            other => panic!("expected annotated error, got {:?}", other),
        }
    }

    #[test]
    fn test_list_posts_missing_directory() {
        match list_posts(Path::new("./testdata/does-not-exist/")) {
            Err(Error::Io(_)) => {}
            other => panic!("expected I/O error, got {:?}", other),
        }
    }
}
