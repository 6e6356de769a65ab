//! Responsible for templating and writing the output HTML pages: the
//! homepage (about section plus the post listing) and one page per post.
//! Post pages are compiled independently from their own source files rather
//! than from the indexer's output; the indexer only feeds the listing.

use std::fmt;
use std::fs::{read_dir, File};
use std::io;
use std::path::{Path, PathBuf};

use gtmpl::{Template, Value};
use url::Url;

use crate::config::Link;
use crate::frontmatter;
use crate::markdown;
use crate::post::{slug_from_file_name, PostSummary};
use crate::readtime;

/// Templates and writes HTML pages to disk.
pub struct Writer<'a> {
    /// The template for the homepage.
    pub index_template: &'a Template,

    /// The template for post pages.
    pub posts_template: &'a Template,

    /// The site title, made available to every template.
    pub title: &'a str,

    /// The site-wide meta description, made available to every template.
    pub description: &'a str,

    /// The URL for the site's home page, typically the destination for the
    /// site-header link.
    pub home_page: &'a Url,

    /// The base URL for static assets, typically for the theme's stylesheet.
    pub static_url: &'a Url,

    /// The base URL for post pages; a post's page lives at
    /// `{posts_url}{slug}.html`.
    pub posts_url: &'a Url,

    /// Header navigation links, made available to every template.
    pub links: &'a [Link],

    /// The directory in which the homepage is written.
    pub root_output_directory: &'a Path,

    /// The directory in which post pages are written.
    pub posts_output_directory: &'a Path,
}

impl Writer<'_> {
    /// Templates the homepage from the rendered about section and the post
    /// listing, and writes it to `{root_output_directory}/index.html`.
    pub fn write_index(&self, posts: &[PostSummary], about_html: &str) -> Result<()> {
        let mut listing = Vec::with_capacity(posts.len());
        for post in posts {
            listing.push(self.summary_value(post)?);
        }

        let mut item: Map = Map::new();
        item.insert("about".to_owned(), Value::String(about_html.to_owned()));
        item.insert("posts".to_owned(), Value::Array(listing));

        self.write_page(&Page {
            item: Value::Object(item),
            file_path: self.root_output_directory.join("index.html"),
            template: self.index_template,
        })
    }

    /// Compiles every file in `source_directory` into a post page at
    /// `{posts_output_directory}/{slug}.html`: front matter split off via
    /// `parser`, body rendered as markdown. Like the indexer, this processes
    /// every directory entry and fails the build on the first bad file.
    pub fn write_posts(
        &self,
        source_directory: &Path,
        parser: &dyn frontmatter::Parser,
    ) -> Result<()> {
        std::fs::create_dir_all(self.posts_output_directory)?;
        for result in read_dir(source_directory)? {
            let entry = result?;
            let os_file_name = entry.file_name();
            let file_name = os_file_name.to_string_lossy();
            self.write_post(&file_name, &entry.path(), parser)?;
        }
        Ok(())
    }

    fn write_post(
        &self,
        file_name: &str,
        path: &Path,
        parser: &dyn frontmatter::Parser,
    ) -> Result<()> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        let document = parser.parse(&contents)?;

        let mut body = String::new();
        markdown::to_html(&mut body, document.body);

        // Reading time is derived the same way the indexer derives it: from
        // the whole-file token count, front matter included.
        let word_count = contents.split_whitespace().count();

        let mut item: Map = Map::new();
        item.insert(
            "title".to_owned(),
            Value::String(document.frontmatter.title),
        );
        item.insert(
            "category".to_owned(),
            Value::String(document.frontmatter.category),
        );
        item.insert(
            "description".to_owned(),
            Value::String(document.frontmatter.description),
        );
        item.insert(
            "reading_time".to_owned(),
            Value::String(readtime::estimate(word_count)),
        );
        item.insert("body".to_owned(), Value::String(body));

        self.write_page(&Page {
            item: Value::Object(item),
            file_path: self
                .posts_output_directory
                .join(format!("{}.html", slug_from_file_name(file_name))),
            template: self.posts_template,
        })
    }

    /// Takes a single [`Page`], templates it, and writes it to disk. The
    /// site-wide fields (`site_title`, `site_description`, `home_page`,
    /// `static_url`, `links`) are injected into every page's value.
    fn write_page(&self, page: &Page) -> Result<()> {
        let mut value = page.to_value();
        if let Value::Object(obj) = &mut value {
            obj.insert(
                "site_title".to_owned(),
                Value::String(self.title.to_owned()),
            );
            obj.insert(
                "site_description".to_owned(),
                Value::String(self.description.to_owned()),
            );
            obj.insert(
                "home_page".to_owned(),
                Value::String(self.home_page.to_string()),
            );
            obj.insert(
                "static_url".to_owned(),
                Value::String(self.static_url.to_string()),
            );
            obj.insert(
                "links".to_owned(),
                Value::Array(self.links.iter().map(link_value).collect()),
            );
        }
        let context =
            gtmpl::Context::from(value).map_err(|e| Error::Template(e.to_string()))?;
        page.template
            .execute(&mut File::create(&page.file_path)?, &context)?;
        Ok(())
    }

    /// Converts a [`PostSummary`] into a template [`Value`] for the homepage
    /// listing: `title`, `category`, `description`, `url`, `word_count`, and
    /// the rendered `reading_time`.
    fn summary_value(&self, post: &PostSummary) -> Result<Value> {
        let mut m: Map = Map::new();
        m.insert("title".to_owned(), Value::String(post.title.clone()));
        m.insert("category".to_owned(), Value::String(post.category.clone()));
        m.insert(
            "description".to_owned(),
            Value::String(post.description.clone()),
        );
        m.insert(
            "url".to_owned(),
            Value::String(
                self.posts_url
                    .join(&format!("{}.html", post.slug))?
                    .to_string(),
            ),
        );
        m.insert("word_count".to_owned(), (post.word_count as u64).into());
        m.insert(
            "reading_time".to_owned(),
            Value::String(readtime::estimate(post.word_count)),
        );
        Ok(Value::Object(m))
    }
}

type Map = std::collections::HashMap<String, Value>;

fn link_value(link: &Link) -> Value {
    let mut m: Map = Map::new();
    m.insert("label".to_owned(), Value::String(link.label.clone()));
    m.insert("url".to_owned(), Value::String(link.url.clone()));
    Value::Object(m)
}

/// An object representing an output HTML file.
struct Page<'a> {
    /// The main item for the page.
    item: Value,

    /// The target location on disk for the output file.
    file_path: PathBuf,

    /// The template with which the page will be rendered.
    template: &'a Template,
}

impl Page<'_> {
    /// Converts a [`Page`] into a [`Value`]: a [`Value::Object`] whose `item`
    /// field is the page's main item.
    fn to_value(&self) -> Value {
        let mut m: Map = Map::new();
        m.insert("item".to_owned(), self.item.clone());
        Value::Object(m)
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error splitting a post source file's front matter.
    Frontmatter(frontmatter::Error),

    /// An error joining a post URL.
    UrlParse(url::ParseError),

    /// An error writing the output files.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Frontmatter(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Frontmatter(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<frontmatter::Error> for Error {
    /// Converts a [`frontmatter::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator when splitting post sources.
    fn from(err: frontmatter::Error) -> Error {
        Error::Frontmatter(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. This allows us to
    /// use the `?` operator for URL joining.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
