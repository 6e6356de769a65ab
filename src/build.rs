//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: indexing the posts
//! ([`crate::post`]), rendering the homepage and post pages
//! ([`crate::write`]), and copying the theme's static assets into the output
//! directory.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use gtmpl::Template;
use tracing::info;
use walkdir::WalkDir;

use crate::config::Config;
use crate::frontmatter::{self, Parser as _};
use crate::markdown;
use crate::post::{self, Error as IndexError};
use crate::write::{Error as WriteError, Writer};

/// Builds the site from a [`Config`] object. This calls into
/// [`post::list_posts`], [`Writer::write_index`], and [`Writer::write_posts`]
/// which do the heavy lifting; this function also renders the about page and
/// copies the static assets into the output directory. Runs single-threaded
/// to completion, once per build.
pub fn build_site(config: &Config) -> Result<()> {
    // collect the post listing
    let posts = post::list_posts(&config.posts_source_directory)?;
    info!("indexed {} posts", posts.len());

    // Parse the template files.
    let index_template = parse_template(config.index_template.iter())?;
    let posts_template = parse_template(config.posts_template.iter())?;

    let about_html = render_about(&config.about_page)?;

    // Blow away the old output subdirectories so stale pages from removed
    // posts don't linger. The root output directory itself is left alone in
    // case the user passes a directory that holds other things.
    rmdir(&config.posts_output_directory)?;
    rmdir(&config.static_output_directory)?;
    std::fs::create_dir_all(&config.root_output_directory)?;

    // write the homepage and the post pages
    let writer = Writer {
        index_template: &index_template,
        posts_template: &posts_template,
        title: &config.title,
        description: &config.description,
        home_page: &config.home_page,
        static_url: &config.static_url,
        posts_url: &config.posts_url,
        links: &config.links,
        root_output_directory: &config.root_output_directory,
        posts_output_directory: &config.posts_output_directory,
    };
    writer.write_index(&posts, &about_html)?;
    writer.write_posts(&config.posts_source_directory, &frontmatter::YamlParser)?;
    info!("wrote {} post pages", posts.len());

    // copy static assets
    copy_dir(
        &config.static_source_directory,
        &config.static_output_directory,
    )?;

    info!(
        "built site at `{}`",
        config.root_output_directory.display()
    );
    Ok(())
}

/// Renders the about page (markdown, optionally front-mattered) into the HTML
/// fragment embedded in the homepage.
fn render_about(path: &Path) -> Result<String> {
    use std::io::Read;
    let mut contents = String::new();
    File::open(path)
        .map_err(|e| Error::OpenAboutFile {
            path: path.to_owned(),
            err: e,
        })?
        .read_to_string(&mut contents)?;
    let document = frontmatter::YamlParser.parse(&contents)?;
    let mut html = String::new();
    markdown::to_html(&mut html, document.body);
    Ok(html)
}

/// Copies the directory tree at `src` into `dst`. A missing `src` is fine;
/// not every theme ships static assets.
fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    if !src.exists() {
        return Ok(());
    }
    for result in WalkDir::new(src) {
        let entry = result?;
        // strip_prefix shouldn't fail since `src` is always an ancestor
        let target = dst.join(entry.path().strip_prefix(src).unwrap());
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

// Loads the template file contents, concatenates them, and parses the result
// into a template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during indexing,
/// writing, cleaning output directories, parsing template files, and other
/// I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during post indexing.
    Index(IndexError),

    /// Returned for errors writing pages to disk as HTML files.
    Write(WriteError),

    /// Returned for errors splitting the about page's front matter.
    Frontmatter(frontmatter::Error),

    /// Returned for I/O problems while cleaning output directories.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening the about page.
    OpenAboutFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for I/O errors while copying static assets.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Index(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Frontmatter(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::OpenAboutFile { path, err } => {
                write!(f, "Opening about file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Index(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Frontmatter(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::OpenAboutFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<IndexError> for Error {
    /// Converts [`IndexError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: IndexError) -> Error {
        Error::Index(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<frontmatter::Error> for Error {
    /// Converts [`frontmatter::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: frontmatter::Error) -> Error {
        Error::Frontmatter(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator while copying static assets.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_build_site() -> Result<()> {
        let output = std::env::temp_dir().join(format!("stanza-build-test-{}", std::process::id()));
        let config = Config::from_directory(Path::new("./testdata/site/"), &output)
            .expect("loading test site config");

        build_site(&config)?;

        let index = std::fs::read_to_string(output.join("index.html"))?;
        // about section
        assert!(index.contains("<strong>Bradley Szoke</strong>"));
        // post listing with link, category, and reading time
        assert!(index.contains("https://example.com/blog/hello-world.html"));
        assert!(index.contains("Hello World"));
        assert!(index.contains("General"));
        assert!(index.contains("2 minutes"));

        let post = std::fs::read_to_string(output.join("blog").join("hello-world.html"))?;
        assert!(post.contains("Hello World"));
        assert!(post.contains("2 minutes"));

        // static assets copied through
        assert!(output.join("static").join("style.css").is_file());

        std::fs::remove_dir_all(&output).ok();
        Ok(())
    }
}
