//! Project configuration. A site is a directory containing a `stanza.yaml`
//! project file, an `about.md` page, a `posts/` directory of front-mattered
//! markdown sources, and a `theme/` directory with templates and static
//! assets. [`Config::from_directory`] discovers the project file by walking
//! up from the starting directory, so the build can be invoked from anywhere
//! inside the project.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use url::Url;

/// A navigation link rendered in the site header (e.g. LinkedIn, resume,
/// email).
#[derive(Deserialize, Clone, Debug)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// The `stanza.yaml` project file.
#[derive(Deserialize)]
struct Project {
    /// The site title, rendered into page heads.
    pub title: String,

    /// The site-wide meta description.
    #[serde(default)]
    pub description: String,

    /// The absolute base URL of the published site. Must end in a trailing
    /// slash, otherwise [`Url::join`] treats the last path segment as a file
    /// and drops it.
    pub site_root: Url,

    /// Header navigation links.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// The `theme/theme.yaml` file. Templates are lists of fragment paths
/// (relative to the theme directory) concatenated in order before parsing.
#[derive(Deserialize)]
struct Theme {
    index_template: Vec<PathBuf>,
    posts_template: Vec<PathBuf>,
}

/// Fully-resolved build configuration: everything [`crate::build::build_site`]
/// needs, with all paths and URL spaces derived.
pub struct Config {
    pub title: String,
    pub description: String,
    pub links: Vec<Link>,
    pub home_page: Url,
    pub posts_url: Url,
    pub static_url: Url,
    pub posts_source_directory: PathBuf,
    pub about_page: PathBuf,
    pub index_template: Vec<PathBuf>,
    pub posts_template: Vec<PathBuf>,
    pub static_source_directory: PathBuf,
    pub root_output_directory: PathBuf,
    pub posts_output_directory: PathBuf,
    pub static_output_directory: PathBuf,
}

impl Config {
    /// Searches `dir` and its ancestors for a `stanza.yaml` project file and
    /// loads the configuration from the first one found.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join("stanza.yaml");
        if path.exists() {
            Config::from_project_file(&path, output_directory)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `stanza.yaml` in any parent directory"
                )),
            }
        }
    }

    /// Loads the configuration from a project file path.
    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;

        let theme_dir = project_root.join("theme");
        let theme: Theme =
            serde_yaml::from_reader(open(&theme_dir.join("theme.yaml"), "theme")?)?;

        Ok(Config {
            posts_url: project.site_root.join("blog/")?,
            static_url: project.site_root.join("static/")?,
            home_page: project.site_root,
            title: project.title,
            description: project.description,
            links: project.links,
            posts_source_directory: project_root.join("posts"),
            about_page: project_root.join("about.md"),
            index_template: theme
                .index_template
                .iter()
                .map(|relpath| theme_dir.join(relpath))
                .collect(),
            posts_template: theme
                .posts_template
                .iter()
                .map(|relpath| theme_dir.join(relpath))
                .collect(),
            static_source_directory: theme_dir.join("static"),
            root_output_directory: output_directory.to_owned(),
            posts_output_directory: output_directory.join("blog"),
            static_output_directory: output_directory.join("static"),
        })
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_directory_walks_up() -> Result<()> {
        // Starting from the posts directory should still find the project
        // file at the site root.
        let config = Config::from_directory(
            Path::new("./testdata/site/posts/"),
            Path::new("/tmp/stanza-out"),
        )?;

        assert_eq!(config.title, "Bradley Szoke - Software Engineer");
        assert_eq!(config.home_page.as_str(), "https://example.com/");
        assert_eq!(config.posts_url.as_str(), "https://example.com/blog/");
        assert_eq!(
            config.posts_source_directory,
            Path::new("./testdata/site/posts")
        );
        assert_eq!(
            config.posts_output_directory,
            Path::new("/tmp/stanza-out/blog")
        );
        assert!(!config.links.is_empty());
        Ok(())
    }

    #[test]
    fn test_from_directory_missing_project_file() {
        assert!(Config::from_directory(Path::new("/"), Path::new("/tmp/out")).is_err());
    }
}
