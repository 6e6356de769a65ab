//! The library code for the `stanza` static site generator. The architecture
//! can be generally broken down into two distinct steps:
//!
//! 1. Indexing posts from source files on disk ([`crate::post`]): each file's
//!    front matter is split off ([`crate::frontmatter`]) and reduced to the
//!    display metadata the homepage listing needs, including a word count
//!    that feeds the reading-time estimate ([`crate::readtime`]).
//! 2. Converting the site into output files on disk ([`crate::write`]): the
//!    homepage (about section plus post listing) and one HTML page per post,
//!    each compiled from its own source file.
//!
//! [`crate::build`] stitches the two together, driven by a project
//! configuration ([`crate::config`]) discovered from a `stanza.yaml` file.
//! Everything runs once per build; there is no server, no cache, and no
//! state between builds.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod frontmatter;
pub mod markdown;
pub mod post;
pub mod readtime;
pub mod write;
