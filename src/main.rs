use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{App, Arg};

use stanza::build::build_site;
use stanza::config::Config;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let matches = App::new("stanza")
        .version(clap::crate_version!())
        .about("Builds my personal portfolio and blog into a static site")
        .arg(
            Arg::with_name("OUTPUT")
                .help("The directory in which the site is written")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("project")
                .short("p")
                .long("project")
                .takes_value(true)
                .help("The project directory (defaults to the current directory)"),
        )
        .get_matches();

    let output = PathBuf::from(matches.value_of("OUTPUT").unwrap());
    let project = match matches.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    let config = Config::from_directory(&project, &output)?;
    build_site(&config).map_err(|e| anyhow!("building site: {}", e))
}
