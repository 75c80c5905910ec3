//! CLI adapter for hugo-search
//!
//! Parses the server flags with clap and layers them over the loaded
//! configuration. The historical single-dash spellings (`-addr`,
//! `-hugoPath`, `-indexPath`, `-verbose`, `-version`) keep working
//! through [`normalize_args`].

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::core::config::Config;

/// hugo-search - full-text search endpoint for Hugo sites
///
/// Opens (or builds) a tantivy index of a Hugo site's content and
/// serves it at `POST /api/<index>/_search`.
#[derive(Parser, Debug, Default)]
#[command(name = "hugo-search")]
#[command(author = "RHOBIMD HEALTH")]
#[command(version)]
#[command(about = "Search endpoint for Hugo sites", long_about = None)]
pub struct Cli {
    /// HTTP listen address, `:PORT` binds every interface [default: :8080]
    #[arg(long, value_name = "ADDR")]
    pub addr: Option<String>,

    /// Root of the Hugo site [default: .]
    #[arg(long = "hugo-path", alias = "hugoPath", value_name = "DIR")]
    pub hugo_path: Option<PathBuf>,

    /// On-disk index directory [default: indexes/search.bleve]
    #[arg(long = "index-path", alias = "indexPath", value_name = "DIR")]
    pub index_path: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rebuild the index from the site before serving
    #[arg(long)]
    pub reindex: bool,
}

impl Cli {
    /// Parse the process arguments, accepting single-dash long flags
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Override configuration values with the flags that were given
    pub fn apply(&self, config: &mut Config) {
        if let Some(addr) = &self.addr {
            config.server.addr = addr.clone();
        }
        if let Some(path) = &self.hugo_path {
            config.site.hugo_path = path.clone();
        }
        if let Some(path) = &self.index_path {
            config.index.path = path.clone();
        }
    }

    /// Default tracing filter for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "hugo_search=debug,tower_http=debug"
        } else {
            "hugo_search=info,tower_http=info"
        }
    }
}

/// Rewrite single-dash long flags into clap's double-dash form
///
/// `-addr=:9000` becomes `--addr=:9000` and `-hugoPath site` becomes
/// `--hugoPath site`. Short flags (`-v`), values and everything after
/// a bare `--` pass through untouched. The first item is the program
/// name.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for (i, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }

        match arg.to_str() {
            Some("--") => {
                passthrough = true;
                out.push(arg);
            }
            Some(s) if is_single_dash_long(s) => out.push(format!("-{s}").into()),
            _ => out.push(arg),
        }
    }

    out
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    let name = rest.split('=').next().unwrap_or(rest);

    !rest.starts_with('-')
        && name.len() > 1
        && name.chars().all(|c| c.is_ascii_alphabetic())
}
