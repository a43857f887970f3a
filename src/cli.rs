//! Command-line interface definitions for Portal Feeds.
//!
//! Each subcommand maps onto one route. Global options control configuration
//! and where the feed JSON goes.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Portal Feeds application.
///
/// # Examples
///
/// ```sh
/// # JA.com rice category, default 20 items
/// portal_feeds jacom kome
///
/// # Nikkei search, 5 results, pretty-printed into a file
/// portal_feeds --pretty -o ./feeds/ai.json nikkei-search AI 5
///
/// # List available routes
/// portal_feeds routes
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "PORTAL_FEEDS_CONFIG")]
    pub config: Option<String>,

    /// Write JSON to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Pretty-print JSON
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print metadata for every route
    Routes,

    /// JA.com 農業協同組合新聞 category listing
    Jacom {
        /// Category path segment, e.g. kome, yasai (default: kome)
        category: Option<String>,

        /// Maximum number of items (default: 20)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// 日本経済新聞 keyword search
    NikkeiSearch {
        /// Search keyword
        keyword: Option<String>,

        /// Number of results (default: 10)
        volume: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_jacom_defaults() {
        let cli = Cli::parse_from(["portal_feeds", "jacom"]);
        assert_eq!(
            cli.command,
            Command::Jacom {
                category: None,
                limit: None
            }
        );
        assert!(!cli.pretty);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_jacom_with_limit() {
        let cli = Cli::parse_from(["portal_feeds", "jacom", "yasai", "--limit", "5"]);
        assert_eq!(
            cli.command,
            Command::Jacom {
                category: Some("yasai".to_string()),
                limit: Some(5)
            }
        );
    }

    #[test]
    fn test_cli_nikkei_search_with_global_flags() {
        let cli = Cli::parse_from([
            "portal_feeds",
            "nikkei-search",
            "がん治療",
            "3",
            "--pretty",
            "-o",
            "/tmp/feed.json",
        ]);
        assert_eq!(
            cli.command,
            Command::NikkeiSearch {
                keyword: Some("がん治療".to_string()),
                volume: Some(3)
            }
        );
        assert!(cli.pretty);
        assert_eq!(cli.output.as_deref(), Some("/tmp/feed.json"));
    }

    #[test]
    fn test_cli_nikkei_search_keyword_optional() {
        let cli = Cli::parse_from(["portal_feeds", "nikkei-search"]);
        assert_eq!(
            cli.command,
            Command::NikkeiSearch {
                keyword: None,
                volume: None
            }
        );
    }
}
