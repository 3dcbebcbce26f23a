use crate::config::toml_config::{AppConfig, LoggingConfig};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "course-cart")]
#[command(about = "Browse the course catalog, build a cart and review it before checkout")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "course-cart.toml")]
    pub config: String,

    /// Override the catalog JSON path
    #[arg(long)]
    pub catalog: Option<String>,

    /// Override the ratings endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Skip the rating fetch entirely
    #[arg(long)]
    pub offline: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List courses after search, level filter and sort
    Browse(BrowseArgs),
    /// Review a cart and confirm the selection
    Checkout(CheckoutArgs),
    /// Interactive session reading commands from stdin
    Shell,
}

#[derive(Debug, Clone, Args)]
pub struct BrowseArgs {
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Level buckets: intro, regular, upper
    #[arg(long, value_delimiter = ',')]
    pub level: Vec<String>,

    /// number, quality, difficulty, workload
    #[arg(long)]
    pub sort: Option<String>,

    /// Cart as a query string, e.g. CIS-120+CIS-160
    #[arg(long, default_value = "")]
    pub cart: String,

    /// Only list courses in the cart
    #[arg(long)]
    pub cart_only: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CheckoutArgs {
    /// Cart as a query string, e.g. CIS-120+CIS-160
    #[arg(long)]
    pub cart: String,

    /// Confirm without asking about unavailable courses
    #[arg(short, long)]
    pub yes: bool,

    /// Write the confirmed selection to the export directory
    #[arg(long)]
    pub export: bool,
}

impl CliArgs {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(catalog) = &self.catalog {
            config.catalog.path = catalog.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.ratings.endpoint = endpoint.clone();
        }
        if self.verbose || self.json_logs {
            let logging = config.logging.get_or_insert(LoggingConfig {
                format: None,
                verbose: None,
            });
            if self.verbose {
                logging.verbose = Some(true);
            }
            if self.json_logs {
                logging.format = Some("json".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_checkout_command() {
        let args = CliArgs::parse_from([
            "course-cart",
            "--catalog",
            "fixtures/courses.json",
            "checkout",
            "--cart",
            "CIS-120+CIS-160",
            "--yes",
        ]);
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.catalog.path, "fixtures/courses.json");
        match args.command {
            Command::Checkout(checkout) => {
                assert_eq!(checkout.cart, "CIS-120+CIS-160");
                assert!(checkout.yes);
                assert!(!checkout.export);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_browse_levels() {
        let args = CliArgs::parse_from([
            "course-cart",
            "-v",
            "browse",
            "--level",
            "intro,upper",
            "--sort",
            "difficulty",
        ]);
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);
        assert!(config.verbose());

        let Command::Browse(browse) = args.command else {
            panic!("expected browse");
        };
        assert_eq!(browse.level, vec!["intro", "upper"]);
        assert_eq!(browse.sort.as_deref(), Some("difficulty"));
    }
}
