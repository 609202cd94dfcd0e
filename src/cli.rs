//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use ghproxy::config::ProxyConfig;

#[derive(Debug, Parser)]
#[command(name = "ghproxy")]
#[command(about = "ghproxy is a reverse proxy for github resources", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the proxy server
    Run(RunArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Host to listen on
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Redirect blob URLs to the jsDelivr mirror
    #[arg(short = 'J', long)]
    pub proxy_jsdelivr: bool,
}

impl RunArgs {
    /// Flags given on the command line win over the config file.
    pub fn apply(&self, config: &mut ProxyConfig) {
        if let Some(host) = &self.host {
            config.listener.host = host.clone();
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if self.proxy_jsdelivr {
            config.proxy.jsdelivr = true;
        }
    }
}

pub fn print_version() {
    println!("ghproxy");
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!("ghproxy: {}", env!("CARGO_PKG_VERSION"));
    println!("gitCommit: {}", option_env!("GHPROXY_GIT_COMMIT").unwrap_or("unknown"));
    println!("buildTime: {}", option_env!("GHPROXY_BUILD_TIME").unwrap_or("unknown"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_flags() {
        let cli = Cli::parse_from(["ghproxy", "-v", "run", "-H", "127.0.0.1", "-P", "9000", "-J"]);
        assert!(cli.verbose);
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run subcommand");
        };

        let mut config = ProxyConfig::default();
        args.apply(&mut config);
        assert_eq!(config.listener.bind_address(), "127.0.0.1:9000");
        assert!(config.proxy.jsdelivr);
    }

    #[test]
    fn test_flags_do_not_clobber_config() {
        let cli = Cli::parse_from(["ghproxy", "run"]);
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run subcommand");
        };

        let mut config = ProxyConfig::default();
        config.listener.port = 7000;
        config.proxy.jsdelivr = true;
        args.apply(&mut config);
        assert_eq!(config.listener.port, 7000);
        assert!(config.proxy.jsdelivr);
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["ghproxy", "run", "--config", "/etc/ghproxy.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/ghproxy.toml")));
    }
}
