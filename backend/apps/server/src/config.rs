use anyhow::Context;
use clap::Parser;
use pow::Difficulty;
use std::path::PathBuf;
use std::time::Duration;
use wisdom::{DEFAULT_QUEUE_CAPACITY, ServerConfig};

/// Runtime configuration for the `wisdom-server` binary.
///
/// Every flag can also be set through its `APP_*` environment variable; a
/// `.env` file in the working directory is loaded first.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wisdom-server",
    version,
    about = "Word-of-wisdom quotes behind a hashcash proof of work"
)]
pub struct CliArgs {
    /// Leading zero bits required of SHA-256(challenge || solution).
    #[arg(long, env = "APP_DIFFICULTY", default_value_t = Difficulty::DEFAULT.bits())]
    pub difficulty: u8,

    /// Address to listen on.
    #[arg(long, env = "APP_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub addr: String,

    /// Number of connections served concurrently.
    #[arg(long, env = "APP_WORKERCOUNT", default_value_t = 10)]
    pub worker_count: usize,

    /// Accepted connections buffered ahead of the workers. Once full, the
    /// acceptor stops accepting until a worker frees a slot.
    #[arg(long, env = "APP_QUEUECAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Seconds to wait for in-flight connections on shutdown.
    #[arg(long, env = "APP_SHUTDOWNTIMEOUT", default_value_t = 5)]
    pub shutdown_timeout: u64,

    /// Seconds a client has to return its solution.
    #[arg(long, env = "APP_POWTIMEOUT", default_value_t = 5)]
    pub pow_timeout: u64,

    /// JSON array of `{"text", "author"}` objects replacing the built-in quotes.
    #[arg(long, env = "APP_QUOTESFILE")]
    pub quotes_file: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, env = "APP_LOGJSON", default_value_t = false)]
    pub log_json: bool,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let config = ServerConfig {
            difficulty: Difficulty::new(args.difficulty),
            addr: args.addr,
            worker_count: args.worker_count,
            queue_capacity: args.queue_capacity,
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout),
            pow_timeout: Duration::from_secs(args.pow_timeout),
        };
        config.validate().context("invalid server configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = CliArgs::try_parse_from([
            "wisdom-server",
            "--difficulty",
            "8",
            "--addr",
            "127.0.0.1:9000",
            "--worker-count",
            "3",
            "--pow-timeout",
            "2",
        ])
        .unwrap();

        let config = ServerConfig::try_from(args).unwrap();
        assert_eq!(config.difficulty.bits(), 8);
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.worker_count, 3);
        assert_eq!(config.pow_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let args = CliArgs::try_parse_from(["wisdom-server", "--worker-count", "0"]).unwrap();
        assert!(ServerConfig::try_from(args).is_err());
    }

    #[test]
    fn test_difficulty_must_fit_in_a_byte() {
        assert!(CliArgs::try_parse_from(["wisdom-server", "--difficulty", "256"]).is_err());
    }
}
