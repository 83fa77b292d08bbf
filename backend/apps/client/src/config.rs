use anyhow::Context;
use clap::Parser;
use std::time::Duration;
use wisdom::{ClientConfig, HandlerId};

/// Runtime configuration for the `wisdom-client` load generator.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wisdom-client",
    version,
    about = "Solve hashcash challenges and fetch quotes at a fixed rate"
)]
pub struct CliArgs {
    /// Server address.
    #[arg(long, env = "APP_SERVERADDR", default_value_t = String::from("127.0.0.1:8080"))]
    pub server_addr: String,

    /// Requests started per second.
    #[arg(long, env = "APP_RPS", default_value_t = 10)]
    pub rps: u32,

    /// Requests started in total.
    #[arg(long, env = "APP_TOTALREQUESTS", default_value_t = 100)]
    pub total_requests: usize,

    /// Give up on a challenge after this many attempts. Defaults to 16 times
    /// the expected work for the advertised difficulty, capped at 2^32.
    #[arg(long, env = "APP_MAXSOLVEATTEMPTS")]
    pub max_solve_attempts: Option<u64>,

    /// Seconds spent on one challenge before giving up.
    #[arg(long, env = "APP_SOLVETIMEOUT", default_value_t = 5)]
    pub solve_timeout: u64,

    /// Handler requested after the challenge is solved.
    #[arg(long, env = "APP_HANDLERID", default_value_t = HandlerId::QUOTE.value())]
    pub handler_id: u8,

    /// Emit logs as JSON lines.
    #[arg(long, env = "APP_LOGJSON", default_value_t = false)]
    pub log_json: bool,
}

impl TryFrom<CliArgs> for ClientConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let config = ClientConfig {
            server_addr: args.server_addr,
            rps: args.rps,
            total_requests: args.total_requests,
            handler_id: HandlerId::new(args.handler_id),
            max_solve_attempts: args.max_solve_attempts,
            solve_timeout: Duration::from_secs(args.solve_timeout),
        };
        config.validate().context("invalid client configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::try_from(CliArgs::try_parse_from(["wisdom-client"]).unwrap());
        let config = config.unwrap();
        assert_eq!(config.rps, 10);
        assert_eq!(config.total_requests, 100);
        assert_eq!(config.handler_id, HandlerId::QUOTE);
        assert_eq!(config.max_solve_attempts, None);
        assert_eq!(config.solve_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_rps_rejected() {
        let args = CliArgs::try_parse_from(["wisdom-client", "--rps", "0"]).unwrap();
        assert!(ClientConfig::try_from(args).is_err());
    }

    #[test]
    fn test_solve_timeout() {
        let args = CliArgs::try_parse_from(["wisdom-client", "--solve-timeout", "2"]).unwrap();
        assert_eq!(
            ClientConfig::try_from(args).unwrap().solve_timeout,
            Duration::from_secs(2)
        );

        let args = CliArgs::try_parse_from(["wisdom-client", "--solve-timeout", "0"]).unwrap();
        assert!(ClientConfig::try_from(args).is_err());
    }

    #[test]
    fn test_custom_handler_and_budget() {
        let args = CliArgs::try_parse_from([
            "wisdom-client",
            "--handler-id",
            "2",
            "--max-solve-attempts",
            "1000",
        ])
        .unwrap();
        let config = ClientConfig::try_from(args).unwrap();
        assert_eq!(config.handler_id, HandlerId::new(2));
        assert_eq!(config.max_solve_attempts, Some(1000));
    }
}
