use crate::telemetry::LogFormat;
use crate::types::{PortalRequest, PropSelection};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Billing portal state assembly and skeleton maintenance
#[derive(Parser, Debug)]
#[command(name = "billing-portal")]
#[command(about = "Assemble billing portal state and purge package-testing skeletons", long_about = None)]
pub struct CliArgs {
    /// Log output format; falls back to the LOG_FORMAT environment variable
    #[arg(
        long = "log-format",
        value_name = "FORMAT",
        global = true,
        help = "Log format: 'pretty' or 'json' (default: LOG_FORMAT or pretty)"
    )]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: CommandType,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum CommandType {
    /// Print the billing portal payload for a billable as JSON
    State(StateArgs),

    /// Restore a skeleton application directory to its pristine state
    PurgeSkeleton(PurgeArgs),
}

#[derive(Args, Debug)]
pub struct StateArgs {
    /// Portal configuration file
    #[arg(long = "config", value_name = "FILE", help = "Path to the portal YAML configuration")]
    pub config: PathBuf,

    /// Fixture with the billable, viewer and provider data
    #[arg(long = "fixture", value_name = "FILE", help = "Path to the JSON fixture")]
    pub fixture: PathBuf,

    #[arg(
        long = "type",
        value_name = "TYPE",
        default_value = "user",
        help = "Configured billable type"
    )]
    pub billable_type: String,

    #[arg(long = "checkout", value_name = "VALUE", help = "Value of the checkout query parameter")]
    pub checkout: Option<String>,

    #[arg(long = "message", value_name = "TEXT", help = "Value of the message query parameter")]
    pub message: Option<String>,

    /// Keys of a partial reload
    #[arg(
        long = "only",
        value_name = "KEYS",
        value_delimiter = ',',
        help = "Comma-separated keys for a partial reload (e.g. balance,invoices)"
    )]
    pub only: Vec<String>,

    #[arg(long = "cursor", value_name = "CURSOR", help = "Paid invoices cursor")]
    pub cursor: Option<String>,

    #[arg(
        long = "path",
        value_name = "PATH",
        default_value = "/billing",
        help = "Request path used for pagination links"
    )]
    pub path: String,

    #[arg(
        long = "now",
        value_name = "RFC3339",
        value_parser = parse_timestamp,
        help = "Reference time for trials and grace periods (default: current time)"
    )]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub struct PurgeArgs {
    #[arg(
        long = "working-path",
        value_name = "DIR",
        help = "Root of the skeleton application"
    )]
    pub working_path: PathBuf,

    #[arg(
        long = "config",
        value_name = "FILE",
        help = "Harness configuration with purge lists (default: <DIR>/testbench.yaml)"
    )]
    pub config: Option<PathBuf>,
}

impl StateArgs {
    /// Build the request the payload is assembled for
    pub fn to_request(&self) -> PortalRequest {
        let mut request = PortalRequest::new(self.path.clone());
        if let Some(checkout) = &self.checkout {
            request = request.with_query("checkout", checkout.clone());
        }
        if let Some(message) = &self.message {
            request = request.with_query("message", message.clone());
        }
        if let Some(cursor) = &self.cursor {
            request = request.with_query("cursor", cursor.clone());
        }

        let keys: Vec<&str> = self
            .only
            .iter()
            .map(|key| key.trim())
            .filter(|key| !key.is_empty())
            .collect();
        if !keys.is_empty() {
            request = request.with_selection(PropSelection::partial(keys));
        }

        request
    }
}

impl PurgeArgs {
    /// Harness configuration file to read the purge lists from
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.working_path.join("testbench.yaml"))
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn state_args(args: &[&str]) -> StateArgs {
        match CliArgs::try_parse_from(args).unwrap().command {
            CommandType::State(state) => state,
            other => panic!("Expected state command, got {:?}", other),
        }
    }

    #[test]
    fn test_state_defaults() {
        let args = state_args(&[
            "program", "state", "--config", "portal.yaml", "--fixture", "customer.json",
        ]);
        assert_eq!(args.config, PathBuf::from("portal.yaml"));
        assert_eq!(args.billable_type, "user");
        assert_eq!(args.path, "/billing");
        assert!(args.only.is_empty());
        assert!(args.now.is_none());

        let request = args.to_request();
        assert_eq!(request.selection, PropSelection::Full);
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_state_request() {
        let args = state_args(&[
            "program",
            "state",
            "--config",
            "portal.yaml",
            "--fixture",
            "customer.json",
            "--type",
            "team",
            "--checkout",
            "subscription_started",
            "--only",
            "balance, invoices",
            "--cursor",
            "abc",
            "--now",
            "2024-05-15T12:00:00Z",
        ]);
        assert_eq!(args.billable_type, "team");
        assert_eq!(
            args.now,
            Some(Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap())
        );

        let request = args.to_request();
        assert_eq!(request.param("checkout"), Some("subscription_started"));
        assert_eq!(request.param("cursor"), Some("abc"));
        assert_eq!(request.param("message"), None);
        assert_eq!(
            request.selection,
            PropSelection::partial(["balance", "invoices"])
        );
    }

    #[rstest]
    #[case::default_config(&["program", "purge-skeleton", "--working-path", "skeleton"], "skeleton/testbench.yaml")]
    #[case::explicit_config(
        &["program", "purge-skeleton", "--working-path", "skeleton", "--config", "ci.yaml"],
        "ci.yaml"
    )]
    fn test_purge_config_path(#[case] args: &[&str], #[case] expected: &str) {
        match CliArgs::try_parse_from(args).unwrap().command {
            CommandType::PurgeSkeleton(purge) => {
                assert_eq!(purge.config_path(), PathBuf::from(expected))
            }
            other => panic!("Expected purge-skeleton command, got {:?}", other),
        }
    }

    #[rstest]
    #[case::unset(&["program", "purge-skeleton", "--working-path", "."], None)]
    #[case::json(&["program", "--log-format", "json", "purge-skeleton", "--working-path", "."], Some(LogFormat::Json))]
    #[case::after_subcommand(&["program", "purge-skeleton", "--working-path", ".", "--log-format", "pretty"], Some(LogFormat::Pretty))]
    fn test_log_format(#[case] args: &[&str], #[case] expected: Option<LogFormat>) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.log_format, expected);
    }

    #[rstest]
    #[case::missing_command(&["program"])]
    #[case::missing_fixture(&["program", "state", "--config", "portal.yaml"])]
    #[case::bad_timestamp(&["program", "state", "--config", "a", "--fixture", "b", "--now", "yesterday"])]
    #[case::bad_log_format(&["program", "--log-format", "xml", "purge-skeleton", "--working-path", "."])]
    fn test_invalid_arguments(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
