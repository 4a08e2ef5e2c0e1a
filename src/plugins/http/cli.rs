use crate::plugins::registry::{CliPlugin, FrontendCliConfig};
use clap::{Arg, ArgAction, ArgMatches, Command};
use url::Url;

pub struct HttpCliPlugin;

impl HttpCliPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl CliPlugin for HttpCliPlugin {
    fn name(&self) -> &'static str {
        "http"
    }

    fn augment_command(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new("http_server")
                .long("server")
                .help_heading("HTTP")
                .help("Base URL of the download backend")
                .default_value("http://127.0.0.1:5000/")
                .num_args(1),
        )
        .arg(
            Arg::new("http_header")
                .long("header")
                .help_heading("HTTP")
                .help("Extra HTTP header (repeatable), e.g. --header 'Authorization: Bearer xxx'")
                .action(ArgAction::Append)
                .num_args(1),
        )
        .arg(
            Arg::new("http_user_agent")
                .long("user-agent")
                .help_heading("HTTP")
                .help("HTTP User-Agent")
                .default_value("tube-grabber/0.1")
                .num_args(1),
        )
        .arg(
            Arg::new("http_timeout_secs")
                .long("timeout-secs")
                .help_heading("HTTP")
                .help("Per-request timeout in seconds (default: none)")
                .num_args(1),
        )
    }

    fn apply_matches(&self, matches: &ArgMatches, cfg: &mut FrontendCliConfig) -> anyhow::Result<()> {
        if let Some(s) = matches.get_one::<String>("http_server") {
            let mut base = Url::parse(s)?;
            if !base.path().ends_with('/') {
                let path = format!("{}/", base.path());
                base.set_path(&path);
            }
            cfg.backend_ctx.base_url = base;
        }
        if let Some(ua) = matches.get_one::<String>("http_user_agent") {
            cfg.backend_ctx.user_agent = ua.clone();
        }
        if let Some(s) = matches.get_one::<String>("http_timeout_secs") {
            cfg.backend_ctx.timeout_secs = Some(s.parse()?);
        }

        if let Some(values) = matches.get_many::<String>("http_header") {
            for h in values {
                let (k, v) = h
                    .split_once(':')
                    .ok_or_else(|| anyhow::anyhow!("invalid header format: {}", h))?;
                cfg.backend_ctx.headers.insert(k.trim().to_string(), v.trim().to_string());
            }
        }

        Ok(())
    }
}
