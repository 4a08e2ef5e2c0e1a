use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};
use std::path::Path;
use tokio::process::Command;

use crate::plugins::registry::{CliPlugin, Clipboard, ClipboardError, FrontendCliConfig};

/// Reads the system clipboard by running a platform paste utility.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbpaste", &[])];

#[cfg(target_os = "windows")]
const CANDIDATES: &[(&str, &[&str])] = &[("powershell", &["-NoProfile", "-Command", "Get-Clipboard"])];

#[cfg(all(unix, not(target_os = "macos")))]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-paste", &["--no-newline"]),
    ("xclip", &["-selection", "clipboard", "-o"]),
    ("xsel", &["--clipboard", "--output"]),
];

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// First paste utility found on `PATH`, if any.
    pub fn detect() -> Option<Self> {
        let path = std::env::var_os("PATH")?;
        let dirs: Vec<_> = std::env::split_paths(&path).collect();
        CANDIDATES
            .iter()
            .find(|(bin, _)| dirs.iter().any(|d| is_program(&d.join(bin))))
            .map(|(bin, args)| Self::new(*bin, args.iter().map(|a| a.to_string()).collect()))
    }

    /// `"xclip -selection clipboard -o"` style override.
    pub fn from_command_line(cmd: &str) -> Option<Self> {
        let mut parts = cmd.split_whitespace().map(|s| s.to_string());
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

fn is_program(p: &Path) -> bool {
    p.is_file() || p.with_extension("exe").is_file()
}

#[async_trait]
impl Clipboard for CommandClipboard {
    fn name(&self) -> &'static str { "command-clipboard" }

    async fn read_text(&self) -> Result<String, ClipboardError> {
        let out = Command::new(&self.program).args(&self.args).output().await?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).to_string();
            return Err(ClipboardError::Command(format!("{} failed: {}", self.program, stderr.trim())));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

pub struct ClipboardCliPlugin;

impl ClipboardCliPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl CliPlugin for ClipboardCliPlugin {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    fn augment_command(&self, cmd: ClapCommand) -> ClapCommand {
        cmd.arg(
            Arg::new("clipboard_cmd")
                .long("clipboard-cmd")
                .help_heading("Clipboard")
                .help("Command printing the clipboard text, e.g. 'xclip -selection clipboard -o'")
                .num_args(1),
        )
    }

    fn apply_matches(&self, matches: &ArgMatches, cfg: &mut FrontendCliConfig) -> anyhow::Result<()> {
        if let Some(c) = matches.get_one::<String>("clipboard_cmd") {
            cfg.clipboard_cmd = Some(c.clone());
        }
        Ok(())
    }
}
