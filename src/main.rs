mod render;

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::time::Duration;
use tracing::warn;
use tube_grabber::core::controller::{Controller, ControllerConfig};
use tube_grabber::core::events::ViewEvent;
use tube_grabber::core::model::{DownloadType, SubmitOutcome};
use tube_grabber::i18n::Locale;
use tube_grabber::logging::{init_logging, init_logging_stderr};
use tube_grabber::plugins::registry::{BackendContext, FrontendCliConfig, PluginRegistry};
use url::Url;

fn common_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("locale")
            .long("locale")
            .help("UI language (en, zh)")
            .default_value("en")
            .num_args(1),
    )
    .arg(
        Arg::new("log_file")
            .long("log-file")
            .help("Write logs to this file instead of stderr")
            .num_args(1),
    )
    .arg(
        Arg::new("debounce_ms")
            .long("debounce-ms")
            .help("Quiet time after typing before resolutions are searched")
            .default_value("800")
            .num_args(1),
    )
    .arg(
        Arg::new("reset_ms")
            .long("reset-ms")
            .help("Delay after a finished download before the form resets")
            .default_value("3000")
            .num_args(1),
    )
}

fn build_cli(registry: &PluginRegistry) -> Command {
    let fetch = Command::new("fetch")
        .about("Look up a video's resolutions and download it")
        .arg(Arg::new("url").help("Video URL").required(true).num_args(1))
        .arg(
            Arg::new("type")
                .long("type")
                .help("Video or Audio")
                .default_value("video")
                .num_args(1),
        )
        .arg(
            Arg::new("resolution")
                .long("resolution")
                .help("Resolution to download, e.g. 720p (default: best offered)")
                .num_args(1),
        );

    let interactive = Command::new("interactive")
        .about("Line-driven form: type URLs, then :type, :res, :paste, :download, :show, :quit");

    Command::new("tube-grabber")
        .about("Terminal front-end for a video download server")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(registry.augment_command(common_args(fetch)))
        .subcommand(registry.augment_command(common_args(interactive)))
}

fn controller_config(m: &ArgMatches) -> anyhow::Result<ControllerConfig> {
    let mut cfg = ControllerConfig::default();
    if let Some(l) = m.get_one::<String>("locale") {
        cfg.locale = Locale::from_str(l);
    }
    if let Some(s) = m.get_one::<String>("debounce_ms") {
        cfg.debounce = Duration::from_millis(s.parse()?);
    }
    if let Some(s) = m.get_one::<String>("reset_ms") {
        cfg.reset_delay = Duration::from_millis(s.parse()?);
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let registry = PluginRegistry::with_defaults();
    let matches = build_cli(&registry).get_matches();
    let Some((name, m)) = matches.subcommand() else {
        return Ok(());
    };

    match m.get_one::<String>("log_file") {
        Some(p) => {
            if let Err(e) = init_logging(Path::new(p)) {
                init_logging_stderr();
                warn!("file logging unavailable: {:#}", e);
            }
        }
        None => init_logging_stderr(),
    }

    let mut cfg = FrontendCliConfig {
        backend_ctx: BackendContext::new(Url::parse("http://127.0.0.1:5000/")?),
        clipboard_cmd: None,
        out_dir: PathBuf::from("./downloads"),
    };
    registry.apply_matches(m, &mut cfg)?;

    let controller = Controller::new(
        registry.backend(&cfg)?,
        registry.clipboard(&cfg),
        registry.save_target(&cfg),
        controller_config(m)?,
    );

    let renderer = render::Renderer::new(controller.messages())?;
    let (stop_ui, ui_task) = render::spawn(renderer, controller.subscribe());

    let result = match name {
        "fetch" => run_fetch(&controller, m).await,
        "interactive" => run_interactive(&controller).await,
        _ => Ok(()),
    };

    let _ = stop_ui.send(());
    let _ = ui_task.await;
    result
}

async fn run_fetch(controller: &Controller, m: &ArgMatches) -> anyhow::Result<()> {
    let url = m.get_one::<String>("url").context("url is required")?.clone();
    let kind: DownloadType = m
        .get_one::<String>("type")
        .map(|s| s.parse::<DownloadType>())
        .transpose()?
        .unwrap_or_default();

    if !controller.looks_like_video_url(url.trim()) {
        anyhow::bail!("not a YouTube URL: {}", url);
    }

    let mut rx = controller.subscribe();
    controller.on_input(&url).await;
    let offered = wait_for_search(&mut rx).await?;

    controller.set_download_type(kind).await;
    if let Some(res) = m.get_one::<String>("resolution") {
        if kind == DownloadType::Video && !controller.select_resolution(res).await {
            anyhow::bail!("resolution {} not offered (available: {})", res, offered.join(", "));
        }
    }

    match controller.submit().await {
        SubmitOutcome::Completed { .. } => Ok(()),
        SubmitOutcome::Failed(msg) => anyhow::bail!(msg),
        SubmitOutcome::Rejected => anyhow::bail!(controller.messages().select_resolution),
        SubmitOutcome::Ignored => anyhow::bail!("a download is already running"),
    }
}

async fn wait_for_search(rx: &mut broadcast::Receiver<ViewEvent>) -> anyhow::Result<Vec<String>> {
    loop {
        match rx.recv().await {
            Ok(ViewEvent::ResolutionsReady { resolutions, .. }) => return Ok(resolutions),
            Ok(ViewEvent::SearchFailed { message }) => anyhow::bail!(message),
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => anyhow::bail!("controller stopped"),
        }
    }
}

/// One line typed at the interactive prompt.
#[derive(Debug, PartialEq)]
enum FormCommand<'a> {
    Quit,
    Type(&'a str),
    Resolution(&'a str),
    Paste,
    Download,
    Show,
    Unknown(&'a str),
    Input(&'a str),
}

fn parse_line(line: &str) -> FormCommand<'_> {
    let trimmed = line.trim();
    if !trimmed.starts_with(':') {
        return FormCommand::Input(line);
    }
    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((c, a)) => (c, a.trim()),
        None => (trimmed, ""),
    };
    match cmd {
        ":quit" | ":q" => FormCommand::Quit,
        ":type" => FormCommand::Type(arg),
        ":res" => FormCommand::Resolution(arg),
        ":paste" => FormCommand::Paste,
        ":download" => FormCommand::Download,
        ":show" => FormCommand::Show,
        _ => FormCommand::Unknown(cmd),
    }
}

async fn run_interactive(controller: &Controller) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            FormCommand::Quit => break,
            FormCommand::Type(arg) => match arg.parse::<DownloadType>() {
                Ok(kind) => controller.set_download_type(kind).await,
                Err(e) => eprintln!("{}", e),
            },
            FormCommand::Resolution(arg) => {
                if !controller.select_resolution(arg).await {
                    eprintln!("not offered: {}", arg);
                }
            }
            FormCommand::Paste => controller.paste_from_clipboard().await,
            FormCommand::Download => {
                let c = controller.clone();
                tokio::spawn(async move {
                    c.submit().await;
                });
            }
            FormCommand::Show => print_view(controller).await,
            FormCommand::Unknown(cmd) => {
                eprintln!("unknown command {} (try :type, :res, :paste, :download, :show, :quit)", cmd)
            }
            FormCommand::Input(text) => controller.on_input(text).await,
        }
    }
    Ok(())
}

async fn print_view(controller: &Controller) {
    let v = controller.view().await;
    println!("state:      {:?}", v.ui_state());
    println!("url:        {}", v.url);
    println!("type:       {}", v.download_type);
    if !v.resolution_group_hidden {
        println!("resolution: {} of [{}]", v.selected_resolution, v.resolutions().join(", "));
    }
    if v.video_info.visible {
        println!("title:      {}", v.video_info.title);
        println!("            {}", v.video_info.duration);
    }
    if v.progress.visible {
        println!("progress:   {} {}", v.progress.percent_label, v.progress.label);
    }
    println!("button:     {} ({})", v.download_button.label, if v.download_button.enabled { "enabled" } else { "disabled" });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_lines_are_commands() {
        assert_eq!(parse_line(":q"), FormCommand::Quit);
        assert_eq!(parse_line("  :type audio "), FormCommand::Type("audio"));
        assert_eq!(parse_line(":res 720p"), FormCommand::Resolution("720p"));
        assert_eq!(parse_line(":download"), FormCommand::Download);
    }

    #[test]
    fn mistyped_command_is_not_url_input() {
        assert_eq!(parse_line(":dl"), FormCommand::Unknown(":dl"));
        assert_eq!(parse_line(":res720p"), FormCommand::Unknown(":res720p"));
    }

    #[test]
    fn other_lines_go_to_the_url_field_untouched() {
        let line = " https://youtu.be/dQw4w9WgXcQ ";
        assert_eq!(parse_line(line), FormCommand::Input(line));
        assert_eq!(parse_line(""), FormCommand::Input(""));
    }
}
