use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tube_grabber::core::events::ViewEvent;
use tube_grabber::core::model::MessageKind;
use tube_grabber::i18n::Messages;

/// Draws view events on the terminal.
pub struct Renderer {
    mp: MultiProgress,
    msgs: &'static Messages,
    sty_spinner: ProgressStyle,
    sty_bar: ProgressStyle,
    bar: Option<ProgressBar>,
}

impl Renderer {
    pub fn new(msgs: &'static Messages) -> anyhow::Result<Self> {
        let sty_spinner = ProgressStyle::with_template("{spinner:.green} {wide_msg}")?
            .tick_chars("|/-\\ ");
        let sty_bar = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {percent:>3}% ({bytes_per_sec}, eta {eta}) {wide_msg}",
        )?;
        Ok(Self { mp: MultiProgress::new(), msgs, sty_spinner, sty_bar, bar: None })
    }

    fn println(&self, line: String) {
        let _ = self.mp.println(line);
    }

    pub fn handle(&mut self, evt: ViewEvent) {
        match evt {
            ViewEvent::MessageShown { text, kind } => {
                let tag = match kind {
                    MessageKind::Info => self.msgs.info_tag,
                    MessageKind::Success => self.msgs.success_tag,
                    MessageKind::Error => self.msgs.error_tag,
                };
                self.println(format!("[{}] {}", tag, text));
            }
            ViewEvent::ResolutionsReady { title, duration, thumbnail, resolutions, selected } => {
                self.println(format!("  {}", title));
                self.println(format!("  {}", duration));
                if let Some(t) = thumbnail {
                    self.println(format!("  {}", t));
                }
                let list: Vec<String> = resolutions
                    .iter()
                    .map(|r| if *r == selected { format!("[{}]", r) } else { r.clone() })
                    .collect();
                self.println(format!("  {}: {}", self.msgs.resolutions_label, list.join(" ")));
            }
            ViewEvent::DownloadStarted { .. } => {
                let pb = self.mp.add(ProgressBar::new_spinner());
                pb.set_style(self.sty_spinner.clone());
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                pb.set_message(self.msgs.button_starting);
                self.bar = Some(pb);
            }
            ViewEvent::Progress { received, total, label, .. } => {
                let Some(pb) = &self.bar else { return };
                match (total.filter(|t| *t > 0), label) {
                    (Some(t), Some(l)) => {
                        if pb.length() != Some(t) {
                            pb.set_style(self.sty_bar.clone());
                            pb.set_length(t);
                        }
                        pb.set_position(received.min(t));
                        pb.set_message(l);
                    }
                    _ => pb.set_message(format!("{} {}", self.msgs.downloading_label, received)),
                }
            }
            ViewEvent::FileSaved { location, .. } => {
                if let Some(pb) = self.bar.take() {
                    pb.finish_with_message(self.msgs.download_complete_label);
                }
                self.println(format!("{} {}", self.msgs.saved_to, location));
            }
            ViewEvent::DownloadFailed { .. } => {
                if let Some(pb) = self.bar.take() {
                    pb.abandon();
                }
            }
            ViewEvent::Reset => self.println(format!("-- {} --", self.msgs.form_reset)),
            _ => {}
        }
    }
}

/// Runs the renderer until `stop` fires, then drains what is still queued.
pub fn spawn(
    mut renderer: Renderer,
    mut rx: broadcast::Receiver<ViewEvent>,
) -> (oneshot::Sender<()>, JoinHandle<()>) {
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                evt = rx.recv() => match evt {
                    Ok(e) => renderer.handle(e),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return,
                },
                _ = &mut stop_rx => break,
            }
        }
        while let Ok(e) = rx.try_recv() {
            renderer.handle(e);
        }
    });
    (stop_tx, task)
}
