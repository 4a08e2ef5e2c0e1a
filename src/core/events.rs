use crate::core::model::{DownloadType, MessageKind};

/// One visible change of the form, in the order it was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    InputChanged { value: String },
    MessageShown { text: String, kind: MessageKind },
    MessageHidden,
    SearchScheduled { url: String },
    SearchStarted { url: String },
    ResolutionsReady {
        title: String,
        duration: String,
        thumbnail: Option<String>,
        resolutions: Vec<String>,
        selected: String,
    },
    StaleResultDiscarded { url: String },
    SearchFailed { message: String },
    VideoInfoHidden,
    DownloadOptionsShown,
    DownloadOptionsHidden,
    DownloadTypeChanged { kind: DownloadType, resolution_group_hidden: bool },
    ResolutionSelected { value: String },
    DownloadStarted { url: String, resolution: String, kind: DownloadType },
    Progress {
        received: u64,
        total: Option<u64>,
        percent: Option<u32>,
        label: Option<String>,
    },
    FileSaved { filename: String, location: String, bytes: u64 },
    DownloadFailed { message: String },
    ProgressHidden,
    Reset,
}
