//! The form's visible state. Everything the page would keep in the DOM lives
//! here; the controller is the only writer.

use crate::core::model::{DownloadPhase, DownloadType, MessageKind, SearchPhase, UiState};
use crate::i18n::Messages;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn placeholder(label: &str) -> Self {
        Self { value: String::new(), label: label.to_string() }
    }

    pub fn resolution(res: &str) -> Self {
        Self { value: res.to_string(), label: res.to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoInfoPanel {
    pub visible: bool,
    pub loading: bool,
    pub content_visible: bool,
    pub title: String,
    pub duration: String,
    pub thumbnail: Option<String>,
    pub thumbnail_visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub kind: MessageKind,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressPanel {
    pub visible: bool,
    pub fill_percent: u32,
    pub percent_label: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub enabled: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub url: String,
    pub download_type: DownloadType,
    pub resolution_options: Vec<SelectOption>,
    pub selected_resolution: String,
    pub resolution_group_hidden: bool,
    pub video_info: VideoInfoPanel,
    pub download_options_shown: bool,
    pub banner: Banner,
    pub progress: ProgressPanel,
    pub download_button: ButtonState,
    pub search: SearchPhase,
    pub download: DownloadPhase,
}

impl ViewState {
    /// State right after the page loads.
    pub fn initial(msgs: &Messages) -> Self {
        Self {
            url: String::new(),
            download_type: DownloadType::Video,
            resolution_options: vec![SelectOption::placeholder(msgs.option_select)],
            selected_resolution: String::new(),
            resolution_group_hidden: false,
            video_info: VideoInfoPanel::default(),
            download_options_shown: false,
            banner: Banner::default(),
            progress: ProgressPanel {
                percent_label: "0%".to_string(),
                ..ProgressPanel::default()
            },
            download_button: ButtonState { enabled: true, label: msgs.button_download.to_string() },
            search: SearchPhase::Idle,
            download: DownloadPhase::Idle,
        }
    }

    pub fn ui_state(&self) -> UiState {
        UiState::from_phases(self.search, self.download)
    }

    pub fn resolutions(&self) -> Vec<String> {
        self.resolution_options
            .iter()
            .filter(|o| !o.value.is_empty())
            .map(|o| o.value.clone())
            .collect()
    }

    /// Mirrors assigning a `<select>` value: unknown values clear the selection.
    pub fn select_resolution(&mut self, value: &str) -> bool {
        if !value.is_empty() && self.resolution_options.iter().any(|o| o.value == value) {
            self.selected_resolution = value.to_string();
            true
        } else {
            self.selected_resolution.clear();
            false
        }
    }

    pub fn set_progress(&mut self, percent: u32) {
        self.progress.fill_percent = percent;
        self.progress.percent_label = format!("{}%", percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::EN;

    #[test]
    fn initial_state_is_idle_with_enabled_button() {
        let v = ViewState::initial(&EN);
        assert_eq!(v.ui_state(), UiState::Idle);
        assert!(v.download_button.enabled);
        assert!(!v.progress.visible);
        assert!(!v.video_info.visible);
        assert!(v.resolutions().is_empty());
    }

    #[test]
    fn selecting_unknown_value_clears_selection() {
        let mut v = ViewState::initial(&EN);
        v.resolution_options.push(SelectOption::resolution("720p"));
        assert!(v.select_resolution("720p"));
        assert_eq!(v.selected_resolution, "720p");
        assert!(!v.select_resolution("4320p"));
        assert_eq!(v.selected_resolution, "");
    }
}
