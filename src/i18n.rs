/// Localized strings for the form and the terminal renderer.
/// Locale can be selected via the `--locale` CLI flag (e.g. `--locale zh`).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn from_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "zh_cn" | "zh-hans" | "zh-tw" | "zh_tw" => Self::Zh,
            _ => Self::En,
        }
    }
}

pub struct Messages {
    pub searching: &'static str,
    /// `{count}` is replaced with the number of resolutions.
    pub found_resolutions: &'static str,
    pub select_resolution: &'static str,
    pub error_prefix: &'static str,
    pub download_success: &'static str,
    pub download_complete_label: &'static str,
    pub downloading_label: &'static str,
    pub downloaded_prefix: &'static str,
    pub duration_prefix: &'static str,
    pub button_download: &'static str,
    pub button_starting: &'static str,
    pub option_searching: &'static str,
    pub option_select: &'static str,
    pub option_error: &'static str,
    pub pasted: &'static str,
    pub clipboard_empty: &'static str,
    pub clipboard_unavailable: &'static str,
    pub clipboard_failed: &'static str,
    pub form_reset: &'static str,
    pub saved_to: &'static str,
    pub resolutions_label: &'static str,
    pub info_tag: &'static str,
    pub success_tag: &'static str,
    pub error_tag: &'static str,
}

pub static EN: Messages = Messages {
    searching: "🔍 Searching for available resolutions...",
    found_resolutions: "✅ Found {count} resolutions",
    select_resolution: "Please select a resolution",
    error_prefix: "❌ ",
    download_success: "✅ Video downloaded successfully!",
    download_complete_label: "✅ Download complete! Check your downloads folder",
    downloading_label: "Downloading...",
    downloaded_prefix: "Downloaded",
    duration_prefix: "Duration: ",
    button_download: "Download",
    button_starting: "Starting...",
    option_searching: "Searching...",
    option_select: "Select Resolution",
    option_error: "Error loading resolutions",
    pasted: "📋 Pasted from clipboard",
    clipboard_empty: "Clipboard is empty",
    clipboard_unavailable: "Clipboard API not available. Use Ctrl+V to paste.",
    clipboard_failed: "Unable to read clipboard: ",
    form_reset: "form reset",
    saved_to: "saved to",
    resolutions_label: "resolutions",
    info_tag: "INFO",
    success_tag: "OK",
    error_tag: "ERR",
};

pub static ZH: Messages = Messages {
    searching: "🔍 正在查找可用分辨率...",
    found_resolutions: "✅ 找到 {count} 个分辨率",
    select_resolution: "请选择分辨率",
    error_prefix: "❌ ",
    download_success: "✅ 视频下载成功！",
    download_complete_label: "✅ 下载完成！请查看下载目录",
    downloading_label: "下载中...",
    downloaded_prefix: "已下载",
    duration_prefix: "时长: ",
    button_download: "下载",
    button_starting: "正在开始...",
    option_searching: "查找中...",
    option_select: "选择分辨率",
    option_error: "分辨率加载失败",
    pasted: "📋 已从剪贴板粘贴",
    clipboard_empty: "剪贴板为空",
    clipboard_unavailable: "剪贴板不可用，请使用 Ctrl+V 粘贴。",
    clipboard_failed: "无法读取剪贴板: ",
    form_reset: "表单已重置",
    saved_to: "已保存到",
    resolutions_label: "分辨率",
    info_tag: "信息",
    success_tag: "成功",
    error_tag: "错误",
};

pub fn get_messages(locale: Locale) -> &'static Messages {
    match locale {
        Locale::En => &EN,
        Locale::Zh => &ZH,
    }
}

pub fn found_resolutions(msgs: &Messages, count: usize) -> String {
    msgs.found_resolutions.replace("{count}", &count.to_string())
}
