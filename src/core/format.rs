//! Text shown in the video-info and progress panels.

use crate::core::model::TransferProgress;

const MIB: f64 = 1024.0 * 1024.0;

/// `"{h}h {m}m {s}s"` when there is at least one full hour, else `"{m}m {s}s"`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        return format!("{}h {}m {}s", hours, minutes, secs);
    }
    format!("{}m {}s", minutes, secs)
}

pub fn format_mb(bytes: u64) -> String {
    format!("{:.1}MB", bytes as f64 / MIB)
}

/// `"{prefix}: X.XMB / Y.YMB"`, only when the total size is known.
pub fn progress_label(prefix: &str, progress: &TransferProgress) -> Option<String> {
    let total = progress.total.filter(|t| *t > 0)?;
    Some(format!(
        "{}: {} / {}",
        prefix,
        format_mb(progress.received),
        format_mb(total)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_without_hours() {
        assert_eq!(format_duration(0), "0m 0s");
        assert_eq!(format_duration(59), "0m 59s");
        assert_eq!(format_duration(212), "3m 32s");
        assert_eq!(format_duration(3599), "59m 59s");
    }

    #[test]
    fn duration_with_hours() {
        assert_eq!(format_duration(3600), "1h 0m 0s");
        assert_eq!(format_duration(3723), "1h 2m 3s");
        assert_eq!(format_duration(90061), "25h 1m 1s");
    }

    #[test]
    fn duration_components_add_back_up() {
        for d in (0..200_000u64).step_by(37) {
            let text = format_duration(d);
            let mut total = 0u64;
            for part in text.split(' ') {
                let (n, unit) = part.split_at(part.len() - 1);
                let n: u64 = n.parse().unwrap();
                total += match unit {
                    "h" => n * 3600,
                    "m" => n * 60,
                    "s" => n,
                    _ => panic!("unexpected unit in {text}"),
                };
            }
            assert_eq!(total, d, "{text}");
            assert_eq!(text.contains('h'), d >= 3600, "{text}");
        }
    }

    #[test]
    fn progress_label_uses_mebibytes() {
        let mut p = TransferProgress::new(Some(1000));
        p.record(250);
        assert_eq!(p.percent(), Some(25));
        assert_eq!(progress_label("Downloaded", &p).as_deref(), Some("Downloaded: 0.0MB / 0.0MB"));
        p.record(750);
        assert_eq!(p.percent(), Some(100));
        assert_eq!(progress_label("Downloaded", &p).as_deref(), Some("Downloaded: 0.0MB / 0.0MB"));

        let mut p = TransferProgress::new(Some(3 * 1024 * 1024));
        p.record(1024 * 1024 + 512 * 1024);
        assert_eq!(p.percent(), Some(50));
        assert_eq!(progress_label("Downloaded", &p).as_deref(), Some("Downloaded: 1.5MB / 3.0MB"));
    }

    #[test]
    fn progress_label_absent_without_length() {
        let mut p = TransferProgress::new(None);
        p.record(4096);
        assert_eq!(progress_label("Downloaded", &p), None);
    }
}
