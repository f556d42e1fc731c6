//! Display utilities for the alarm ringing CLI.
//!
//! This module provides formatted output for:
//! - Screen changes during a simulated session
//! - The final session report
//! - The effective configuration
//! - Error messages

use std::path::Path;

use crate::alarm::AlarmStatus;
use crate::config::RingingConfig;
use crate::playback::PlaybackStatus;
use crate::screen::{Presentation, Screen};
use crate::types::{MimicKind, ScreenKind, SessionState};

use super::simulate::SimulationReport;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows a screen the session presented.
    pub fn show_screen(screen: &Screen, presentation: Presentation) {
        let marker = match presentation {
            Presentation::Replace => ">",
            Presentation::Push => "+",
        };
        println!("{} {}", marker, Self::screen_label(screen.kind()));

        match screen {
            Screen::MimicGame { mimic, .. } => {
                println!("  ミミック: {}", Self::mimic_label(*mimic));
            }
            Screen::Share { shareable } => {
                println!("  共有内容: {}", shareable);
            }
            Screen::AlarmSettings { enabled_mimics, .. }
            | Screen::MimicSettings { enabled_mimics } => {
                println!("  有効なミミック: {}", Self::format_mimics(enabled_mimics));
            }
            Screen::Ringing { .. } | Screen::Snooze | Screen::NoMimic { .. } => {}
        }
    }

    /// Shows that the top screen was removed.
    pub fn show_pop() {
        println!("< 前の画面に戻りました");
    }

    /// Shows an in-place update of the alarm settings screen.
    pub fn show_settings_update(enabled_mimics: &[MimicKind]) {
        println!("* アラーム設定を更新しました");
        println!("  有効なミミック: {}", Self::format_mimics(enabled_mimics));
    }

    /// Shows a back press handed to the screen itself.
    pub fn show_forward_back(screen: ScreenKind) {
        println!("< 戻る操作を{}に渡しました", Self::screen_label(screen));
    }

    /// Shows that all screens were closed.
    pub fn show_close() {
        println!("[] 画面を閉じました");
    }

    /// Shows the outcome of a simulated session.
    pub fn show_report(report: &SimulationReport) {
        let summary = &report.summary;

        println!();
        println!("鳴動セッション 結果");
        println!("─────────────────────────────");
        println!("アラーム: {}", summary.alarm_id);
        println!("状態: {}", Self::state_label(summary.state));
        println!(
            "タイムアウト: {}",
            if summary.timed_out { "あり" } else { "なし" }
        );
        if let Some(status) = report.alarm_status {
            println!("アラームの状態: {}", Self::alarm_status_label(status));
        }
        println!("再生: {}", Self::playback_label(report.playback.status));

        let history: Vec<&str> = summary
            .history
            .iter()
            .map(|state| Self::state_label(*state))
            .collect();
        println!("遷移: {}", history.join(" -> "));

        if summary.dropped_playback_commands > 0 {
            println!(
                "未接続で破棄された再生指示: {}",
                summary.dropped_playback_commands
            );
        }
        if !summary.state.is_terminal() {
            println!("注意: スクリプトの終了時点でセッションは完了していません");
        }
    }

    /// Shows the effective configuration.
    pub fn show_config(config: &RingingConfig, path: Option<&Path>) {
        println!("アラーム鳴動 設定");
        println!("─────────────────────────────");
        match path {
            Some(path) => println!("設定ファイル: {}", path.display()),
            None => println!("設定ファイル: (なし)"),
        }
        let duration = config.ring_duration();
        if duration.is_capped() {
            println!("鳴動時間: {}", Self::format_duration(duration.as_millis()));
        } else {
            println!("鳴動時間: 無制限");
        }
        println!(
            "既定のミミック: {}",
            Self::format_mimics(&config.default_mimics)
        );
        println!("再生サービスの接続遅延: {}ms", config.playback_bind_delay_ms);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Shows a hint for resolving an error.
    pub fn show_suggestion(suggestion: &str) {
        eprintln!("  ヒント: {}", suggestion);
    }

    // ------------------------------------------------------------------------
    // Labels
    // ------------------------------------------------------------------------

    fn screen_label(kind: ScreenKind) -> &'static str {
        match kind {
            ScreenKind::Ringing => "鳴動画面",
            ScreenKind::MimicGame => "ミミックゲーム",
            ScreenKind::Share => "シェア画面",
            ScreenKind::Snooze => "スヌーズ画面",
            ScreenKind::NoMimic => "ミミック未設定",
            ScreenKind::AlarmSettings => "アラーム設定",
            ScreenKind::MimicSettings => "ミミック設定",
        }
    }

    fn state_label(state: SessionState) -> &'static str {
        match state {
            SessionState::Ringing => "鳴動中",
            SessionState::PlayingMimic => "ミミック中",
            SessionState::Sharing => "シェア中",
            SessionState::Snoozing => "スヌーズ",
            SessionState::NoMimicAvailable => "ミミックなし",
            SessionState::EditingAlarmSettings => "アラーム設定中",
            SessionState::EditingMimicSettings => "ミミック設定中",
            SessionState::Finished => "終了",
        }
    }

    fn mimic_label(mimic: MimicKind) -> &'static str {
        match mimic {
            MimicKind::ColorCapture => "色探し",
            MimicKind::ExpressionMimic => "表情まね",
            MimicKind::TongueTwister => "早口言葉",
        }
    }

    fn alarm_status_label(status: AlarmStatus) -> &'static str {
        match status {
            AlarmStatus::Pending => "未処理",
            AlarmStatus::Dismissed => "停止済み",
            AlarmStatus::Snoozed => "スヌーズ済み",
        }
    }

    fn playback_label(status: PlaybackStatus) -> &'static str {
        match status {
            PlaybackStatus::Ringing => "鳴動中",
            PlaybackStatus::Silenced => "消音中",
            PlaybackStatus::Completed => "完了",
        }
    }

    fn format_mimics(mimics: &[MimicKind]) -> String {
        if mimics.is_empty() {
            return "(なし)".to_string();
        }
        mimics
            .iter()
            .map(|mimic| Self::mimic_label(*mimic))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Formats milliseconds as `H:MM:SS`.
    fn format_duration(millis: i64) -> String {
        let total_seconds = millis / 1000;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod format_tests {
        use super::*;

        #[test]
        fn test_format_duration() {
            assert_eq!(Display::format_duration(0), "0:00:00");
            assert_eq!(Display::format_duration(5_000), "0:00:05");
            assert_eq!(Display::format_duration(7_200_000), "2:00:00");
            assert_eq!(Display::format_duration(3_661_000), "1:01:01");
        }

        #[test]
        fn test_format_mimics() {
            assert_eq!(Display::format_mimics(&[]), "(なし)");
            assert_eq!(
                Display::format_mimics(&[MimicKind::ColorCapture, MimicKind::TongueTwister]),
                "色探し, 早口言葉"
            );
        }
    }

    mod label_tests {
        use super::*;

        #[test]
        fn test_every_state_has_label() {
            for state in [
                SessionState::Ringing,
                SessionState::PlayingMimic,
                SessionState::Sharing,
                SessionState::Snoozing,
                SessionState::NoMimicAvailable,
                SessionState::EditingAlarmSettings,
                SessionState::EditingMimicSettings,
                SessionState::Finished,
            ] {
                assert!(!Display::state_label(state).is_empty());
            }
        }

        #[test]
        fn test_known_labels() {
            assert_eq!(Display::screen_label(ScreenKind::Ringing), "鳴動画面");
            assert_eq!(Display::state_label(SessionState::Finished), "終了");
        }
    }

    mod show_tests {
        use super::*;
        use crate::types::AlarmId;

        #[test]
        fn test_show_functions_do_not_panic() {
            let id = AlarmId::new();
            Display::show_screen(&Screen::Ringing { alarm_id: id }, Presentation::Replace);
            Display::show_screen(
                &Screen::MimicSettings {
                    enabled_mimics: vec![MimicKind::ExpressionMimic],
                },
                Presentation::Push,
            );
            Display::show_pop();
            Display::show_settings_update(&[]);
            Display::show_forward_back(ScreenKind::AlarmSettings);
            Display::show_close();
            Display::show_config(&RingingConfig::default(), None);
            Display::show_error("test");
            Display::show_suggestion("hint");
        }
    }
}
