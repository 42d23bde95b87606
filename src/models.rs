use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Storage keys inside the data file. One JSON value per key, mirroring the
/// browser-local-storage layout the app originally shipped with.
pub const SESSION_KEY: &str = "wooden_fish_session";
pub const STATS_KEY: &str = "wooden_fish_click_stats";
pub const PROFILE_KEY: &str = "wooden_fish_user_profile";

/// Click count for one calendar day. One record per unique date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyClickRecord {
    pub date: NaiveDate,
    pub clicks: u64,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_streak_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClickStatistics {
    pub total_clicks: u64,
    pub today_clicks: u64,
    pub week_clicks: u64,
    pub month_clicks: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_click_at: Option<NaiveDateTime>,
    pub daily_history: Vec<DailyClickRecord>,
    pub streak_data: StreakData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wish {
    pub id: String,
    pub content: String,
    pub merit_cost: u64,
    pub timestamp: NaiveDateTime,
}

/// The tap-counter session record. `last_tap_time` is epoch milliseconds so
/// the combo window can be compared without date parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub merit: u64,
    pub today_taps: u64,
    pub combo: u32,
    pub last_tap_time: u64,
    pub is_auto_tapping: bool,
    pub auto_tap_speed: f64,
    pub auto_tap_duration: u64,
    pub volume: f64,
    pub selected_sound: String,
    pub selected_theme: String,
    pub achievements: Vec<String>,
    pub wishes: Vec<Wish>,
    pub zen_quote: String,
    pub meditation_time: u64,
    pub is_meditating: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            merit: 0,
            today_taps: 0,
            combo: 0,
            last_tap_time: 0,
            is_auto_tapping: false,
            auto_tap_speed: 1.0,
            auto_tap_duration: 5,
            volume: 0.7,
            selected_sound: "classic".to_string(),
            selected_theme: "default".to_string(),
            achievements: Vec::new(),
            wishes: Vec::new(),
            zen_quote: crate::session::ZEN_QUOTES[0].to_string(),
            meditation_time: 0,
            is_meditating: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPrefs {
    pub achievements: bool,
    pub daily_reminder: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            achievements: true,
            daily_reminder: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub theme: String,
    pub language: String,
    pub notifications: NotificationPrefs,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: "system".to_string(),
            language: "zh-CN".to_string(),
            notifications: NotificationPrefs::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default)]
    pub preferences: UserPreferences,
}

// Wire types.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TapResponse {
    pub merit: u64,
    pub today_taps: u64,
    pub combo: u32,
    pub total_clicks: u64,
    pub current_streak: u32,
    pub new_achievements: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    pub volume: Option<f64>,
    pub sound: Option<String>,
    pub theme: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishRequest {
    pub content: String,
    pub merit_cost: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTapRequest {
    pub enabled: bool,
    pub speed: Option<f64>,
    pub duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct MeditationRequest {
    pub action: String,
    /// Elapsed meditation seconds, reported on "stop".
    pub seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub nickname: String,
    pub avatar: Option<String>,
    pub signature: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub signature: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub read_error: Option<String>,
    pub write_error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementStatus {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
}
