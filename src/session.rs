use crate::models::{Session, Wish};

/// Two taps closer together than this count as a combo; the combo also
/// resets this long after the last tap.
pub const COMBO_WINDOW_MS: u64 = 2000;

/// How often the rotating zen quote advances.
pub const ZEN_QUOTE_ROTATION_SECS: u64 = 30;

pub const ZEN_QUOTES: &[&str] = &[
    "心静自然凉，功德自然来",
    "一念善心起，功德遍十方",
    "敲击木鱼声，净化心灵尘",
    "功德如甘露，滋润众生心",
    "静心敲木鱼，烦恼自消散",
    "每一声敲击，都是慈悲心",
    "木鱼声声响，智慧日日增",
    "功德积如山，慈悲深如海",
    "敲击即修行，声声皆佛音",
    "心诚则灵验，功德自无量",
];

/// Everything that can mutate the session record. Handlers and timer tasks
/// build events and apply them against the latest state under the lock;
/// nothing mutates the session directly.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Tap { now_ms: u64 },
    ResetCombo,
    SetAutoTapping(bool),
    SetAutoTapSpeed(f64),
    SetAutoTapDuration(u64),
    SetVolume(f64),
    SetSound(String),
    SetTheme(String),
    AddAchievement(String),
    AddWish(Wish),
    SetZenQuote(String),
    StartMeditation,
    StopMeditation,
    UpdateMeditationTime(u64),
}

pub fn apply(session: &mut Session, event: SessionEvent) {
    match event {
        SessionEvent::Tap { now_ms } => {
            let in_window = now_ms.saturating_sub(session.last_tap_time) < COMBO_WINDOW_MS;
            session.merit += 1;
            session.today_taps += 1;
            session.combo = if in_window { session.combo + 1 } else { 1 };
            session.last_tap_time = now_ms;
        }
        SessionEvent::ResetCombo => session.combo = 0,
        SessionEvent::SetAutoTapping(enabled) => session.is_auto_tapping = enabled,
        SessionEvent::SetAutoTapSpeed(speed) => session.auto_tap_speed = speed,
        SessionEvent::SetAutoTapDuration(minutes) => session.auto_tap_duration = minutes,
        SessionEvent::SetVolume(volume) => session.volume = volume.clamp(0.0, 1.0),
        SessionEvent::SetSound(sound) => session.selected_sound = sound,
        SessionEvent::SetTheme(theme) => session.selected_theme = theme,
        SessionEvent::AddAchievement(id) => {
            if !session.achievements.contains(&id) {
                session.achievements.push(id);
            }
        }
        SessionEvent::AddWish(wish) => {
            // Affordability is re-checked against the state the event lands
            // on; an unaffordable wish is a no-op.
            if session.merit >= wish.merit_cost {
                session.merit -= wish.merit_cost;
                session.wishes.push(wish);
            }
        }
        SessionEvent::SetZenQuote(quote) => session.zen_quote = quote,
        SessionEvent::StartMeditation => session.is_meditating = true,
        SessionEvent::StopMeditation => session.is_meditating = false,
        SessionEvent::UpdateMeditationTime(seconds) => session.meditation_time = seconds,
    }
}

/// The quote after `current` in rotation order, wrapping at the end. An
/// unknown current quote restarts the rotation.
pub fn next_zen_quote(current: &str) -> &'static str {
    let next = ZEN_QUOTES
        .iter()
        .position(|quote| *quote == current)
        .map(|index| (index + 1) % ZEN_QUOTES.len())
        .unwrap_or(0);
    ZEN_QUOTES[next]
}
