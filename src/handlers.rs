use crate::achievements;
use crate::errors::AppError;
use crate::models::{
    AchievementStatus, AutoTapRequest, ClickStatistics, CreateProfileRequest, MeditationRequest,
    PROFILE_KEY, STATS_KEY, SESSION_KEY, Session, SettingsRequest, StatusResponse, TapResponse,
    UpdateProfileRequest, UserProfile, Wish, WishRequest,
};
use crate::profile;
use crate::session::{self, COMBO_WINDOW_MS, SessionEvent};
use crate::state::{AppData, AppState};
use crate::stats;
use crate::ui::render_index;
use axum::{extract::State, http::StatusCode, response::Html, Json};
use chrono::Local;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::info;
use uuid::Uuid;

pub const WISH_DEFAULT_COST: u64 = 10;
pub const WISH_MAX_CHARS: usize = 100;

const AUTO_TAP_SPEED_RANGE: (f64, f64) = (0.5, 20.0);
const AUTO_TAP_DURATION_RANGE: (u64, u64) = (1, 60);

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    Html(render_index(&data.session, &data.stats))
}

pub async fn tap(State(state): State<AppState>) -> Json<TapResponse> {
    Json(apply_tap(&state).await)
}

pub async fn get_session(State(state): State<AppState>) -> Json<Session> {
    let data = state.data.lock().await;
    Json(data.session.clone())
}

pub async fn get_stats(State(state): State<AppState>) -> Json<ClickStatistics> {
    let mut data = state.data.lock().await;
    let data = &mut *data;
    stats::refresh(&mut data.stats, Local::now().naive_local());
    data.store.set(STATS_KEY, &data.stats);
    data.store.persist().await;
    Json(data.stats.clone())
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let data = state.data.lock().await;
    Json(StatusResponse {
        read_error: data.store.read_error().map(str::to_string),
        write_error: data.store.write_error().map(str::to_string),
    })
}

pub async fn get_achievements(State(state): State<AppState>) -> Json<Vec<AchievementStatus>> {
    let data = state.data.lock().await;
    let statuses = achievements::CATALOG
        .iter()
        .map(|def| AchievementStatus {
            id: def.id,
            name: def.name,
            description: def.description,
            icon: def.icon,
            unlocked: data.session.achievements.iter().any(|id| id == def.id),
        })
        .collect();
    Json(statuses)
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<SettingsRequest>,
) -> Json<Session> {
    let mut data = state.data.lock().await;
    let data = &mut *data;
    if let Some(volume) = payload.volume {
        session::apply(&mut data.session, SessionEvent::SetVolume(volume));
    }
    if let Some(sound) = payload.sound {
        session::apply(&mut data.session, SessionEvent::SetSound(sound));
    }
    if let Some(theme) = payload.theme {
        session::apply(&mut data.session, SessionEvent::SetTheme(theme));
    }
    persist_all(data).await;
    Json(data.session.clone())
}

pub async fn make_wish(
    State(state): State<AppState>,
    Json(payload): Json<WishRequest>,
) -> Result<Json<Session>, AppError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(AppError::bad_request("wish content must not be empty"));
    }
    if content.chars().count() > WISH_MAX_CHARS {
        return Err(AppError::bad_request(format!(
            "wish content must be at most {WISH_MAX_CHARS} characters"
        )));
    }
    let cost = payload.merit_cost.unwrap_or(WISH_DEFAULT_COST);

    let mut data = state.data.lock().await;
    let data = &mut *data;
    if data.session.merit < cost {
        return Err(AppError::bad_request("not enough merit for this wish"));
    }

    let wish = Wish {
        id: Uuid::new_v4().to_string(),
        content: content.to_string(),
        merit_cost: cost,
        timestamp: Local::now().naive_local(),
    };
    session::apply(&mut data.session, SessionEvent::AddWish(wish));
    persist_all(data).await;
    Ok(Json(data.session.clone()))
}

pub async fn set_auto_tap(
    State(state): State<AppState>,
    Json(payload): Json<AutoTapRequest>,
) -> Result<Json<Session>, AppError> {
    let mut data = state.data.lock().await;
    let data = &mut *data;

    if !payload.enabled {
        data.timers.cancel_auto_tap();
        session::apply(&mut data.session, SessionEvent::SetAutoTapping(false));
        persist_all(data).await;
        return Ok(Json(data.session.clone()));
    }

    let speed = payload.speed.unwrap_or(data.session.auto_tap_speed);
    let duration = payload.duration.unwrap_or(data.session.auto_tap_duration);
    if !(AUTO_TAP_SPEED_RANGE.0..=AUTO_TAP_SPEED_RANGE.1).contains(&speed) {
        return Err(AppError::bad_request(format!(
            "auto-tap speed must be between {} and {} taps per second",
            AUTO_TAP_SPEED_RANGE.0, AUTO_TAP_SPEED_RANGE.1
        )));
    }
    if !(AUTO_TAP_DURATION_RANGE.0..=AUTO_TAP_DURATION_RANGE.1).contains(&duration) {
        return Err(AppError::bad_request(format!(
            "auto-tap duration must be between {} and {} minutes",
            AUTO_TAP_DURATION_RANGE.0, AUTO_TAP_DURATION_RANGE.1
        )));
    }

    session::apply(&mut data.session, SessionEvent::SetAutoTapSpeed(speed));
    session::apply(&mut data.session, SessionEvent::SetAutoTapDuration(duration));
    session::apply(&mut data.session, SessionEvent::SetAutoTapping(true));
    persist_all(data).await;

    let period = Duration::from_millis((1000.0 / speed) as u64);
    let deadline = Instant::now() + Duration::from_secs(duration * 60);
    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        loop {
            sleep(period).await;
            if Instant::now() >= deadline {
                break;
            }
            apply_tap(&task_state).await;
        }
        let mut data = task_state.data.lock().await;
        let data = &mut *data;
        session::apply(&mut data.session, SessionEvent::SetAutoTapping(false));
        data.timers.clear_auto_tap();
        persist_all(data).await;
        info!("auto-tap finished");
    })
    .abort_handle();
    data.timers.arm_auto_tap(handle);
    info!(speed, duration, "auto-tap armed");

    Ok(Json(data.session.clone()))
}

pub async fn set_meditation(
    State(state): State<AppState>,
    Json(payload): Json<MeditationRequest>,
) -> Result<Json<Session>, AppError> {
    if payload.action != "start" && payload.action != "stop" {
        return Err(AppError::bad_request("action must be 'start' or 'stop'"));
    }

    let mut data = state.data.lock().await;
    let data = &mut *data;
    if payload.action == "start" {
        session::apply(&mut data.session, SessionEvent::StartMeditation);
    } else {
        session::apply(&mut data.session, SessionEvent::StopMeditation);
        if let Some(seconds) = payload.seconds {
            let total = data.session.meditation_time + seconds;
            session::apply(&mut data.session, SessionEvent::UpdateMeditationTime(total));
        }
    }
    persist_all(data).await;
    Ok(Json(data.session.clone()))
}

pub async fn get_profile(State(state): State<AppState>) -> Result<Json<UserProfile>, AppError> {
    let data = state.data.lock().await;
    data.profile
        .clone()
        .map(Json)
        .ok_or_else(|| AppError::not_found("no profile exists"))
}

pub async fn create_profile(
    State(state): State<AppState>,
    Json(payload): Json<CreateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let mut data = state.data.lock().await;
    let data = &mut *data;
    let created = profile::create_profile(data.profile.as_ref(), payload, Local::now().naive_local())?;
    info!(nickname = %created.nickname, "profile created");
    data.profile = Some(created.clone());
    data.store.set(PROFILE_KEY, &created);
    data.store.persist().await;
    Ok(Json(created))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let mut data = state.data.lock().await;
    let data = &mut *data;
    let existing = data
        .profile
        .as_mut()
        .ok_or_else(|| AppError::not_found("no profile exists"))?;
    profile::update_profile(existing, payload, Local::now().naive_local())?;
    let updated = existing.clone();
    data.store.set(PROFILE_KEY, &updated);
    data.store.persist().await;
    Ok(Json(updated))
}

/// Clears the profile and the click statistics together under one lock, so
/// no caller can observe a half-reset state.
pub async fn reset_profile(State(state): State<AppState>) -> StatusCode {
    let mut data = state.data.lock().await;
    let data = &mut *data;
    data.profile = None;
    data.stats = ClickStatistics::default();
    data.store.remove(PROFILE_KEY);
    data.store.set(STATS_KEY, &data.stats);
    data.store.persist().await;
    info!("profile and statistics reset");
    StatusCode::NO_CONTENT
}

/// The full tap pipeline, shared by the tap endpoint and the auto-tap task:
/// session event, statistics, achievements, persistence, combo-reset re-arm.
pub(crate) async fn apply_tap(state: &AppState) -> TapResponse {
    let now = Local::now();
    let now_ms = now.timestamp_millis() as u64;

    let mut data = state.data.lock().await;
    let data = &mut *data;
    session::apply(&mut data.session, SessionEvent::Tap { now_ms });
    stats::record_click(&mut data.stats, now.naive_local());

    let crossed = achievements::evaluate(
        data.session.merit,
        data.session.combo,
        data.session.today_taps,
        &data.session.achievements,
    );
    for id in &crossed {
        session::apply(&mut data.session, SessionEvent::AddAchievement(id.to_string()));
    }
    if !crossed.is_empty() {
        info!(unlocked = ?crossed, "achievements unlocked");
    }

    persist_all(data).await;
    arm_combo_reset(state, data, now_ms);

    TapResponse {
        merit: data.session.merit,
        today_taps: data.session.today_taps,
        combo: data.session.combo,
        total_clicks: data.stats.total_clicks,
        current_streak: data.stats.streak_data.current_streak,
        new_achievements: crossed.iter().map(|id| id.to_string()).collect(),
    }
}

/// Debounced combo reset: each tap aborts the previous timeout and arms a
/// fresh one for the combo window.
fn arm_combo_reset(state: &AppState, data: &mut AppData, armed_for_ms: u64) {
    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        sleep(Duration::from_millis(COMBO_WINDOW_MS)).await;
        let mut data = task_state.data.lock().await;
        let data = &mut *data;
        // A later tap moved the window; this firing is stale.
        if data.session.last_tap_time != armed_for_ms || data.session.combo == 0 {
            return;
        }
        session::apply(&mut data.session, SessionEvent::ResetCombo);
        persist_all(data).await;
    })
    .abort_handle();
    data.timers.arm_combo_reset(handle);
}

/// Rotates the zen quote to the next one in the list. Driven by the
/// periodic task spawned at startup.
pub async fn rotate_zen_quote(state: &AppState) {
    let mut data = state.data.lock().await;
    let data = &mut *data;
    let next = session::next_zen_quote(&data.session.zen_quote);
    session::apply(&mut data.session, SessionEvent::SetZenQuote(next.to_string()));
    persist_all(data).await;
}

async fn persist_all(data: &mut AppData) {
    data.store.set(SESSION_KEY, &data.session);
    data.store.set(STATS_KEY, &data.stats);
    data.store.persist().await;
}
