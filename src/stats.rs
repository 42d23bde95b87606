use crate::models::{ClickStatistics, DailyClickRecord, StreakData};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Rolling retention window for per-day history. An entry exactly this many
/// days old is still kept.
pub const HISTORY_DAYS: i64 = 90;

/// Records one click at `now` (local wall clock): bumps today's history
/// entry, evicts stale history, refreshes the rollups, and advances the
/// streak. Any number of calls on one calendar day accumulate onto a single
/// entry.
pub fn record_click(stats: &mut ClickStatistics, now: NaiveDateTime) {
    let today = now.date();

    match stats.daily_history.iter_mut().find(|r| r.date == today) {
        Some(entry) => {
            entry.clicks += 1;
            entry.timestamp = now;
        }
        None => stats.daily_history.push(DailyClickRecord {
            date: today,
            clicks: 1,
            timestamp: now,
        }),
    }

    evict_stale(stats, today);
    recompute_windows(stats, today);

    stats.total_clicks += 1;
    stats.last_click_at = Some(now);
    advance_streak(&mut stats.streak_data, today);
}

/// Recomputes the today/week/month rollups from existing history without
/// adding a click. Run after a storage load so the rollups reflect the
/// current date even when the app was idle across a day boundary.
pub fn refresh(stats: &mut ClickStatistics, now: NaiveDateTime) {
    recompute_windows(stats, now.date());
}

fn evict_stale(stats: &mut ClickStatistics, today: NaiveDate) {
    let cutoff = today - Duration::days(HISTORY_DAYS);
    stats.daily_history.retain(|record| record.date >= cutoff);
}

fn recompute_windows(stats: &mut ClickStatistics, today: NaiveDate) {
    let week_start = week_start(today);
    let month_start = today.with_day(1).unwrap_or(today);

    stats.today_clicks = stats
        .daily_history
        .iter()
        .find(|record| record.date == today)
        .map(|record| record.clicks)
        .unwrap_or(0);
    stats.week_clicks = sum_range(stats, week_start, today);
    stats.month_clicks = sum_range(stats, month_start, today);
}

fn sum_range(stats: &ClickStatistics, start: NaiveDate, end: NaiveDate) -> u64 {
    stats
        .daily_history
        .iter()
        .filter(|record| record.date >= start && record.date <= end)
        .map(|record| record.clicks)
        .sum()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Streak rules: same day leaves the streak unchanged, the immediately
/// following day increments it, anything else restarts at 1. The longest
/// streak never decreases.
fn advance_streak(streak: &mut StreakData, today: NaiveDate) {
    match streak.last_streak_date {
        Some(last) if last == today => {}
        Some(last) if last.succ_opt() == Some(today) => {
            streak.current_streak += 1;
        }
        _ => streak.current_streak = 1,
    }
    streak.longest_streak = streak.longest_streak.max(streak.current_streak);
    streak.last_streak_date = Some(today);
}
