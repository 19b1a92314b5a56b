//! Folds over the state document

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use super::models::{DayHistory, Statistics, SurahProgress};
use crate::storage::{AppState, ChapterId};

/// Count memorized ayahs across all chapters
pub fn total_memorized(state: &AppState) -> u32 {
    state
        .ayah_progress
        .values()
        .flat_map(|chapter| chapter.values())
        .filter(|record| record.memorized)
        .count() as u32
}

/// Calculate the current streak.
///
/// Walks progress dates from most recent to oldest with a cursor starting at
/// `today`. A date extends the streak when it lies 0 or 1 days before the
/// cursor and has a positive count; the cursor then moves to it. The walk
/// stops at the first date that fails.
pub fn current_streak(progress: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = today;

    for (&date, &count) in progress.iter().rev() {
        let gap = (cursor - date).num_days();
        if (gap == 0 || gap == 1) && count > 0 {
            streak += 1;
            cursor = date;
        } else {
            break;
        }
    }

    streak
}

/// Compute statistics as of `today`
pub fn statistics(state: &AppState, today: NaiveDate) -> Statistics {
    Statistics {
        total_memorized: total_memorized(state),
        today_progress: state.progress.get(&today).copied().unwrap_or(0),
        current_streak: current_streak(&state.progress, today),
        daily_goal: state.settings.daily_goal,
    }
}

/// Trailing seven days ending at `today`, oldest first
pub fn weekly_history(progress: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> Vec<DayHistory> {
    (0..7)
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(days_back);
            DayHistory {
                day: date.format("%a").to_string(),
                date,
                count: progress.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Memorized share of a chapter with `total` verses
pub fn surah_progress(state: &AppState, chapter_id: ChapterId, total: u32) -> SurahProgress {
    let memorized = state
        .ayah_progress
        .get(&chapter_id)
        .map(|chapter| chapter.values().filter(|r| r.memorized).count() as u32)
        .unwrap_or(0);

    let percentage = if total > 0 {
        ((memorized as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };

    SurahProgress {
        memorized,
        total,
        percentage,
    }
}
