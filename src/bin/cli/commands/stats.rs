use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, progress_bar, Color};
use crate::OutputFormat;

pub fn run_stats(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats = app.engine.statistics()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            let goal_pct = if stats.daily_goal > 0 {
                (stats.today_progress * 100 / stats.daily_goal).min(100)
            } else {
                0
            };
            println!("Total memorized  {}", paint(&stats.total_memorized.to_string(), Color::BOLD, use_color));
            println!(
                "Today            {}/{} {}",
                stats.today_progress,
                stats.daily_goal,
                progress_bar(goal_pct, 20)
            );
            let days = if stats.current_streak == 1 { "day" } else { "days" };
            println!("Current streak   {} {}", stats.current_streak, days);
        }
    }

    Ok(())
}

pub fn run_history(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let history = app.engine.weekly_history()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        OutputFormat::Plain => {
            let max = history.iter().map(|d| d.count).max().unwrap_or(0).max(1);
            for day in &history {
                let bar = "\u{2588}".repeat((day.count * 30 / max) as usize);
                println!(
                    "{} {}  {:>3} {}",
                    day.day,
                    paint(&day.date.to_string(), Color::GRAY, use_color),
                    day.count,
                    paint(&bar, Color::GREEN, use_color)
                );
            }
        }
    }

    Ok(())
}
