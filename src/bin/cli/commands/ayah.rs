use anyhow::Result;

use hifdh_lib::storage::{ChapterId, VerseNumber};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub async fn run_mark(
    app: &App,
    chapter: ChapterId,
    verse: VerseNumber,
    difficulty: u8,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let state = app.engine.mark_memorized(chapter, verse, difficulty)?;
    let stats = app.engine.statistics()?;
    app.sync_progress(state).await;

    match format {
        OutputFormat::Json => print_json(chapter, verse, true)?,
        OutputFormat::Plain => {
            println!(
                "{} {}:{} memorized",
                paint("\u{2713}", Color::GREEN, use_color),
                chapter,
                verse
            );
            println!("Today: {}/{}", stats.today_progress, stats.daily_goal);
            if stats.goal_reached() {
                println!("{}", paint("Daily goal reached!", Color::BOLD, use_color));
            }
        }
    }
    Ok(())
}

pub async fn run_unmark(
    app: &App,
    chapter: ChapterId,
    verse: VerseNumber,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let was_memorized = app.engine.is_memorized(chapter, verse)?;
    let state = app.engine.unmark_memorized(chapter, verse)?;
    if was_memorized {
        app.sync_progress(state).await;
    }

    match format {
        OutputFormat::Json => print_json(chapter, verse, false)?,
        OutputFormat::Plain => {
            if was_memorized {
                println!("{}:{} unmarked", chapter, verse);
            } else {
                println!(
                    "{}",
                    paint(&format!("{}:{} was not memorized", chapter, verse), Color::GRAY, use_color)
                );
            }
        }
    }
    Ok(())
}

pub async fn run_toggle(
    app: &App,
    chapter: ChapterId,
    verse: VerseNumber,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let memorized = app.engine.toggle_memorized(chapter, verse)?;
    if let Some(state) = app.engine.load()? {
        app.sync_progress(state).await;
    }
    print_status(chapter, verse, memorized, format, use_color)
}

pub fn run_status(
    app: &App,
    chapter: ChapterId,
    verse: VerseNumber,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let memorized = app.engine.is_memorized(chapter, verse)?;
    print_status(chapter, verse, memorized, format, use_color)
}

fn print_status(
    chapter: ChapterId,
    verse: VerseNumber,
    memorized: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(chapter, verse, memorized)?,
        OutputFormat::Plain => {
            if memorized {
                println!("{} {}:{} memorized", paint("\u{2713}", Color::GREEN, use_color), chapter, verse);
            } else {
                println!("  {}:{} not memorized", chapter, verse);
            }
        }
    }
    Ok(())
}

fn print_json(chapter: ChapterId, verse: VerseNumber, memorized: bool) -> Result<()> {
    let output = serde_json::json!({
        "chapterId": chapter,
        "verseNumber": verse,
        "memorized": memorized,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
