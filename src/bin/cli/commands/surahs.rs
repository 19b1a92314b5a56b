use anyhow::{Context, Result};

use hifdh_lib::progress::stats;

use crate::app::App;
use crate::commands::RETRY_HINT;
use crate::render::terminal::{paint, progress_bar, Color};
use crate::OutputFormat;

fn percent_label(percentage: u32) -> String {
    format!("{:>3}%", percentage)
}

pub async fn run(
    app: &App,
    search: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let chapters = app
        .content()?
        .get_chapters()
        .await
        .with_context(|| format!("Failed to load surahs. {}", RETRY_HINT))?;

    let state = app.engine.load()?.unwrap_or_default();

    // Chapters with an unknown verse count are treated as one verse long
    let rows: Vec<_> = chapters
        .iter()
        .filter(|chapter| search.map_or(true, |query| chapter.matches_query(query)))
        .map(|chapter| {
            let progress = stats::surah_progress(&state, chapter.id, chapter.verses_count.max(1));
            (chapter, progress)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = rows
                .iter()
                .map(|(chapter, progress)| {
                    serde_json::json!({
                        "chapter": chapter,
                        "progress": progress,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if rows.is_empty() {
                println!("No surahs match \"{}\"", search.unwrap_or_default());
            }
            for (chapter, progress) in &rows {
                let bar = progress_bar(progress.percentage, 10);
                let bar = if progress.percentage == 100 {
                    paint(&bar, Color::GREEN, use_color)
                } else {
                    bar
                };
                println!(
                    "{:>3}. {:<20} {:<8} {:>3} ayahs  {} {}",
                    chapter.id,
                    chapter.name_simple,
                    chapter.revelation_place,
                    chapter.verses_count,
                    bar,
                    percent_label(progress.percentage)
                );
            }
        }
    }

    Ok(())
}
