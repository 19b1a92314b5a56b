use anyhow::{Context, Result};

use hifdh_lib::content::Verse;
use hifdh_lib::storage::{ChapterId, ScriptType};

use crate::app::App;
use crate::commands::RETRY_HINT;
use crate::render::terminal::{paint, progress_bar, translation_text, wrap_lines, Color};
use crate::OutputFormat;

pub async fn run(
    app: &App,
    chapter: ChapterId,
    reciter: Option<u32>,
    script: Option<ScriptType>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let settings = app.engine.settings()?;
    let reciter = reciter.or(settings.selected_reciter);
    let script = script.unwrap_or(settings.script_type);

    let surah = app
        .content()?
        .get_surah(chapter, reciter, script)
        .await
        .with_context(|| format!("Failed to load surah {}. {}", chapter, RETRY_HINT))?;

    let state = app.engine.load()?.unwrap_or_default();
    let is_memorized = |verse: &Verse| {
        state
            .record(chapter, verse.number)
            .map(|r| r.memorized)
            .unwrap_or(false)
    };
    let progress = app
        .engine
        .surah_progress(chapter, surah.surah.verses_count.max(1))?;

    match format {
        OutputFormat::Json => {
            let ayahs: Vec<serde_json::Value> = surah
                .ayahs
                .iter()
                .map(|verse| {
                    let mut value = serde_json::to_value(verse).unwrap_or_default();
                    value["memorized"] = serde_json::Value::Bool(is_memorized(verse));
                    value
                })
                .collect();
            let output = serde_json::json!({
                "surah": surah.surah,
                "bismillah": surah.bismillah,
                "progress": progress,
                "ayahs": ayahs,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let title = format!(
                "{}. {}  {}",
                surah.surah.id, surah.surah.name_simple, surah.surah.name_arabic
            );
            println!("{}", paint(&title, Color::BOLD, use_color));
            println!(
                "Progress: {}/{} ({}%) {}",
                progress.memorized,
                progress.total,
                progress.percentage,
                progress_bar(progress.percentage, 20)
            );
            println!();

            for verse in &surah.ayahs {
                let marker = if is_memorized(verse) {
                    paint("\u{2713}", Color::GREEN, use_color)
                } else {
                    " ".to_string()
                };
                println!("{} {} {}", marker, paint(&verse.key, Color::CYAN, use_color), verse.text);
                if settings.show_translations && !verse.translation.is_empty() {
                    for line in wrap_lines(&translation_text(&verse.translation), "    ", 80) {
                        println!("{}", paint(&line, Color::DIM, use_color));
                    }
                }
                if let Some(url) = &verse.audio_url {
                    println!("    {}", paint(url, Color::GRAY, use_color));
                }
            }
        }
    }

    Ok(())
}
