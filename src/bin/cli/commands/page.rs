use anyhow::{Context, Result};

use hifdh_lib::storage::ScriptType;

use crate::app::App;
use crate::commands::RETRY_HINT;
use crate::render::terminal::{paint, translation_text, wrap_lines, Color};
use crate::OutputFormat;

pub async fn run(
    app: &App,
    number: u32,
    script: Option<ScriptType>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let settings = app.engine.settings()?;
    let script = script.unwrap_or(settings.script_type);

    let page = app
        .content()?
        .get_page(number, script)
        .await
        .with_context(|| format!("Failed to load page {}. {}", number, RETRY_HINT))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        OutputFormat::Plain => {
            let mut header = format!("Page {}", page.page.number);
            if let Some(total) = page.page.total_pages {
                header.push_str(&format!(" of {}", total));
            }
            if let Some(juz) = page.page.juz_number {
                header.push_str(&format!("  Juz {}", juz));
            }
            if let Some(hizb) = page.page.hizb_number {
                header.push_str(&format!("  Hizb {}", hizb));
            }
            println!("{}", paint(&header, Color::BOLD, use_color));
            println!();

            for verse in &page.verses {
                println!("{} {}", paint(&verse.key, Color::CYAN, use_color), verse.text);
                if settings.show_translations && !verse.translation.is_empty() {
                    for line in wrap_lines(&translation_text(&verse.translation), "    ", 80) {
                        println!("{}", paint(&line, Color::DIM, use_color));
                    }
                }
            }
        }
    }

    Ok(())
}
