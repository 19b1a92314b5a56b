use anyhow::{Context, Result};

use crate::app::App;
use crate::commands::RETRY_HINT;
use crate::OutputFormat;

pub async fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let reciters = app
        .content()?
        .get_reciters()
        .await
        .with_context(|| format!("Failed to load reciters. {}", RETRY_HINT))?;
    let selected = app.engine.settings()?.selected_reciter;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reciters)?);
        }
        OutputFormat::Plain => {
            if reciters.is_empty() {
                println!("No reciters available.");
                return Ok(());
            }
            for reciter in &reciters {
                let marker = if Some(reciter.id) == selected { "*" } else { " " };
                match &reciter.style {
                    Some(style) => println!("{} {:>4}  {} ({})", marker, reciter.id, reciter.name, style),
                    None => println!("{} {:>4}  {}", marker, reciter.id, reciter.name),
                }
            }
        }
    }

    Ok(())
}
