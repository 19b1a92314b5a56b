use anyhow::Result;

use hifdh_lib::progress::SettingKey;

use crate::app::App;
use crate::OutputFormat;

pub fn run_show(app: &App, format: &OutputFormat) -> Result<()> {
    let settings = app.engine.settings()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        OutputFormat::Plain => {
            let value = serde_json::to_value(&settings)?;
            for key in SettingKey::ALL {
                let rendered = match &value[key.name()] {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Null => "none".to_string(),
                    other => other.to_string(),
                };
                println!("{:<20} {}", key.name(), rendered);
            }
        }
    }

    Ok(())
}

pub async fn run_set(app: &App, key: &str, value: &str, format: &OutputFormat) -> Result<()> {
    let key = SettingKey::parse(key)?;
    let patch = key.patch(value)?;

    let state = app.engine.update_settings(patch)?;
    app.sync_settings(state.settings.clone()).await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&state.settings)?);
        }
        OutputFormat::Plain => {
            println!("{} updated", key.name());
        }
    }

    Ok(())
}
