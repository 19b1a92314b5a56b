use anyhow::{bail, Result};

use crate::app::App;

pub fn run(app: &App, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!(
            "This permanently deletes all memorization progress, achievements and settings.\n\
             Re-run with --yes to confirm."
        );
    }

    app.engine.reset()?;
    println!("All local data deleted.");
    Ok(())
}
