//! `certqr clear`

use anyhow::Result;
use colored::*;

use super::source::{OpenedSheet, open_sheet};
use crate::actions::{Outcome, clear_qr_codes};
use crate::cli::ClearArgs;
use crate::config::Config;
use crate::prompt::prompt_for;

pub async fn handle_clear(args: ClearArgs, config: &Config) -> Result<()> {
    let prompt = prompt_for(args.yes);
    let sheet = open_sheet(&args.source, config).await?;
    let target = sheet.describe();

    let outcome = match sheet {
        OpenedSheet::Google(mut sheet) => clear_qr_codes(&mut sheet, prompt.as_ref()).await?,
        OpenedSheet::Xlsx(mut sheet) => clear_qr_codes(&mut sheet, prompt.as_ref()).await?,
    };

    match outcome {
        Outcome::Done(Some((first, last))) => {
            log::info!("Cleared rows {}..={} of {}", first, last, target);
            println!("Cleared rows {}-{} in {}", first, last, target.cyan());
        }
        Outcome::Done(None) => println!("{}", "No data rows to clear".dimmed()),
        Outcome::Canceled => {}
    }

    Ok(())
}
