//! `certqr export`

use anyhow::Result;

use super::source::open_google_sheet;
use crate::actions::{Outcome, export_pdf};
use crate::cli::ExportArgs;
use crate::config::{Config, StorageTarget};
use crate::export::GoogleExporter;
use crate::prompt::prompt_for;
use crate::storage::{DriveStore, FileStore, LocalFolderStore};

pub async fn handle_export(args: ExportArgs, config: &Config) -> Result<()> {
    let prompt = prompt_for(args.yes);
    let sheet = open_google_sheet(args.spreadsheet.as_deref(), args.sheet.as_deref(), config).await?;

    let client = sheet.client().clone();
    let exporter = GoogleExporter::new(client.clone());
    let store: Box<dyn FileStore> = match args.store.unwrap_or(config.storage.target) {
        StorageTarget::Drive => Box::new(DriveStore::new(client)),
        StorageTarget::Local => {
            let folder = match args.folder {
                Some(folder) => folder,
                None => config.storage.local_folder()?,
            };
            Box::new(LocalFolderStore::new(folder))
        }
    };

    let outcome = export_pdf(
        &sheet,
        config.export.clone(),
        &exporter,
        store.as_ref(),
        prompt.as_ref(),
    )
    .await?;

    if let Outcome::Done(file) = outcome {
        log::debug!("Stored {} at {}", file.name, file.location);
    }
    Ok(())
}
