//! Format registry and upload dispatch.
//!
//! Writers are chosen explicitly by [`FormatId`]. Readers are chosen by file
//! extension; when several formats share an extension (every text dialect
//! reads `.txt`) they all try the file at once and the first success wins.

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;
use tokio::task::JoinSet;

use super::text::TextFormat;
use super::{Ace, ChecklistFormat, FormatError, FormatId, InputFile, Json, OutputFile, naming};
use crate::model::ChecklistFile;

/// Errors from registry lookups and dispatch.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Format {0} is already registered")]
    DuplicateFormat(FormatId),

    #[error("Format {0} is not registered")]
    NotRegistered(FormatId),

    #[error("No registered format reads {file_name:?} (extension {extension:?})")]
    UnknownExtension { file_name: String, extension: String },

    /// Every candidate failed. The per-format errors are kept for logs and
    /// tests but are not part of the message.
    #[error("Could not read {file_name:?} in any supported format")]
    Unparseable {
        file_name: String,
        failures: Vec<(FormatId, FormatError)>,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Format task failed: {0}")]
    Task(String),
}

/// Ordered table of the available formats.
#[derive(Default)]
pub struct FormatRegistry {
    formats: IndexMap<FormatId, Arc<dyn ChecklistFormat>>,
    by_extension: IndexMap<String, Vec<Arc<dyn ChecklistFormat>>>,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every format compiled into this build.
    pub fn with_default_formats() -> Self {
        let mut registry = Self::new();
        registry.insert(Arc::new(Ace));
        registry.insert(Arc::new(Json));
        registry.insert(Arc::new(TextFormat::dynon()));
        registry.insert(Arc::new(TextFormat::dynon31()));
        registry.insert(Arc::new(TextFormat::dynon40()));
        registry.insert(Arc::new(TextFormat::afs()));
        registry.insert(Arc::new(TextFormat::grt()));
        #[cfg(feature = "foreflight")]
        registry.insert(Arc::new(super::ForeFlight));
        #[cfg(feature = "garmin-pilot")]
        registry.insert(Arc::new(super::GarminPilot));
        registry
    }

    /// Add a format. Each identifier may be registered once.
    pub fn register(&mut self, format: Arc<dyn ChecklistFormat>) -> Result<(), RegistryError> {
        if self.formats.contains_key(&format.id()) {
            return Err(RegistryError::DuplicateFormat(format.id()));
        }
        self.insert(format);
        Ok(())
    }

    fn insert(&mut self, format: Arc<dyn ChecklistFormat>) {
        let extension = format.extension().to_ascii_lowercase();
        tracing::trace!(format = %format.id(), %extension, "registering format");
        self.by_extension
            .entry(extension)
            .or_default()
            .push(Arc::clone(&format));
        self.formats.insert(format.id(), format);
    }

    pub fn format(&self, id: FormatId) -> Result<&Arc<dyn ChecklistFormat>, RegistryError> {
        self.formats
            .get(&id)
            .ok_or(RegistryError::NotRegistered(id))
    }

    /// Registered formats in registration order.
    pub fn formats(&self) -> impl Iterator<Item = &Arc<dyn ChecklistFormat>> {
        self.formats.values()
    }

    /// Extensions with at least one reader, in registration order.
    pub fn readable_extensions(&self) -> Vec<&str> {
        self.by_extension
            .iter()
            .filter(|(_, formats)| formats.iter().any(|f| f.capabilities().read))
            .map(|(extension, _)| extension.as_str())
            .collect()
    }

    /// Lowercase extension of an uploaded file name, `""` when it has none.
    pub fn extension_of(file_name: &str) -> String {
        naming::extension_of(file_name)
    }

    fn readers_for(
        &self,
        file_name: &str,
    ) -> Result<Vec<Arc<dyn ChecklistFormat>>, RegistryError> {
        let extension = Self::extension_of(file_name);
        let readers: Vec<_> = self
            .by_extension
            .get(&extension)
            .into_iter()
            .flatten()
            .filter(|f| f.capabilities().read)
            .cloned()
            .collect();
        if readers.is_empty() {
            return Err(RegistryError::UnknownExtension {
                file_name: file_name.to_string(),
                extension,
            });
        }
        Ok(readers)
    }

    /// Read an uploaded file with whichever candidate format accepts it.
    ///
    /// Candidates run concurrently on the blocking pool. Failures of the
    /// others are only reported when no candidate succeeds.
    pub async fn parse_file(&self, file: InputFile) -> Result<ChecklistFile, RegistryError> {
        let readers = self.readers_for(&file.name)?;
        let order: Vec<FormatId> = readers.iter().map(|f| f.id()).collect();
        let file = Arc::new(file);

        let mut tasks = JoinSet::new();
        for format in readers {
            let file = Arc::clone(&file);
            tasks.spawn_blocking(move || (format.id(), format.read(&file)));
        }

        let mut failures = Vec::new();
        let mut task_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, Ok(parsed))) => {
                    tracing::debug!(format = %id, file = %file.name, "parsed upload");
                    return Ok(parsed);
                }
                Ok((id, Err(error))) => {
                    tracing::debug!(
                        format = %id,
                        file = %file.name,
                        %error,
                        "candidate rejected upload"
                    );
                    failures.push((id, error));
                }
                Err(error) => {
                    tracing::warn!(file = %file.name, %error, "format task failed");
                    task_error = Some(error.to_string());
                }
            }
        }

        if failures.is_empty() {
            if let Some(message) = task_error {
                return Err(RegistryError::Task(message));
            }
        }
        failures.sort_by_key(|(id, _)| order.iter().position(|o| o == id));
        Err(RegistryError::Unparseable {
            file_name: file.name.clone(),
            failures,
        })
    }

    /// Write a checklist file in the given format.
    pub async fn write_file(
        &self,
        id: FormatId,
        file: &ChecklistFile,
    ) -> Result<OutputFile, RegistryError> {
        let format = self.format(id)?;
        if !format.capabilities().write {
            let message = format!("{} cannot be written", format.name());
            return Err(FormatError::unsupported(message).into());
        }
        let output = format.write(file)?;
        tracing::debug!(
            format = %id,
            file = %output.name,
            bytes = output.bytes.len(),
            "wrote file"
        );
        Ok(output)
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.formats.keys().collect::<Vec<_>>())
            .finish()
    }
}
