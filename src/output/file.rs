//! Module persisting rendered documents into the suite directory layout

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use tracing::info;

use crate::{
    Error,
    domain::DocumentSpec,
    error::{precondition_error, storage_error},
    output::render,
};

/// Writes documents to `<root>/<application>/<project>/<suite>/<NNNN>_<suite_id>.html`
#[derive(Debug, Clone)]
pub struct FileBuilder {
    root: PathBuf,
    number: u32,
}

impl FileBuilder {
    pub fn new(root: impl Into<PathBuf>, number: u32) -> Result<Self, Error> {
        if number == 0 {
            return Err(precondition_error("test case number must be greater than 0"));
        }
        Ok(Self {
            root: root.into(),
            number,
        })
    }

    /// `<NNNN>_<suite_id>.html`, the number zero-padded to four digits
    pub fn file_name(&self, document: &DocumentSpec) -> String {
        format!("{:04}_{}.html", self.number, document.suite_id())
    }

    pub fn path(&self, document: &DocumentSpec) -> PathBuf {
        document
            .suite_directory(&self.root)
            .join(self.file_name(document))
    }

    /// Renders `document` and creates or overwrites its file. The suite directory must exist.
    pub fn write(
        &self,
        document: &DocumentSpec,
        generated_on: NaiveDate,
    ) -> Result<PathBuf, Error> {
        let path = self.path(document);
        let text = render(document, generated_on);
        fs::write(&path, &text).map_err(|e| storage_error(&path, e))?;

        info!(
            path = %path.display(),
            bytes = text.len(),
            tables = document.table_count(),
            "wrote test case"
        );
        Ok(path)
    }
}

/// Checks that `root` and the suite directory of `document` below it exist
pub fn prepare_output_directory(root: &Path, document: &DocumentSpec) -> Result<PathBuf, Error> {
    for dir in [root.to_path_buf(), document.suite_directory(root)] {
        if !dir.is_dir() {
            return Err(storage_error(
                &dir,
                io::Error::new(io::ErrorKind::NotFound, "directory does not exist"),
            ));
        }
    }
    Ok(document.suite_directory(root))
}
