//! Module defining the specification of a test case: the document and its tables

use std::path::{Path, PathBuf};

/// Schema and generated rows for one fixture invocation within a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    heading: String,
    fixture: String,
    columns: Vec<String>,
    highlight: Vec<bool>,
    test_id_prefix: String,
    test_id_start: u32,
    rows: Vec<Vec<String>>,
}

impl TableSpec {
    pub fn new(
        heading: impl Into<String>,
        fixture: impl Into<String>,
        columns: &[&str],
        highlight: &[bool],
    ) -> Result<Self, String> {
        let fixture = fixture.into();
        if fixture.is_empty() {
            return Err("the fixture identifier must not be empty".to_string());
        }
        if columns.is_empty() {
            return Err(format!("table for {fixture} must have at least one column"));
        }
        if columns.len() != highlight.len() {
            return Err(format!(
                "table for {fixture} has {} columns but {} highlight flags",
                columns.len(),
                highlight.len()
            ));
        }
        Ok(Self {
            heading: heading.into(),
            fixture,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            highlight: highlight.to_vec(),
            test_id_prefix: String::new(),
            test_id_start: 10,
            rows: Vec::new(),
        })
    }

    pub fn with_test_ids(mut self, prefix: impl Into<String>, start: u32) -> Self {
        self.test_id_prefix = prefix.into();
        self.test_id_start = start;
        self
    }

    pub(crate) fn add_row(&mut self, row: Vec<String>) -> Result<(), String> {
        if row.len() != self.columns.len() {
            return Err(format!(
                "row has {} values but table for {} has {} columns",
                row.len(),
                self.fixture,
                self.columns.len()
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Test identifier of the `count`-th emitted row, counting from the start value
    pub(crate) fn test_id(&self, count: u32) -> String {
        format!("{}{count}", self.test_id_prefix)
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn fixture(&self) -> &str {
        &self.fixture
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn highlight(&self) -> &[bool] {
        &self.highlight
    }

    pub fn test_id_prefix(&self) -> &str {
        &self.test_id_prefix
    }

    pub fn test_id_start(&self) -> u32 {
        self.test_id_start
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn number_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// The top-level description of one generated test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSpec {
    project_name: String,
    application_name: String,
    suite_name: String,
    suite_id: String,
    description: String,
    version: String,
    author: String,
    repeatable: bool,
    seed: u64,
    tables: Vec<TableSpec>,
}

impl DocumentSpec {
    pub fn new(
        project_name: impl Into<String>,
        suite_name: impl Into<String>,
        suite_id: impl Into<String>,
    ) -> Result<Self, String> {
        let project_name = project_name.into();
        let suite_name = suite_name.into();
        let suite_id = suite_id.into();
        if project_name.is_empty() || suite_name.is_empty() || suite_id.is_empty() {
            return Err("project name, suite name and suite id must not be empty".to_string());
        }
        Ok(Self {
            project_name,
            application_name: "BC".to_string(),
            suite_name,
            suite_id,
            description: String::new(),
            version: String::new(),
            author: String::new(),
            repeatable: true,
            seed: 0,
            tables: Vec::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_repeatable(mut self, repeatable: bool) -> Self {
        self.repeatable = repeatable;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Appends a table. Empty tables are never part of a document.
    pub(crate) fn add_table(&mut self, table: TableSpec) -> Result<(), String> {
        if !table.has_rows() {
            return Err(format!("table for {} has no rows", table.fixture()));
        }
        self.tables.push(table);
        Ok(())
    }

    /// `<root>/<application>/<project>/<suite>`: the directory receiving this suite's test cases
    pub fn suite_directory(&self, root: &Path) -> PathBuf {
        self.project_library(root).join(&self.suite_name)
    }

    /// `<root>/<application>/<project>`: the library holding the suite directories of the project
    pub fn project_library(&self, root: &Path) -> PathBuf {
        root.join(&self.application_name).join(&self.project_name)
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    pub fn suite_name(&self) -> &str {
        &self.suite_name
    }

    pub fn suite_id(&self) -> &str {
        &self.suite_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// "Yes"/"No", as rendered in the document metadata
    pub fn repeatable_label(&self) -> &'static str {
        if self.repeatable { "Yes" } else { "No" }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}
