//! Reader and writer options.

use chrono::NaiveDateTime;

use crate::header::LibraryInfo;

/// Options for reading XPT files.
#[derive(Debug, Clone)]
pub struct XptReaderOptions {
    /// Trim trailing spaces from character values.
    pub trim_strings: bool,
    /// Variables to decode, matched case-insensitively. `None` reads all.
    pub columns: Option<Vec<String>>,
}

impl Default for XptReaderOptions {
    fn default() -> Self {
        Self {
            trim_strings: true,
            columns: None,
        }
    }
}

impl XptReaderOptions {
    /// Restricts decoding to the named variables.
    ///
    /// Names absent from the file are ignored; the dataset keeps file order.
    #[must_use]
    pub fn with_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a variable passes the column selection.
    pub(crate) fn selects(&self, name: &str) -> bool {
        self.columns.as_ref().is_none_or(|wanted| {
            wanted
                .iter()
                .any(|candidate| candidate.trim().eq_ignore_ascii_case(name))
        })
    }
}

/// Options for writing XPT files.
#[derive(Debug, Clone)]
pub struct XptWriterOptions {
    pub sas_version: String,
    pub os_name: String,
    /// Defaults to the current local time.
    pub created: Option<NaiveDateTime>,
    /// Defaults to `created`.
    pub modified: Option<NaiveDateTime>,
}

impl Default for XptWriterOptions {
    fn default() -> Self {
        Self {
            sas_version: "9.4".to_string(),
            os_name: "RUST".to_string(),
            created: None,
            modified: None,
        }
    }
}

impl XptWriterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_created(mut self, created: NaiveDateTime) -> Self {
        self.created = Some(created);
        self
    }

    #[must_use]
    pub fn with_modified(mut self, modified: NaiveDateTime) -> Self {
        self.modified = Some(modified);
        self
    }

    #[must_use]
    pub fn with_os_name(mut self, os_name: impl Into<String>) -> Self {
        self.os_name = os_name.into();
        self
    }

    pub(crate) fn library_info(&self) -> LibraryInfo {
        let created = self
            .created
            .unwrap_or_else(|| chrono::Local::now().naive_local());
        LibraryInfo {
            sas_version: self.sas_version.clone(),
            os_name: self.os_name.clone(),
            created,
            modified: self.modified.unwrap_or(created),
        }
    }
}
