//! Pipeline orchestrator: groups → fetch → parse → export.
//!
//! Groups are processed strictly in order. A directory group fans out over
//! its listing, and each child is fetched, parsed, and exported before the
//! next child is requested. The first failure aborts the whole run.

use log::{info, warn};

use crate::app::exporter;
use crate::app::fetcher::ContentFetcher;
use crate::domain::{
    AppError, ContentEntry, DirectoryEntry, EntryKind, FetchError, GroupSpec, RemoteFile,
    parse_file,
};
use crate::ports::{ContentApi, EnvironmentSink};

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub groups: usize,
    pub files: usize,
    pub variables: usize,
}

pub struct Pipeline<C: ContentApi, S: EnvironmentSink> {
    fetcher: ContentFetcher<C>,
    sink: S,
}

impl<C: ContentApi, S: EnvironmentSink> Pipeline<C, S> {
    pub fn new(fetcher: ContentFetcher<C>, sink: S) -> Self {
        Self { fetcher, sink }
    }

    pub fn run(&mut self, groups: &[GroupSpec]) -> Result<RunSummary, AppError> {
        let mut summary = RunSummary::default();

        for group in groups {
            info!("Processing group {}", group);
            self.process_group(group, &mut summary)?;
            summary.groups += 1;
        }

        Ok(summary)
    }

    fn process_group(
        &mut self,
        group: &GroupSpec,
        summary: &mut RunSummary,
    ) -> Result<(), AppError> {
        info!("Retrieving files for group {}", group);

        match self.fetcher.fetch(group.path(), group.revision())? {
            ContentEntry::File(file) => self.apply(&file, summary),
            ContentEntry::Directory(children) => {
                if children.is_empty() {
                    warn!("Group {} contains no files", group);
                }
                // Children are addressed by path only; the group's revision
                // scopes the listing, not the child reads.
                for child in &children {
                    let file = self.fetch_child(child)?;
                    self.apply(&file, summary)?;
                }
                Ok(())
            }
        }
    }

    /// Groups are flat: a subdirectory child fails without being requested.
    fn fetch_child(&self, child: &DirectoryEntry) -> Result<RemoteFile, AppError> {
        match child.kind {
            EntryKind::File => {}
            EntryKind::Dir => {
                return Err(AppError::fetch_failure(
                    &child.path,
                    None,
                    FetchError::UnexpectedDirectory,
                ));
            }
            EntryKind::Symlink | EntryKind::Submodule | EntryKind::Other => {
                warn!("Entry {} is a {:?}, fetching it as a file", child.path, child.kind);
            }
        }
        self.fetch_file(&child.path)
    }

    fn fetch_file(&self, path: &str) -> Result<RemoteFile, AppError> {
        info!("Retrieving file {}", path);
        match self.fetcher.fetch(path, None)? {
            ContentEntry::File(file) => Ok(file),
            ContentEntry::Directory(_) => {
                Err(AppError::fetch_failure(path, None, FetchError::UnexpectedDirectory))
            }
        }
    }

    fn apply(&mut self, file: &RemoteFile, summary: &mut RunSummary) -> Result<(), AppError> {
        let declarations = parse_file(file)?;
        summary.variables += exporter::export(&mut self.sink, &declarations)?;
        summary.files += 1;
        Ok(())
    }
}
