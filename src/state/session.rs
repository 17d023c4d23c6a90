/// Per-session UI state
///
/// Holds the current selection, the latest result, the in-flight request
/// and the modal. Kept free of iced types so it can be tested directly.
use std::path::PathBuf;

use super::data::AnalysisRecord;
use super::history::HistoryStore;
use crate::error::ScanError;
use crate::upload::UploadedImage;

/// What the app needs to start one analysis
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTicket {
    pub token: u64,
    /// Explicit file list handed to the analyzer
    pub files: Vec<PathBuf>,
    /// Data URL of the first image at the time of the call
    pub first_image: String,
}

#[derive(Debug, Default)]
pub struct Session {
    images: Vec<UploadedImage>,
    result: Option<String>,
    error: Option<String>,
    pending: Option<u64>,
    next_token: u64,
    /// Index into the history of the image shown full size
    modal: Option<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection wholesale
    pub fn set_images(&mut self, images: Vec<UploadedImage>) {
        self.images = images;
        self.error = None;
    }

    pub fn images(&self) -> &[UploadedImage] {
        &self.images
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Check the preconditions and claim the in-flight slot.
    ///
    /// Fails with `NoImages` when nothing is selected. While a request is
    /// outstanding this returns `None`.
    pub fn begin_analysis(&mut self) -> Option<Result<AnalysisTicket, ScanError>> {
        if self.pending.is_some() {
            return None;
        }

        let Some(first) = self.images.first() else {
            self.fail(&ScanError::NoImages);
            return Some(Err(ScanError::NoImages));
        };

        self.next_token += 1;
        let token = self.next_token;
        self.pending = Some(token);
        self.error = None;

        Some(Ok(AnalysisTicket {
            token,
            files: self.images.iter().map(|i| i.path.clone()).collect(),
            first_image: first.data_url.clone(),
        }))
    }

    /// Give up on the in-flight request without a response (e.g. no model)
    pub fn abort_analysis(&mut self, token: u64, error: &ScanError) {
        if self.pending == Some(token) {
            self.pending = None;
            self.fail(error);
        }
    }

    /// Apply a finished request.
    ///
    /// Returns the record to append to the history on success. A
    /// completion for any token other than the in-flight one is ignored.
    pub fn finish_analysis(
        &mut self,
        token: u64,
        first_image: String,
        outcome: Result<String, String>,
    ) -> Option<AnalysisRecord> {
        if self.pending != Some(token) {
            tracing::debug!("Discarding stale response for request {}", token);
            return None;
        }
        self.pending = None;

        match outcome {
            Ok(text) => {
                self.result = Some(text.clone());
                self.error = None;
                Some(AnalysisRecord::new(first_image, text))
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    pub fn fail(&mut self, error: &ScanError) {
        self.error = Some(error.to_string());
    }

    /// Show history entry `index` full size. Out of range leaves the
    /// modal as it was and returns false.
    pub fn open_modal(&mut self, index: usize, history: &HistoryStore) -> bool {
        if history.get(index).is_none() {
            return false;
        }
        self.modal = Some(index);
        true
    }

    /// The history entry the modal is showing, with its index
    pub fn modal_record<'a>(
        &self,
        history: &'a HistoryStore,
    ) -> Option<(usize, &'a AnalysisRecord)> {
        let index = self.modal?;
        history.get(index).map(|record| (index, record))
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }
}
