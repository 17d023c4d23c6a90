use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Element, Length, Task, Theme};
use rfd::FileDialog;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod analyzer;
mod config;
mod error;
mod state;
mod ui;
mod upload;

use analyzer::{Analyzer, GeminiClient};
use config::Config;
use error::ScanError;
use state::history::HistoryStore;
use state::session::{AnalysisTicket, Session};
use upload::uploader::{self, UploadedImage};

/// Extensions offered by the file picker
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "webp", "gif", "heic", "heif"];

/// Main application state
struct CarScanner {
    /// None when no API key is configured
    analyzer: Option<Arc<Analyzer>>,
    history: HistoryStore,
    session: Session,
    /// Decoded previews, index-aligned with the session's images
    previews: Vec<Option<Handle>>,
    /// Decoded history thumbnails, index-aligned with the history
    history_thumbs: Vec<Option<Handle>>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Upload Images"
    SelectImages,
    /// Picked files have been read
    ImagesLoaded(Vec<UploadedImage>),
    /// User clicked "Process Image"
    Process,
    /// The model request finished
    AnalysisComplete {
        token: u64,
        first_image: String,
        outcome: Result<String, String>,
    },
    ClearHistory,
    /// History thumbnail clicked
    OpenImage(usize),
    /// Overlay clicked
    CloseImage,
}

impl CarScanner {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::load();
        tracing::debug!("Config: {:?}", config);

        let history = open_history(&config);

        let analyzer = match GeminiClient::from_config(&config.gemini) {
            Ok(client) => Some(Arc::new(Analyzer::new(
                Arc::new(client),
                config.gemini.damage_assessment,
            ))),
            Err(e) => {
                tracing::warn!("⚠️  {}", e);
                None
            }
        };

        let status = match &analyzer {
            Some(analyzer) => format!(
                "Ready. Using {}. {} past analyses.",
                analyzer.model_name(),
                history.len()
            ),
            None => ScanError::MissingApiKey.to_string(),
        };

        tracing::info!(
            "🚗 Car Scanner initialized with {} history entries ({})",
            history.len(),
            history
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "in memory".to_string())
        );

        let history_thumbs = history
            .records()
            .iter()
            .map(|r| ui::handle_for(&r.image))
            .collect();

        (
            CarScanner {
                analyzer,
                history,
                session: Session::new(),
                previews: Vec::new(),
                history_thumbs,
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectImages => {
                // Show the native file picker
                let files = FileDialog::new()
                    .set_title("Select Vehicle Photos")
                    .add_filter("Images", &IMAGE_EXTENSIONS)
                    .pick_files();

                if let Some(paths) = files {
                    self.status = format!("Loading {} image(s)...", paths.len());
                    return Task::perform(uploader::load_images(paths), Message::ImagesLoaded);
                }

                Task::none()
            }
            Message::ImagesLoaded(images) => {
                self.previews = images.iter().map(|i| ui::handle_for(&i.data_url)).collect();
                self.status = format!("{} image(s) ready.", images.len());
                self.session.set_images(images);
                Task::none()
            }
            Message::Process => self.start_analysis(),
            Message::AnalysisComplete {
                token,
                first_image,
                outcome,
            } => {
                if let Err(e) = &outcome {
                    tracing::error!("❌ Analysis failed: {}", e);
                }

                let Some(record) = self.session.finish_analysis(token, first_image, outcome)
                else {
                    if let (false, Some(e)) = (self.session.is_busy(), self.session.error()) {
                        self.status = format!("Analysis failed: {}", e);
                    }
                    return Task::none();
                };

                // The store keeps the record in memory even if the write fails
                let thumb = ui::handle_for(&record.image);
                match self.history.append(record) {
                    Ok(()) => self.status = "✅ Analysis complete.".to_string(),
                    Err(e) => {
                        tracing::error!("⚠️  Could not save history: {}", e);
                        self.status = format!("Analysis complete, but history was not saved: {}", e);
                    }
                }
                self.history_thumbs.push(thumb);

                Task::none()
            }
            Message::ClearHistory => {
                self.session.close_modal();
                self.status = match self.history.clear() {
                    Ok(()) => {
                        self.history_thumbs.clear();
                        "History cleared.".to_string()
                    }
                    Err(e) => {
                        tracing::error!("⚠️  Could not clear history: {}", e);
                        format!("Could not clear stored history: {}", e)
                    }
                };
                Task::none()
            }
            Message::OpenImage(index) => {
                if !self.session.open_modal(index, &self.history) {
                    tracing::debug!("No history entry {} to show", index);
                }
                Task::none()
            }
            Message::CloseImage => {
                self.session.close_modal();
                Task::none()
            }
        }
    }

    fn start_analysis(&mut self) -> Task<Message> {
        let ticket = match self.session.begin_analysis() {
            // Already running
            None => return Task::none(),
            Some(Err(e)) => {
                self.status = e.to_string();
                return Task::none();
            }
            Some(Ok(ticket)) => ticket,
        };

        let Some(analyzer) = self.analyzer.clone() else {
            self.session.abort_analysis(ticket.token, &ScanError::MissingApiKey);
            self.status = ScanError::MissingApiKey.to_string();
            return Task::none();
        };

        let AnalysisTicket {
            token,
            files,
            first_image,
        } = ticket;

        self.status = format!(
            "Analysing {} image(s) with {}...",
            files.len(),
            analyzer.model_name()
        );

        Task::perform(
            async move {
                let outcome = analyzer.analyze(&files).await.map_err(|e| e.to_string());
                (token, first_image, outcome)
            },
            |(token, first_image, outcome)| Message::AnalysisComplete {
                token,
                first_image,
                outcome,
            },
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let busy = self.session.is_busy();

        let controls = row![
            button("Upload Images")
                .on_press(Message::SelectImages)
                .padding(10),
            button(if busy { "Processing..." } else { "Process Image" })
                .on_press_maybe((!busy).then_some(Message::Process))
                .padding(10),
            button("Clear History")
                .on_press_maybe((!self.history.is_empty()).then_some(Message::ClearHistory))
                .padding(10),
        ]
        .spacing(10);

        let results: Element<Message> = match (self.session.error(), self.session.result()) {
            (Some(error), _) => text(error).size(16).into(),
            (None, Some(result)) => text(result).size(16).into(),
            (None, None) => text("Results will appear here").size(14).into(),
        };

        let content: Column<Message> = column![
            text("Car Analyser").size(40),
            controls,
            text(&self.status).size(14),
            row![
                container(ui::preview::grid(self.session.images(), &self.previews))
                    .width(Length::FillPortion(1)),
                container(results).width(Length::FillPortion(1)),
            ]
            .spacing(30),
            text("History").size(24),
            ui::history::table(self.history.records(), &self.history_thumbs),
        ]
        .spacing(20)
        .padding(30);

        let page: Element<Message> = scrollable(content).height(Length::Fill).into();

        // Thumbnails are index-aligned with the history, so reuse the decoded handle
        let shown = self
            .session
            .modal_record(&self.history)
            .and_then(|(index, _)| self.history_thumbs.get(index))
            .and_then(Option::as_ref);

        match shown {
            Some(handle) => ui::modal::overlay(page, handle.clone()),
            None => page,
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Open the on-disk history, falling back to a session-only store
fn open_history(config: &Config) -> HistoryStore {
    let on_disk = match config.history_path() {
        Some(path) => HistoryStore::open(&path),
        None => Err(ScanError::NoDataDir),
    };

    on_disk.unwrap_or_else(|e| {
        tracing::error!("⚠️  History will not be saved this session: {}", e);
        // If this fails, we panic because SQLite itself is unusable
        HistoryStore::in_memory().expect("Failed to create in-memory history store")
    })
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("car_scanner=info")),
        )
        .init();

    iced::application("Car Scanner", CarScanner::update, CarScanner::view)
        .theme(CarScanner::theme)
        .centered()
        .run_with(CarScanner::new)
}
