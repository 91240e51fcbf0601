#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod fetch;
mod library;
mod query;
mod ui;

use iced::task;
use iced::widget::{column, container, image, row, rule};
use iced::{Color, Element, Length, Task, Theme};

use config::Config;
use fetch::{CoverImage, FetchError};
use library::{Library, TrackDetails, TrackId};
use query::SortKey;
use ui::{LoadStatus, Message};

// ─────────────────────────────────────────────────────────────────────────────
//  Application state
// ─────────────────────────────────────────────────────────────────────────────

struct App {
    /// Persistent configuration.
    config: Config,

    /// Fetched tracks. Replaced wholesale on reload, never edited.
    library: Library,
    /// State of the last track list fetch.
    load_status: LoadStatus,

    /// Current search query.
    search_text: String,
    /// Drop explicit tracks from the table.
    hide_explicit: bool,
    /// Chosen sort order; `None` shows tracks in payload order.
    sort_key: Option<SortKey>,
    /// Ids shown in the table, in display order.
    visible: Vec<TrackId>,

    /// Selected row.
    selected: Option<TrackId>,
    /// What the detail pane shows. Kept when the selection can't be resolved.
    details: Option<TrackDetails>,
    /// Current cover thumbnail.
    cover: Option<image::Handle>,
    /// Generation of the newest cover request; older results are dropped.
    cover_generation: u64,
    /// Abort handle for the in-flight cover fetch.
    cover_task: Option<task::Handle>,
}

impl App {
    fn boot() -> (Self, Task<Message>) {
        let mut config = Config::load();
        config.apply_args(std::env::args());
        log::info!(
            "Config: endpoint={}, timeout={}s, cover={}px, hide_explicit={}, sort={:?}",
            config.endpoint_url,
            config.request_timeout_secs,
            config.cover_size,
            config.hide_explicit,
            config.sort_key,
        );

        let mut app = Self::new(config);
        let task = app.load_tracks();
        (app, task)
    }

    fn new(config: Config) -> Self {
        Self {
            hide_explicit: config.hide_explicit,
            sort_key: config.sort_key,
            config,
            library: Library::default(),
            load_status: LoadStatus::Loading,
            search_text: String::new(),
            visible: Vec::new(),
            selected: None,
            details: None,
            cover: None,
            cover_generation: 0,
            cover_task: None,
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ── Track list ───────────────────────────────────────────────
            Message::Reload => {
                if self.load_status != LoadStatus::Loading {
                    return self.load_tracks();
                }
            }

            Message::TracksLoaded(Ok(library)) => {
                log::info!("Loaded {} tracks", library.len());
                self.load_status = LoadStatus::Loaded(library.len());
                self.library = library;
                self.clear_selection();
                self.rebuild_view();
            }

            Message::TracksLoaded(Err(e)) => {
                // Keep whatever was loaded before (empty on first start).
                log::error!("Failed to load tracks: {e}");
                self.load_status = LoadStatus::Failed(e.to_string());
            }

            // ── Search / filter / sort ───────────────────────────────────
            Message::SearchChanged(query) => {
                self.search_text = query;
                self.rebuild_view();
            }

            Message::ClearSearch => {
                self.search_text.clear();
                self.rebuild_view();
            }

            Message::SortSelected(key) => {
                self.sort_key = key;
                self.config.remember_view(self.hide_explicit, self.sort_key);
                self.rebuild_view();
            }

            Message::ToggleHideExplicit => {
                self.hide_explicit = !self.hide_explicit;
                self.config.remember_view(self.hide_explicit, self.sort_key);
                self.rebuild_view();
            }

            // ── Selection ────────────────────────────────────────────────
            Message::TrackSelected(id) => return self.select_track(id),

            Message::CoverLoaded(generation, result) => {
                self.cover_loaded(generation, result);
            }
        }

        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let header = ui::header_bar(&self.load_status);
        let search = ui::search_bar(
            &self.search_text,
            self.sort_key,
            self.hide_explicit,
            self.visible.len(),
            self.library.len(),
        );
        let table = ui::track_table(
            &self.library,
            &self.visible,
            self.selected,
            self.load_status == LoadStatus::Loading,
        );
        let detail = ui::details::detail_panel(
            self.details.as_ref(),
            self.cover.as_ref(),
            self.config.cover_size as f32,
        );

        let body = row![
            container(table).width(Length::Fill).height(Length::Fill),
            rule::vertical(1),
            detail,
        ]
        .height(Length::Fill);

        let content = column![
            header,
            rule::horizontal(1),
            search,
            rule::horizontal(1),
            body
        ];

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme: &Theme| container::Style {
                background: Some(iced::Background::Color(Color::from_rgb(0.09, 0.10, 0.12))),
                ..Default::default()
            })
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    // ── Internal ─────────────────────────────────────────────────────────

    /// Start a track list fetch. An invalid endpoint fails like a bad fetch.
    fn load_tracks(&mut self) -> Task<Message> {
        let endpoint = match self.config.endpoint() {
            Ok(url) => url,
            Err(e) => {
                log::error!("Failed to load tracks: {e}");
                self.load_status = LoadStatus::Failed(e.to_string());
                return Task::none();
            }
        };

        self.load_status = LoadStatus::Loading;
        Task::perform(
            fetch::fetch_tracks(endpoint, self.config.http()),
            Message::TracksLoaded,
        )
    }

    /// Re-derive the table rows from the full library.
    fn rebuild_view(&mut self) {
        self.visible = query::visible_rows(
            &self.library,
            &self.search_text,
            self.hide_explicit,
            self.sort_key,
        );
    }

    fn select_track(&mut self, id: TrackId) -> Task<Message> {
        // Unknown id: leave the current detail pane alone.
        let Some(track) = self.library.get(id) else {
            log::debug!("Ignoring selection of unknown track id {id}");
            return Task::none();
        };

        log::debug!("Selected #{id} \"{}\"", track.name);
        let details = TrackDetails::from_track(track);
        let cover_url = details.cover_url.clone();

        self.selected = Some(id);
        self.details = Some(details);

        // Any older request is now stale, whether or not this one fetches.
        self.cover_generation += 1;
        if let Some(handle) = self.cover_task.take() {
            handle.abort();
        }

        let Some(url) = cover_url else {
            self.cover = None;
            return Task::none();
        };

        let generation = self.cover_generation;
        let (task, handle) = Task::perform(
            fetch::fetch_cover(url, self.config.cover_size, self.config.http()),
            move |result| Message::CoverLoaded(generation, result),
        )
        .abortable();
        self.cover_task = Some(handle);
        task
    }

    fn cover_loaded(&mut self, generation: u64, result: Result<CoverImage, FetchError>) {
        if generation != self.cover_generation {
            log::debug!("Dropping stale cover (request {generation})");
            return;
        }
        self.cover_task = None;

        match result {
            Ok(cover) => {
                self.cover = Some(image::Handle::from_rgba(
                    cover.width,
                    cover.height,
                    cover.pixels,
                ));
            }
            // Keep the previous image on failure.
            Err(e) => log::warn!("Failed to load cover: {e}"),
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.details = None;
        self.cover = None;
        self.cover_generation += 1;
        if let Some(handle) = self.cover_task.take() {
            handle.abort();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
//  Entry point
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> iced::Result {
    env_logger::init();

    iced::application(App::boot, App::update, App::view)
        .title(|_: &App| format!("Tracklist v{}", env!("CARGO_PKG_VERSION")))
        .theme(App::theme)
        .window_size((1000.0, 700.0))
        .run()
}
