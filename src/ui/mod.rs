pub mod details;

use iced::widget::{
    button, column, container, pick_list, row, rule, scrollable, text, text_input, Column, Space,
};
use iced::{Alignment, Color, Element, Length, Padding, Theme};

use crate::fetch::{CoverImage, FetchError};
use crate::library::{Library, Track, TrackId};
use crate::query::SortKey;

// ─────────────────────────────────────────────────────────────────────────────
//  Messages
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Message {
    // Track list
    TracksLoaded(Result<Library, FetchError>),
    Reload,

    // Search / filter / sort
    SearchChanged(String),
    ClearSearch,
    SortSelected(Option<SortKey>),
    ToggleHideExplicit,

    // Selection
    TrackSelected(TrackId),

    // Cover art result, tagged with the request generation that started it.
    CoverLoaded(u64, Result<CoverImage, FetchError>),
}

/// One entry of the sort dropdown. `None` is the payload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortChoice(pub Option<SortKey>);

impl SortChoice {
    pub const ALL: [SortChoice; 4] = [
        SortChoice(None),
        SortChoice(Some(SortKey::ReleaseDate)),
        SortChoice(Some(SortKey::Popularity)),
        SortChoice(Some(SortKey::Duration)),
    ];
}

impl std::fmt::Display for SortChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(key) => f.write_str(key.label()),
            None => f.write_str("Original order"),
        }
    }
}

/// State of the track list fetch, shown in the header.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Loaded(usize),
    Failed(String),
}

// ─────────────────────────────────────────────────────────────────────────────
//  View builders
// ─────────────────────────────────────────────────────────────────────────────

/// Title, load status and the reload button.
pub fn header_bar<'a>(status: &LoadStatus) -> Element<'a, Message> {
    let (status_text, status_color) = match status {
        LoadStatus::Loading => ("Loading tracks…".to_string(), Color::from_rgb(0.5, 0.5, 0.6)),
        LoadStatus::Loaded(n) => (format!("{n} tracks loaded"), Color::from_rgb(0.5, 0.5, 0.6)),
        LoadStatus::Failed(err) => (format!("⚠ {err}"), Color::from_rgb(1.0, 0.3, 0.3)),
    };

    let reload = if *status == LoadStatus::Loading {
        disabled_button("⟳ Reload")
    } else {
        tool_button("⟳ Reload", Message::Reload)
    };

    let bar = row![
        column![
            text("Track browser")
                .size(18)
                .color(Color::from_rgb(0.85, 0.87, 0.9)),
            text(status_text).size(12).color(status_color),
        ]
        .spacing(2),
        Space::new().width(Length::Fill),
        reload,
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .padding(Padding::from([10, 16]));

    container(bar)
        .width(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(Color::from_rgb(0.10, 0.11, 0.14))),
            ..Default::default()
        })
        .into()
}

/// Search input, sort dropdown, explicit toggle and track count.
pub fn search_bar<'a>(
    search_text: &str,
    sort_key: Option<SortKey>,
    hide_explicit: bool,
    visible_count: usize,
    total_count: usize,
) -> Element<'a, Message> {
    let search_input = text_input("Search by title, artist or album...", search_text)
        .on_input(Message::SearchChanged)
        .size(13)
        .padding(Padding::from([4, 8]))
        .width(Length::Fill)
        .style(|_theme: &Theme, _status| text_input::Style {
            background: iced::Background::Color(Color::from_rgb(0.14, 0.15, 0.18)),
            border: iced::Border {
                radius: 3.0.into(),
                width: 1.0,
                color: Color::from_rgb(0.25, 0.27, 0.30),
            },
            icon: Color::from_rgb(0.5, 0.5, 0.6),
            placeholder: Color::from_rgb(0.4, 0.4, 0.5),
            value: Color::from_rgb(0.85, 0.87, 0.9),
            selection: Color::from_rgba(0.3, 0.5, 0.8, 0.3),
        });

    let mut search_row = row![
        text("🔍 ").size(13).color(Color::from_rgb(0.5, 0.5, 0.6)),
        search_input,
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    if !search_text.is_empty() {
        search_row = search_row.push(tool_button("✕", Message::ClearSearch));
    }

    let sort_list = pick_list(SortChoice::ALL, Some(SortChoice(sort_key)), |choice| {
        Message::SortSelected(choice.0)
    })
    .text_size(13)
        .padding(Padding::from([4, 8]));

    let explicit_btn = button(
        text(if hide_explicit {
            "✓ Hide explicit"
        } else {
            "Hide explicit"
        })
        .size(12),
    )
    .on_press(Message::ToggleHideExplicit)
    .padding(Padding::from([4, 10]))
    .style(move |_theme: &Theme, status| {
        let bg = if hide_explicit {
            match status {
                button::Status::Hovered => Color::from_rgb(0.20, 0.30, 0.45),
                button::Status::Pressed => Color::from_rgb(0.15, 0.22, 0.35),
                _ => Color::from_rgb(0.16, 0.25, 0.40),
            }
        } else {
            match status {
                button::Status::Hovered => Color::from_rgb(0.25, 0.27, 0.32),
                button::Status::Pressed => Color::from_rgb(0.18, 0.20, 0.24),
                _ => Color::from_rgb(0.18, 0.19, 0.22),
            }
        };
        button::Style {
            background: Some(iced::Background::Color(bg)),
            text_color: if hide_explicit {
                Color::from_rgb(0.9, 0.92, 0.96)
            } else {
                Color::from_rgb(0.8, 0.82, 0.88)
            },
            border: iced::Border {
                radius: 3.0.into(),
                width: 1.0,
                color: if hide_explicit {
                    Color::from_rgb(0.3, 0.45, 0.7)
                } else {
                    Color::from_rgb(0.25, 0.27, 0.30)
                },
            },
            ..Default::default()
        }
    });

    let count_text = if visible_count == total_count {
        format!("{total_count} tracks")
    } else {
        format!("{visible_count} / {total_count} tracks")
    };

    let count_label = text(count_text)
        .size(12)
        .color(Color::from_rgb(0.5, 0.5, 0.6));

    let bar = row![
        search_row,
        Space::new().width(Length::Fixed(8.0)),
        sort_list,
        explicit_btn,
        Space::new().width(Length::Fixed(8.0)),
        count_label,
    ]
    .spacing(4)
    .align_y(Alignment::Center)
    .padding(Padding::from([4, 16]));

    container(bar)
        .width(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(Color::from_rgb(0.11, 0.12, 0.14))),
            ..Default::default()
        })
        .into()
}

/// Build the track table.
/// `visible` lists the ids to show, in display order.
pub fn track_table<'a>(
    library: &Library,
    visible: &[TrackId],
    selected: Option<TrackId>,
    loading: bool,
) -> Element<'a, Message> {
    let header = row_content(
        "#".into(),
        ["Title", "Artist", "Duration", "Album"].map(String::from),
        "",
        Color::from_rgb(0.5, 0.5, 0.6),
        11.0,
    );

    let mut rows = Column::new()
        .spacing(0)
        .push(container(header).padding(Padding::from([0, 4])))
        .push(rule::horizontal(1));

    if visible.is_empty() {
        let msg = if loading {
            "Loading tracks…"
        } else if library.is_empty() {
            "No tracks loaded"
        } else {
            "No matching tracks"
        };
        rows = rows.push(
            container(text(msg).size(14).color(Color::from_rgb(0.4, 0.4, 0.5)))
                .padding(40)
                .center_x(Length::Fill),
        );
    } else {
        for (pos, &id) in visible.iter().enumerate() {
            rows = rows.push(track_row(library, pos, id, selected == Some(id)));
        }
    }

    scrollable(rows)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn track_row<'a>(
    library: &Library,
    pos: usize,
    id: TrackId,
    is_selected: bool,
) -> Element<'a, Message> {
    let Some(track) = library.get(id) else {
        return Space::new().into();
    };

    let color = if is_selected {
        Color::from_rgb(0.35, 0.85, 0.55)
    } else {
        Color::from_rgb(0.78, 0.80, 0.84)
    };

    let content = row_content(
        format!("{:>3}", pos + 1),
        row_cells(track),
        if track.is_explicit() { "E" } else { "" },
        color,
        13.0,
    );

    let bg = if is_selected {
        Some(iced::Background::Color(Color::from_rgba(0.3, 0.5, 0.8, 0.2)))
    } else {
        None
    };

    button(content)
        .on_press(Message::TrackSelected(id))
        .padding(Padding::from([0, 4]))
        .width(Length::Fill)
        .style(move |_theme: &Theme, status| {
            let background = match status {
                button::Status::Hovered if !is_selected => Some(iced::Background::Color(
                    Color::from_rgba(1.0, 1.0, 1.0, 0.04),
                )),
                _ => bg,
            };
            button::Style {
                background,
                text_color: Color::WHITE,
                ..Default::default()
            }
        })
        .into()
}

/// Title, artists, duration and album exactly as the table shows them.
/// Title and artists are the track's own values, so a row can be looked up
/// again by its text.
pub fn row_cells(track: &Track) -> [String; 4] {
    [
        track.name.clone(),
        track.artist_names(),
        track.format_duration(),
        track.album.name.clone(),
    ]
}

fn row_content<'a>(
    num: String,
    cells: [String; 4],
    explicit_marker: &'static str,
    color: Color,
    size: f32,
) -> Element<'a, Message> {
    let [title, artists, duration, album] = cells;

    row![
        text(num)
            .size(size)
            .color(color)
            .width(Length::Fixed(40.0)),
        text(title)
            .size(size)
            .color(color)
            .width(Length::FillPortion(4)),
        text(explicit_marker)
            .size(size)
            .color(Color::from_rgb(0.85, 0.55, 0.3))
            .width(Length::Fixed(16.0)),
        text(artists)
            .size(size)
            .color(color)
            .width(Length::FillPortion(3)),
        text(duration)
            .size(size)
            .color(color)
            .width(Length::Fixed(70.0)),
        text(album)
            .size(size)
            .color(color)
            .width(Length::FillPortion(3)),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .padding(Padding::from([4, 12]))
    .into()
}

// ─────────────────────────────────────────────────────────────────────────────
//  Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn tool_button<'a>(label: &'a str, msg: Message) -> Element<'a, Message> {
    button(text(label).size(12))
        .on_press(msg)
        .padding(Padding::from([4, 10]))
        .style(|_theme: &Theme, status| {
            let bg = match status {
                button::Status::Hovered => Color::from_rgb(0.25, 0.27, 0.32),
                button::Status::Pressed => Color::from_rgb(0.18, 0.20, 0.24),
                _ => Color::from_rgb(0.18, 0.19, 0.22),
            };
            button::Style {
                background: Some(iced::Background::Color(bg)),
                text_color: Color::from_rgb(0.8, 0.82, 0.88),
                border: iced::Border {
                    radius: 3.0.into(),
                    width: 1.0,
                    color: Color::from_rgb(0.25, 0.27, 0.30),
                },
                ..Default::default()
            }
        })
        .into()
}

/// Same look as [`tool_button`] but without a press handler.
fn disabled_button<'a>(label: &'a str) -> Element<'a, Message> {
    button(text(label).size(12).color(Color::from_rgb(0.45, 0.47, 0.52)))
        .padding(Padding::from([4, 10]))
        .style(|_theme: &Theme, _status| button::Style {
            background: Some(iced::Background::Color(Color::from_rgb(0.14, 0.15, 0.18))),
            border: iced::Border {
                radius: 3.0.into(),
                width: 1.0,
                color: Color::from_rgb(0.22, 0.23, 0.26),
            },
            ..Default::default()
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::resolve_displayed;
    use crate::library::tests::entry;
    use crate::query::visible_rows;

    fn catalogue() -> Library {
        Library::new(vec![
            entry("HUMBLE.", &["Kendrick Lamar"], "DAMN.", "2017-04-14", 177_000, 84, true),
            entry("Blinding Lights", &["The Weeknd"], "After Hours", "2020-03-20", 200_040, 91, false),
            entry("Under Pressure", &["Queen", "David Bowie"], "Hot Space", "1982-05-21", 248_000, 75, false),
            entry("Killer Queen", &["Queen"], "Sheer Heart Attack", "1974-11-08", 180_000, 65, true),
        ])
    }

    #[test]
    fn test_row_cells_show_track_values() {
        let lib = catalogue();
        let cells = row_cells(lib.get(0).unwrap());
        assert_eq!(cells, ["HUMBLE.", "Kendrick Lamar", "2:57", "DAMN."]);

        let cells = row_cells(lib.get(2).unwrap());
        assert_eq!(cells[1], "Queen, David Bowie");
    }

    #[test]
    fn test_rendered_rows_resolve_back() {
        let lib = catalogue();
        for query in ["", "queen", "e"] {
            for key in [None, Some(SortKey::Popularity)] {
                for id in visible_rows(&lib, query, false, key) {
                    let [title, artists, ..] = row_cells(lib.get(id).unwrap());
                    let found = resolve_displayed(&lib, &title, &artists).unwrap();
                    assert!(std::ptr::eq(found, lib.get(id).unwrap()), "row {id}");
                }
            }
        }
    }

    #[test]
    fn test_sort_choices() {
        assert_eq!(SortChoice::ALL[0], SortChoice(None));
        assert_eq!(SortChoice(None).to_string(), "Original order");
        assert_eq!(SortChoice(Some(SortKey::Duration)).to_string(), "By duration");
    }
}
