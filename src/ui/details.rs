// Right-hand detail pane: cover thumbnail + formatted track fields.

use iced::widget::{column, container, image, row, scrollable, text, Column};
use iced::{Alignment, Color, Element, Length, Padding, Theme};

use super::Message;
use crate::library::TrackDetails;

pub const PANEL_WIDTH: f32 = 260.0;

/// `cover_size` is the edge length covers are resized to; the placeholder
/// uses the same box so the layout doesn't jump when an image arrives.
pub fn detail_panel<'a>(
    details: Option<&TrackDetails>,
    cover: Option<&image::Handle>,
    cover_size: f32,
) -> Element<'a, Message> {
    let content: Column<'a, Message> = match details {
        None => column![
            cover_box(None, cover_size),
            text("Select a track to see its details.")
                .size(13)
                .color(Color::from_rgb(0.5, 0.5, 0.6)),
        ],
        Some(d) => {
            let fields = column![
                text(d.name.clone())
                    .size(17)
                    .color(Color::from_rgb(0.85, 0.87, 0.9)),
                field("Artist", d.artists.clone()),
                field("Album", d.album.clone()),
                field("Duration", d.duration.clone()),
                field("Popularity", d.popularity.to_string()),
                field("Released", d.release_date.clone()),
                field("Explicit", d.explicit.to_string()),
            ]
            .spacing(6);

            column![cover_box(cover, cover_size), fields]
        }
    };

    let panel = content
        .spacing(14)
        .padding(Padding::from([14, 14]))
        .align_x(Alignment::Center)
        .width(Length::Fill);

    container(scrollable(panel))
        .width(Length::Fixed(PANEL_WIDTH))
        .height(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(Color::from_rgb(0.10, 0.11, 0.14))),
            ..Default::default()
        })
        .into()
}

fn field<'a>(label: &'a str, value: String) -> Element<'a, Message> {
    row![
        text(label)
            .size(12)
            .color(Color::from_rgb(0.5, 0.5, 0.6))
            .width(Length::Fixed(76.0)),
        text(value)
            .size(13)
            .color(Color::from_rgb(0.78, 0.80, 0.84))
            .width(Length::Fill),
    ]
    .spacing(8)
    .align_y(Alignment::Start)
    .into()
}

/// The cover if we have one, otherwise a neutral placeholder of the same size.
fn cover_box<'a>(cover: Option<&image::Handle>, size: f32) -> Element<'a, Message> {
    let inner: Element<'a, Message> = match cover {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into(),
        None => text("♪").size(40).color(Color::from_rgb(0.3, 0.3, 0.35)).into(),
    };

    container(inner)
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .center_x(Length::Fixed(size))
        .center_y(Length::Fixed(size))
        .style(|_theme: &Theme| container::Style {
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
