use tui::style::{Color, Modifier, Style};

pub const FRAME_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerColor {
    Primary,
    Secondary,
    Accent,
    Shadow,
    Dim,
    Winner,
    Bye,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BannerTheme {
    #[default]
    Dark,
}

pub fn resolve(color: BannerColor, _theme: BannerTheme) -> Style {
    match color {
        BannerColor::Primary => Style::default().fg(Color::Rgb(88, 101, 242)),
        BannerColor::Secondary => Style::default().fg(Color::Rgb(255, 196, 0)),
        BannerColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        BannerColor::Shadow | BannerColor::Dim => Style::default().fg(Color::Indexed(240)),
        BannerColor::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        BannerColor::Bye => Style::default()
            .fg(Color::Indexed(244))
            .add_modifier(Modifier::ITALIC),
    }
}

/// Row of a sparkle bouncing inside `height` rows (triangle wave over ticks).
pub fn sparkle_row(tick: u64, height: u16) -> u16 {
    let h = u64::from(height.saturating_sub(1));
    if h == 0 {
        return 0;
    }
    let t = tick % (2 * h);
    h.abs_diff(t) as u16
}

pub fn trophy_frame(frame: usize) -> [&'static str; 5] {
    const FRAMES: [[&str; 5]; FRAME_COUNT] = [
        ["*  ___  .", " _|   |_ ", "(_|   |_)", "  \\___/  ", "  _|_|_  "],
        [".  ___  *", " _|   |_ ", "(_| * |_)", "  \\___/  ", "  _|_|_  "],
        ["   ___   ", " _|   |_ ", "(_|   |_)", "  \\___/  ", " *_|_|_. "],
        ["+  ___  +", " _|   |_ ", "(_| . |_)", "  \\___/  ", "  _|_|_  "],
    ];
    FRAMES[frame % FRAME_COUNT]
}

pub fn title_rows() -> [&'static str; 4] {
    [
        r" ___ ___    _   ___ _  _____ _____ ",
        r"| _ ) _ \  /_\ / __| |/ / __|_   _|",
        r"| _ \   / / _ \ (__| ' <| _|  | |  ",
        r"|___/_|_\/_/ \_\___|_|\_\___| |_|  ",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_have_uniform_width() {
        for frame in 0..FRAME_COUNT {
            for row in trophy_frame(frame) {
                assert_eq!(row.chars().count(), 9, "{row:?}");
            }
        }
        let width = title_rows()[0].chars().count();
        assert!(title_rows().iter().all(|r| r.chars().count() == width));
    }

    #[test]
    fn sparkle_bounces_between_edges() {
        let rows: Vec<u16> = (0..10).map(|t| sparkle_row(t, 5)).collect();
        assert_eq!(rows, [4, 3, 2, 1, 0, 1, 2, 3, 4, 3]);
        assert_eq!(sparkle_row(7, 1), 0);
    }
}
