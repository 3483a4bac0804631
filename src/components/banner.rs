use crate::components::banner_frames::{
    BannerColor, BannerTheme, resolve, sparkle_row, title_rows, trophy_frame,
};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

pub use crate::components::banner_frames::FRAME_COUNT;

/// Intro splash: block-letter title flanked by animated trophies.
#[derive(Default)]
pub struct AnimatedBanner {
    pub frame: usize,
    pub tick: u64,
    pub theme: BannerTheme,
    pub tournament_name: String,
    /// e.g. "8 players | standard seeding".
    pub subtitle: String,
}

impl Widget for AnimatedBanner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 3 {
            render_line(Line::from(" BRACKET "), area.x, area.y, area.width, buf);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(resolve(BannerColor::Primary, self.theme));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if inner.width < 60 {
            render_compact(&self, inner, buf);
            return;
        }
        render_full(&self, inner, buf);
    }
}

fn render_compact(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    render_centered(
        Line::from(Span::styled(
            banner.tournament_name.as_str(),
            resolve(BannerColor::Accent, banner.theme),
        )),
        inner,
        inner.y,
        buf,
    );
    if inner.height > 1 {
        render_centered(
            Line::from(Span::styled(
                banner.subtitle.as_str(),
                resolve(BannerColor::Secondary, banner.theme),
            )),
            inner,
            inner.y + 1,
            buf,
        );
    }
}

fn render_full(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    let title = title_rows();
    let left = trophy_frame(banner.frame);
    let right = trophy_frame((banner.frame + 2) % FRAME_COUNT);
    let sparkle_y = sparkle_row(banner.tick, 4);
    let show_right = inner.width > 70;

    for row in 0..4u16 {
        if row >= inner.height {
            break;
        }
        let trophy_style = if row == sparkle_y {
            resolve(BannerColor::Secondary, banner.theme)
        } else {
            resolve(BannerColor::Shadow, banner.theme)
        };

        let mut spans = vec![
            Span::styled(left[row as usize], trophy_style),
            Span::raw("  "),
            Span::styled(title[row as usize], resolve(BannerColor::Primary, banner.theme)),
        ];
        if show_right {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(right[row as usize], trophy_style));
        }
        render_centered(Line::from(spans), inner, inner.y + row, buf);
    }

    if inner.height > 5 {
        let caption = format!(" {}  |  {} ", banner.tournament_name, banner.subtitle);
        render_centered(
            Line::from(Span::styled(caption, resolve(BannerColor::Accent, banner.theme))),
            inner,
            inner.y + 5,
            buf,
        );
    }
}

fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = line.width() as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    render_line(line, x, y, area.width, buf);
}

fn render_line(line: Line, x: u16, y: u16, max_width: u16, buf: &mut Buffer) {
    let mut cx = x;
    let limit = x.saturating_add(max_width);
    for span in &line.spans {
        let style: Style = span.style;
        let run: String = span
            .content
            .chars()
            .take(limit.saturating_sub(cx) as usize)
            .collect();
        if run.is_empty() {
            break;
        }
        let len = run.chars().count() as u16;
        buf.set_string(cx, y, run, style);
        cx += len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        AnimatedBanner {
            tournament_name: "Spring Open".to_string(),
            subtitle: "8 players | standard seeding".to_string(),
            ..AnimatedBanner::default()
        }
        .render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn wide_banner_shows_title_art_and_caption() {
        let text = rendered(100, 9);
        assert!(text.contains("/_\\"));
        assert!(text.contains("Spring Open"));
    }

    #[test]
    fn narrow_banner_falls_back_to_text() {
        let text = rendered(40, 6);
        assert!(text.contains("Spring Open"));
        assert!(text.contains("8 players"));
    }
}
