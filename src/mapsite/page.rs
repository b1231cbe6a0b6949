// Assembly of the full static list page.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use election_map::html::esc;
use election_map::interaction::{Point, Surface};

use crate::mapsite::*;

const PAGE_TITLE: &str = "Upcoming Elections by State";

/// The surface of the static page: it only keeps what ends up in the markup.
#[derive(Debug, Default)]
pub struct PageSurface {
    pub status: Option<String>,
    pub base: Option<RegionStyle>,
    pub styles: BTreeMap<String, RegionStyle>,
}

impl Surface for PageSurface {
    fn set_status(&mut self, message: &str) {
        self.status = Some(message.to_string());
    }

    fn apply_styles(&mut self, base: &RegionStyle, styles: &BTreeMap<String, RegionStyle>) {
        self.base = Some(base.clone());
        self.styles = styles.clone();
    }

    // A static page has no pointer and no overlay.
    fn show_tooltip(&mut self, _html: &str, _at: Point) {}
    fn move_tooltip(&mut self, _at: Point) {}
    fn hide_tooltip(&mut self) {}
    fn open_overlay(&mut self, _html: &str) {}
    fn close_overlay(&mut self) {}
    fn set_number(&mut self, _element_id: &str, _value: u64) {}
}

/// Formats `lastUpdated` for the status line. Values that are neither a
/// timestamp nor a date are shown as is.
pub fn format_last_updated(raw: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts
            .with_timezone(&Utc)
            .format("%B %-d, %Y at %-I:%M %p UTC")
            .to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%B %-d, %Y").to_string();
    }
    raw.to_string()
}

fn start(buf: &mut String) {
    let _ = write!(
        buf,
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
         <title>{}</title></head><body><h1>{}</h1>",
        PAGE_TITLE, PAGE_TITLE
    );
}

fn finish(mut buf: String) -> String {
    buf.push_str("</body></html>");
    buf
}

fn summary_bar(buf: &mut String, stats: &DatasetStats) {
    buf.push_str("<div class=\"summary\">");
    let mut widgets = vec![StatWidget::RegionsTracked, StatWidget::TotalElections];
    widgets.extend(Category::ALL.iter().map(|c| StatWidget::Category(*c)));
    for w in widgets {
        let filter = match w {
            StatWidget::Category(c) => format!(
                " tabindex=\"0\" role=\"button\" data-filter=\"{}\"",
                c.as_str()
            ),
            _ => String::new(),
        };
        let _ = write!(
            buf,
            "<div class=\"summary-item\"{}><span class=\"summary-number\" id=\"{}\">{}</span>\
             <span class=\"summary-label\">{}</span></div>",
            filter,
            w.element_id(),
            w.value(stats),
            esc(w.label())
        );
    }
    let _ = write!(
        buf,
        "<div class=\"summary-item\"><span class=\"summary-number\" id=\"sum-competitive\">{}</span>\
         <span class=\"summary-label\">Competitive Races</span></div>",
        stats.competitive_races
    );
    buf.push_str("</div>");
}

/// The styles for the map widget. `</` is escaped so that the block cannot
/// close the script element.
fn styles_block(
    buf: &mut String,
    base: &RegionStyle,
    styles: &BTreeMap<String, RegionStyle>,
) -> MapResult<()> {
    #[derive(Serialize)]
    struct MapStyles<'a> {
        base: &'a RegionStyle,
        regions: &'a BTreeMap<String, RegionStyle>,
    }
    let js = serde_json::to_string(&MapStyles {
        base,
        regions: styles,
    })
    .context(ParsingJsonSnafu {})?;
    let _ = write!(
        buf,
        "<script type=\"application/json\" id=\"map-styles\">{}</script>",
        js.replace("</", "<\\/")
    );
    Ok(())
}

/// The full page: status line, summary widgets, one section per region
/// sorted by code, contact link and the map styles.
pub fn render_page(page: &LoadedPage, policy: &StylePolicy) -> MapResult<String> {
    let mut buf = String::with_capacity(32 * 1024);
    start(&mut buf);
    if let Some(ts) = &page.dataset.last_updated {
        let _ = write!(
            buf,
            "<p id=\"status\">Last updated: {}</p>",
            esc(&format_last_updated(ts))
        );
    }
    summary_bar(&mut buf, &page.stats);
    for (code, region) in page.dataset.election_data.iter() {
        let view = region_detail(code, Some(region));
        let _ = write!(
            buf,
            "<section class=\"state-section{}\" id=\"state-{}\">{}</section>",
            if region.is_concluded() { " concluded" } else { "" },
            esc(code),
            detail_html(&view)
        );
    }
    if let Some(email) = &page.dataset.contact_email {
        let _ = write!(
            buf,
            "<footer>Questions or corrections? <a href=\"mailto:{}\">{}</a></footer>",
            esc(email),
            esc(email)
        );
    }
    styles_block(&mut buf, &style::base_style(policy), &page.styles)?;
    debug!(
        "render_page: {} regions, {} bytes",
        page.dataset.election_data.len(),
        buf.len()
    );
    Ok(finish(buf))
}

/// The page shown when the data could not be loaded: the status line only.
pub fn render_status_page(surface: &PageSurface) -> String {
    let mut buf = String::with_capacity(512);
    start(&mut buf);
    let _ = write!(
        buf,
        "<p id=\"status\" class=\"error\">{}</p>",
        esc(surface.status.as_deref().unwrap_or_default())
    );
    finish(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use election_map::builder::DatasetBuilder;
    use election_map::interaction::LOAD_FAILURE_MESSAGE;

    #[test]
    fn last_updated_formats() {
        assert_eq!(
            format_last_updated("2024-09-01T15:04:00Z"),
            "September 1, 2024 at 3:04 PM UTC"
        );
        assert_eq!(format_last_updated("2024-10-15"), "October 15, 2024");
        assert_eq!(format_last_updated("yesterday"), "yesterday");
    }

    #[test]
    fn full_page() {
        let ds = DatasetBuilder::new()
            .last_updated("2024-10-15")
            .contact_email("team@example.org")
            .region("WI", "Wisconsin")
            .election("U.S. Senate", Category::Senate)
            .competitive()
            .region("AL", "Alabama")
            .concluded()
            .build()
            .unwrap();
        let policy = StylePolicy::default();
        let mut surface = PageSurface::default();
        let page = start_page(Ok(ds), &policy, &mut surface).unwrap();
        assert_eq!(surface.styles.len(), 2);
        let html = render_page(&page, &policy).unwrap();
        assert!(html.contains("Last updated: October 15, 2024"));
        assert!(html.contains("id=\"sum-senate\">1<"));
        assert!(html.contains("id=\"sum-competitive\">1<"));
        assert!(html.contains("data-filter=\"Other\""));
        let al = html.find("id=\"state-AL\"").unwrap();
        let wi = html.find("id=\"state-WI\"").unwrap();
        assert!(al < wi);
        assert!(html.contains("state-section concluded"));
        assert!(html.contains("mailto:team@example.org"));
        assert!(html.contains("\"WI\":{\"fill\":\"#dc2626\""));
    }

    #[test]
    fn status_page() {
        let mut surface = PageSurface::default();
        let res = start_page(
            Err(LoadFailure::Malformed("eof".to_string())),
            &StylePolicy::default(),
            &mut surface,
        );
        assert!(res.is_none());
        assert!(surface.styles.is_empty());
        let html = render_status_page(&surface);
        assert!(html.contains(LOAD_FAILURE_MESSAGE));
        assert!(!html.contains("summary"));
    }
}
