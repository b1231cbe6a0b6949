//! The interaction layer: the host surface contract and the overlay state
//! machine that reacts to map events.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::config::*;
use crate::dataset::*;
use crate::detail::{filter_by_category, region_detail, region_tooltip};
use crate::html::{detail_html, filtered_html, tooltip_html};
use crate::style::{base_style, dataset_styles};

pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load election data.";

/// What the page that hosts the map provides.
pub trait Surface {
    /// Sets the status line. Only used to report load failures.
    fn set_status(&mut self, message: &str);
    fn apply_styles(&mut self, base: &RegionStyle, styles: &BTreeMap<String, RegionStyle>);
    fn show_tooltip(&mut self, html: &str, at: Point);
    fn move_tooltip(&mut self, at: Point);
    fn hide_tooltip(&mut self);
    fn open_overlay(&mut self, html: &str);
    fn close_overlay(&mut self);
    /// Updates a numeric display element, identified by its element id.
    fn set_number(&mut self, element_id: &str, value: u64);
}

/// Pointer coordinates, in page pixels.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }

    fn offset(self, o: TooltipOffset) -> Point {
        Point {
            x: self.x.saturating_add(o.dx),
            y: self.y.saturating_add(o.dy),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum MapEvent {
    /// The pointer entered a region.
    Hover { region: String, at: Point },
    Move { at: Point },
    Leave,
    /// A region was clicked.
    Click { region: String },
    /// A summary widget was clicked.
    SummaryActivate { filter: Category },
    /// A key was pressed while a summary widget had focus.
    Key { key: String, filter: Category },
    /// The dismiss control of the overlay was activated.
    Dismiss,
    /// A pointer event landed outside of the overlay.
    OutsideClick,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OverlayState {
    Closed,
    Open,
}

/// Keys that activate a focused summary widget.
fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " " | "Space" | "Spacebar")
}

/// Holds the overlay state and the tooltip visibility of one page view.
pub struct MapController<'a> {
    dataset: &'a ElectionDataset,
    offset: TooltipOffset,
    overlay: OverlayState,
    tooltip_visible: bool,
}

impl<'a> MapController<'a> {
    pub fn new(dataset: &'a ElectionDataset, offset: TooltipOffset) -> MapController<'a> {
        MapController {
            dataset,
            offset,
            overlay: OverlayState::Closed,
            tooltip_visible: false,
        }
    }

    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    pub fn tooltip_visible(&self) -> bool {
        self.tooltip_visible
    }

    /// Processes one event and returns the resulting overlay state.
    ///
    /// While the overlay is open, hover events are ignored and any click on
    /// the map counts as a click outside of the overlay.
    pub fn handle(&mut self, event: MapEvent, surface: &mut dyn Surface) -> OverlayState {
        debug!("handle: {:?} in state {:?}", event, self.overlay);
        match (self.overlay, event) {
            (OverlayState::Closed, MapEvent::Hover { region, at }) => {
                let view = region_tooltip(&region, self.dataset.region(&region));
                surface.show_tooltip(&tooltip_html(&view), at.offset(self.offset));
                self.tooltip_visible = true;
            }
            (OverlayState::Closed, MapEvent::Move { at }) => {
                if self.tooltip_visible {
                    surface.move_tooltip(at.offset(self.offset));
                }
            }
            (OverlayState::Closed, MapEvent::Leave) => self.hide_tooltip(surface),
            (OverlayState::Closed, MapEvent::Click { region }) => {
                let view = region_detail(&region, self.dataset.region(&region));
                self.open(&detail_html(&view), surface);
            }
            (OverlayState::Closed, MapEvent::SummaryActivate { filter }) => {
                self.open_filter(filter, surface);
            }
            (OverlayState::Closed, MapEvent::Key { key, filter }) => {
                if is_activation_key(&key) {
                    self.open_filter(filter, surface);
                }
            }
            (OverlayState::Open, MapEvent::Dismiss)
            | (OverlayState::Open, MapEvent::OutsideClick)
            | (OverlayState::Open, MapEvent::Click { .. }) => {
                surface.close_overlay();
                self.overlay = OverlayState::Closed;
            }
            (state, e) => {
                debug!("handle: ignoring {:?} in state {:?}", e, state);
            }
        }
        self.overlay
    }

    fn open_filter(&mut self, filter: Category, surface: &mut dyn Surface) {
        let view = filter_by_category(self.dataset, filter);
        self.open(&filtered_html(&view), surface);
    }

    fn open(&mut self, html: &str, surface: &mut dyn Surface) {
        self.hide_tooltip(surface);
        surface.open_overlay(html);
        self.overlay = OverlayState::Open;
    }

    fn hide_tooltip(&mut self, surface: &mut dyn Surface) {
        if self.tooltip_visible {
            surface.hide_tooltip();
            self.tooltip_visible = false;
        }
    }
}

/// Everything computed once a dataset is available.
#[derive(PartialEq, Debug, Clone)]
pub struct LoadedPage {
    pub dataset: ElectionDataset,
    pub stats: DatasetStats,
    pub styles: BTreeMap<String, RegionStyle>,
}

/// Hands the outcome of the load to the page.
///
/// On success the statistics and the region styles are computed once and the
/// styles are applied. On failure the status message is set and nothing else
/// happens.
pub fn start_page(
    loaded: Result<ElectionDataset, LoadFailure>,
    policy: &StylePolicy,
    surface: &mut dyn Surface,
) -> Option<LoadedPage> {
    let dataset = match loaded {
        Ok(d) => d,
        Err(e) => {
            warn!("start_page: {}", e);
            surface.set_status(LOAD_FAILURE_MESSAGE);
            return None;
        }
    };
    let stats = crate::compute_stats(&dataset);
    let styles = dataset_styles(&dataset, policy);
    surface.apply_styles(&base_style(policy), &styles);
    info!("start_page: styled {} regions", styles.len());
    Some(LoadedPage {
        dataset,
        stats,
        styles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DatasetBuilder;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Surface for Recorder {
        fn set_status(&mut self, message: &str) {
            self.calls.push(format!("status {}", message));
        }
        fn apply_styles(&mut self, _base: &RegionStyle, styles: &BTreeMap<String, RegionStyle>) {
            self.calls.push(format!("styles {}", styles.len()));
        }
        fn show_tooltip(&mut self, _html: &str, at: Point) {
            self.calls.push(format!("show {} {}", at.x, at.y));
        }
        fn move_tooltip(&mut self, at: Point) {
            self.calls.push(format!("move {} {}", at.x, at.y));
        }
        fn hide_tooltip(&mut self) {
            self.calls.push("hide".to_string());
        }
        fn open_overlay(&mut self, html: &str) {
            self.calls.push(format!("open {}", html));
        }
        fn close_overlay(&mut self) {
            self.calls.push("close".to_string());
        }
        fn set_number(&mut self, element_id: &str, value: u64) {
            self.calls.push(format!("number {} {}", element_id, value));
        }
    }

    fn dataset() -> ElectionDataset {
        DatasetBuilder::new()
            .region("NC", "North Carolina")
            .election("Governor", Category::State)
            .region("SC", "South Carolina")
            .build()
            .unwrap()
    }

    fn hover(region: &str, x: i32, y: i32) -> MapEvent {
        MapEvent::Hover {
            region: region.to_string(),
            at: Point::new(x, y),
        }
    }

    #[test]
    fn hover_and_move_tooltip() {
        let ds = dataset();
        let mut s = Recorder::default();
        let mut c = MapController::new(&ds, TooltipOffset::default());
        c.handle(hover("NC", 100, 100), &mut s);
        c.handle(MapEvent::Move { at: Point::new(110, 90) }, &mut s);
        c.handle(MapEvent::Leave, &mut s);
        c.handle(MapEvent::Move { at: Point::new(0, 0) }, &mut s);
        assert_eq!(s.calls, vec!["show 110 60", "move 120 50", "hide"]);
    }

    #[test]
    fn click_opens_and_suppresses_tooltip() {
        let ds = dataset();
        let mut s = Recorder::default();
        let mut c = MapController::new(&ds, TooltipOffset::default());
        c.handle(hover("NC", 1, 1), &mut s);
        let state = c.handle(
            MapEvent::Click {
                region: "NC".to_string(),
            },
            &mut s,
        );
        assert_eq!(state, OverlayState::Open);
        assert!(!c.tooltip_visible());
        assert_eq!(s.calls[1], "hide");
        assert!(s.calls[2].starts_with("open "));
        assert!(s.calls[2].contains("North Carolina"));
    }

    #[test]
    fn hover_ignored_while_open() {
        let ds = dataset();
        let mut s = Recorder::default();
        let mut c = MapController::new(&ds, TooltipOffset::default());
        c.handle(
            MapEvent::Click {
                region: "WY".to_string(),
            },
            &mut s,
        );
        let before = s.calls.len();
        c.handle(hover("NC", 5, 5), &mut s);
        c.handle(MapEvent::Move { at: Point::new(6, 6) }, &mut s);
        assert_eq!(s.calls.len(), before);
        assert!(!c.tooltip_visible());
        // Re-enabled right after closing.
        assert_eq!(c.handle(MapEvent::Dismiss, &mut s), OverlayState::Closed);
        c.handle(hover("NC", 5, 5), &mut s);
        assert!(c.tooltip_visible());
    }

    #[test]
    fn missing_region_shows_placeholder() {
        let ds = dataset();
        let mut s = Recorder::default();
        let mut c = MapController::new(&ds, TooltipOffset::default());
        c.handle(
            MapEvent::Click {
                region: "WY".to_string(),
            },
            &mut s,
        );
        assert!(s.calls[0].contains(crate::detail::NO_DATA_MESSAGE));
    }

    #[test]
    fn outside_click_and_keys() {
        let ds = dataset();
        let mut s = Recorder::default();
        let mut c = MapController::new(&ds, TooltipOffset::default());
        // Closed: outside clicks and dismiss do nothing.
        assert_eq!(c.handle(MapEvent::OutsideClick, &mut s), OverlayState::Closed);
        assert_eq!(c.handle(MapEvent::Dismiss, &mut s), OverlayState::Closed);
        let tab = MapEvent::Key {
            key: "Tab".to_string(),
            filter: Category::State,
        };
        assert_eq!(c.handle(tab, &mut s), OverlayState::Closed);
        assert!(s.calls.is_empty());

        let enter = MapEvent::Key {
            key: "Enter".to_string(),
            filter: Category::State,
        };
        assert_eq!(c.handle(enter, &mut s), OverlayState::Open);
        assert!(s.calls[0].contains("1 state with State Elections"));
        assert_eq!(c.handle(MapEvent::OutsideClick, &mut s), OverlayState::Closed);
        assert_eq!(s.calls[1], "close");
    }

    #[test]
    fn space_keys_activate() {
        let ds = dataset();
        for key in [" ", "Space", "Spacebar"] {
            let mut s = Recorder::default();
            let mut c = MapController::new(&ds, TooltipOffset::default());
            let e = MapEvent::Key {
                key: key.to_string(),
                filter: Category::Local,
            };
            assert_eq!(c.handle(e, &mut s), OverlayState::Open, "key {:?}", key);
            assert!(s.calls[0].contains(crate::detail::NO_FILTER_MATCH_MESSAGE));
        }
    }

    #[test]
    fn summary_ignored_while_open() {
        let ds = dataset();
        let mut s = Recorder::default();
        let mut c = MapController::new(&ds, TooltipOffset::default());
        c.handle(
            MapEvent::SummaryActivate {
                filter: Category::State,
            },
            &mut s,
        );
        assert_eq!(s.calls.len(), 1);
        let state = c.handle(
            MapEvent::SummaryActivate {
                filter: Category::Senate,
            },
            &mut s,
        );
        let enter = MapEvent::Key {
            key: "Enter".to_string(),
            filter: Category::Senate,
        };
        assert_eq!(state, OverlayState::Open);
        assert_eq!(c.handle(enter, &mut s), OverlayState::Open);
        assert_eq!(s.calls.len(), 1);
        assert!(s.calls[0].contains("State Elections"));
    }

    #[test]
    fn startup_success() {
        let mut s = Recorder::default();
        let page = start_page(Ok(dataset()), &StylePolicy::default(), &mut s).unwrap();
        assert_eq!(page.stats.regions_tracked, 2);
        assert_eq!(page.styles.len(), 2);
        assert_eq!(s.calls, vec!["styles 2"]);
    }

    #[test]
    fn startup_failure_only_sets_status() {
        let mut s = Recorder::default();
        let res = start_page(
            Err(LoadFailure::Transport("connection refused".to_string())),
            &StylePolicy::default(),
            &mut s,
        );
        assert!(res.is_none());
        assert_eq!(s.calls, vec![format!("status {}", LOAD_FAILURE_MESSAGE)]);
    }
}
