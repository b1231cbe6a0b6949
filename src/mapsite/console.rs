// A line-oriented host for the map: events come from a reader and everything
// the page would display is printed to a writer.

use std::io::BufRead;
use std::thread;
use std::time::Instant;

use election_map::animator::StatAnimation;
use election_map::interaction::{MapController, MapEvent, Point, Surface};

use crate::mapsite::*;

/// Delay between two redraws of the terminal count-up.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct ConsoleSurface<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> ConsoleSurface<W> {
        ConsoleSurface { out }
    }
}

impl<W: Write> Surface for ConsoleSurface<W> {
    fn set_status(&mut self, message: &str) {
        let _ = writeln!(self.out, "status: {}", message);
    }

    fn apply_styles(&mut self, base: &RegionStyle, styles: &BTreeMap<String, RegionStyle>) {
        let _ = writeln!(self.out, "styles: base {} / {}", base.fill, base.hover);
        for (code, s) in styles.iter() {
            let _ = writeln!(self.out, "styles: {} {} / {}", code, s.fill, s.hover);
        }
    }

    fn show_tooltip(&mut self, html: &str, at: Point) {
        let _ = writeln!(self.out, "tooltip at {},{}: {}", at.x, at.y, html);
    }

    fn move_tooltip(&mut self, at: Point) {
        let _ = writeln!(self.out, "tooltip moved to {},{}", at.x, at.y);
    }

    fn hide_tooltip(&mut self) {
        let _ = writeln!(self.out, "tooltip hidden");
    }

    fn open_overlay(&mut self, html: &str) {
        let _ = writeln!(self.out, "overlay opened: {}", html);
    }

    fn close_overlay(&mut self) {
        let _ = writeln!(self.out, "overlay closed");
    }

    fn set_number(&mut self, element_id: &str, value: u64) {
        let _ = writeln!(self.out, "{} = {}", element_id, value);
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Command {
    Event(MapEvent),
    Quit,
}

fn parse_point(x: Option<&str>, y: Option<&str>) -> Result<Point, String> {
    match (x.map(|s| s.parse::<i32>()), y.map(|s| s.parse::<i32>())) {
        (Some(Ok(x)), Some(Ok(y))) => Ok(Point::new(x, y)),
        _ => Err("expected two integer coordinates".to_string()),
    }
}

fn parse_filter(name: Option<&str>) -> Result<Category, String> {
    let name = name.ok_or_else(|| "expected a filter".to_string())?;
    Category::from_filter(name).ok_or_else(|| format!("unknown filter {:?}", name))
}

/// Parses one input line. Blank lines and lines starting with `#` yield
/// `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let cmd = match words.next() {
        None => return Ok(None),
        Some(w) if w.starts_with('#') => return Ok(None),
        Some(w) => w.to_ascii_lowercase(),
    };
    let region = |w: Option<&str>| {
        w.map(|s| s.to_ascii_uppercase())
            .ok_or_else(|| "expected a region code".to_string())
    };
    let event = match cmd.as_str() {
        "hover" => {
            let region = region(words.next())?;
            let at = parse_point(words.next(), words.next())?;
            MapEvent::Hover { region, at }
        }
        "move" => MapEvent::Move {
            at: parse_point(words.next(), words.next())?,
        },
        "leave" => MapEvent::Leave,
        "click" => MapEvent::Click {
            region: region(words.next())?,
        },
        "summary" => MapEvent::SummaryActivate {
            filter: parse_filter(words.next())?,
        },
        "key" => {
            let key = match words.next() {
                Some(k) => k.to_string(),
                None => return Err("expected a key".to_string()),
            };
            MapEvent::Key {
                key,
                filter: parse_filter(words.next())?,
            }
        }
        "dismiss" => MapEvent::Dismiss,
        "outside" => MapEvent::OutsideClick,
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        x => return Err(format!("unknown command {:?}", x)),
    };
    Ok(Some(Command::Event(event)))
}

/// Runs the console host until `quit` or the end of the input.
pub fn run_interactive<R: BufRead, W: Write>(
    loaded: Result<ElectionDataset, LoadFailure>,
    policy: &StylePolicy,
    animate_numbers: bool,
    input: R,
    output: W,
) -> MapResult<()> {
    let failure = loaded.as_ref().err().cloned();
    let mut surface = ConsoleSurface::new(output);
    let page = match start_page(loaded, policy, &mut surface) {
        Some(p) => p,
        None => {
            return match failure {
                Some(source) => Err(MapError::LoadingData { source }),
                None => whatever!("The election data could not be loaded"),
            };
        }
    };

    let anim = StatAnimation::new(&AnimationSettings::default(), &page.stats);
    if animate_numbers {
        let started = Instant::now();
        while !anim.is_done(started.elapsed()) {
            anim.draw(started.elapsed(), &mut surface);
            thread::sleep(FRAME_INTERVAL);
        }
    }
    anim.draw(anim.total_duration(), &mut surface);

    let mut controller = MapController::new(&page.dataset, TooltipOffset::default());
    for line in input.lines() {
        let line = line.context(OpeningFileSnafu { path: "stdin" })?;
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Event(e))) => {
                let state = controller.handle(e, &mut surface);
                debug!("run_interactive: overlay {:?}", state);
            }
            Err(msg) => {
                warn!("run_interactive: {}", msg);
                let _ = writeln!(surface.out, "error: {}", msg);
            }
        }
    }
    Ok(())
}

/// One redraw of the count-up line.
pub fn status_line(frame: &[(StatWidget, u64)]) -> String {
    let parts: Vec<String> = frame
        .iter()
        .map(|(w, v)| format!("{}: {}", w.label(), v))
        .collect();
    parts.join(" | ")
}

/// Counts the statistics up on a single terminal line. The last frame always
/// shows the exact values.
pub fn animate<W: Write>(
    stats: &DatasetStats,
    settings: &AnimationSettings,
    out: &mut W,
    interval: Duration,
) -> MapResult<()> {
    let anim = StatAnimation::new(settings, stats);
    let started = Instant::now();
    loop {
        let elapsed = started.elapsed();
        if anim.is_done(elapsed) {
            break;
        }
        write!(out, "\r{}", status_line(&anim.frame(elapsed)))
            .and_then(|_| out.flush())
            .context(WritingOutputSnafu { path: "terminal" })?;
        thread::sleep(interval);
    }
    writeln!(out, "\r{}", status_line(&anim.frame(anim.total_duration())))
        .context(WritingOutputSnafu { path: "terminal" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use election_map::builder::DatasetBuilder;

    fn dataset() -> ElectionDataset {
        DatasetBuilder::new()
            .region("MI", "Michigan")
            .election("U.S. Senate", Category::Senate)
            .competitive()
            .build()
            .unwrap()
    }

    fn run(input: &str) -> String {
        let mut out: Vec<u8> = Vec::new();
        run_interactive(
            Ok(dataset()),
            &StylePolicy::default(),
            false,
            input.as_bytes(),
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_command("hover mi 10 20"),
            Ok(Some(Command::Event(MapEvent::Hover {
                region: "MI".to_string(),
                at: Point::new(10, 20)
            })))
        );
        assert_eq!(
            parse_command("key Enter senate"),
            Ok(Some(Command::Event(MapEvent::Key {
                key: "Enter".to_string(),
                filter: Category::Senate
            })))
        );
        assert_eq!(parse_command("  "), Ok(None));
        assert_eq!(parse_command("# comment"), Ok(None));
        assert_eq!(parse_command("QUIT"), Ok(Some(Command::Quit)));
        assert!(parse_command("move 1").is_err());
        assert!(parse_command("summary governor").is_err());
        assert!(parse_command("zoom").is_err());
    }

    #[test]
    fn session() {
        let out = run("hover MI 100 200\nmove 105 210\nclick MI\nhover MI 1 1\ndismiss\nquit\nclick MI\n");
        assert!(out.contains("styles: MI #dc2626 / #ef4444"));
        assert!(out.contains("sum-senate = 1"));
        assert!(out.contains("tooltip at 110,160: <strong>Michigan</strong>"));
        assert!(out.contains("tooltip moved to 115,170"));
        assert!(out.contains("tooltip hidden"));
        assert_eq!(out.matches("overlay opened").count(), 1);
        assert!(out.contains("overlay closed"));
        // Hovering while the overlay is open shows nothing.
        assert_eq!(out.matches("tooltip at").count(), 1);
    }

    #[test]
    fn bad_lines_are_reported() {
        let out = run("fly MI\n");
        assert!(out.contains("error: unknown command \"fly\""));
    }

    #[test]
    fn failed_load_sets_status_only() {
        let mut out: Vec<u8> = Vec::new();
        let res = run_interactive(
            Err(LoadFailure::Transport("timeout".to_string())),
            &StylePolicy::default(),
            false,
            "click MI\n".as_bytes(),
            &mut out,
        );
        assert!(matches!(res, Err(MapError::LoadingData { .. })));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "status: Failed to load election data.\n"
        );
    }

    #[test]
    fn final_frame_is_exact() {
        let stats = election_map::compute_stats(&dataset());
        let mut out: Vec<u8> = Vec::new();
        let settings = AnimationSettings {
            timings: vec![AnimationTiming {
                widget: StatWidget::TotalElections,
                delay: Duration::ZERO,
                duration: Duration::from_millis(30),
            }],
        };
        animate(&stats, &settings, &mut out, Duration::from_millis(5)).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("\rElections: 1\n"));
    }
}
