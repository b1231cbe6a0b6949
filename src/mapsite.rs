use log::{debug, info, warn};

use election_map::detail::{filter_by_category, region_detail};
use election_map::html::{detail_html, filtered_html};
use election_map::interaction::{start_page, LoadedPage};
use election_map::*;
use snafu::{prelude::*, Snafu};

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;
use text_diff::print_diff;

use crate::args::Args;

pub mod console;
pub mod loader;
pub mod page;
pub mod palette_reader;

#[derive(Debug, Snafu)]
pub enum MapError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile { source: io::Error, path: String },
    #[snafu(display("Error fetching {url}"))]
    HttpTransport { source: reqwest::Error, url: String },
    #[snafu(display("Unexpected status {status} when fetching {url}"))]
    HttpStatus { status: u16, url: String },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Invalid palette {path}"))]
    InvalidPalette { source: ConfigError, path: String },
    #[snafu(display("The election data could not be loaded"))]
    LoadingData { source: LoadFailure },
    #[snafu(display("Error writing the output to {path}"))]
    WritingOutput { source: io::Error, path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type MapResult<T> = Result<T, MapError>;

const DEFAULT_DATA_PATH: &str = "elections.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum OutputType {
    Html,
    Json,
}

fn output_type(args: &Args) -> MapResult<OutputType> {
    match args.output_type.as_deref() {
        None | Some("html") => Ok(OutputType::Html),
        Some("json") => Ok(OutputType::Json),
        Some(x) => whatever!("Unknown output type {:?}: expected html or json", x),
    }
}

/// The summary written with `--output-type json`.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    #[serde(rename = "lastUpdated")]
    last_updated: Option<&'a str>,
    stats: &'a DatasetStats,
    base: RegionStyle,
    styles: &'a BTreeMap<String, RegionStyle>,
}

fn to_pretty_json<T: Serialize>(value: &T) -> MapResult<String> {
    serde_json::to_string_pretty(value).context(ParsingJsonSnafu {})
}

fn render(
    args: &Args,
    page: &LoadedPage,
    policy: &StylePolicy,
    otype: OutputType,
) -> MapResult<String> {
    if let Some(code) = &args.state {
        let code = code.to_ascii_uppercase();
        let view = region_detail(&code, page.dataset.region(&code));
        debug!("render: detail view for {}: {:?}", code, view);
        return match otype {
            OutputType::Html => Ok(detail_html(&view)),
            OutputType::Json => to_pretty_json(&view),
        };
    }
    if let Some(name) = &args.filter {
        let category = match Category::from_filter(name) {
            Some(c) => c,
            None => whatever!(
                "Unknown filter {:?}: expected Local, State, House, Senate or Other",
                name
            ),
        };
        let view = filter_by_category(&page.dataset, category);
        return match otype {
            OutputType::Html => Ok(filtered_html(&view)),
            OutputType::Json => to_pretty_json(&view),
        };
    }
    match otype {
        OutputType::Html => page::render_page(page, policy),
        OutputType::Json => to_pretty_json(&Summary {
            last_updated: page.dataset.last_updated.as_deref(),
            stats: &page.stats,
            base: style::base_style(policy),
            styles: &page.styles,
        }),
    }
}

fn write_output(out: Option<&str>, contents: &str) -> MapResult<()> {
    match out {
        None | Some("stdout") => {
            let mut stdout = io::stdout();
            stdout
                .write_all(contents.as_bytes())
                .and_then(|_| stdout.write_all(b"\n"))
                .context(WritingOutputSnafu { path: "stdout" })
        }
        Some(path) => {
            info!("Writing output to {:?}", path);
            fs::write(path, contents).context(WritingOutputSnafu { path })
        }
    }
}

/// Compares the output with a reference file, ignoring surrounding whitespace.
fn check_reference(path: &str, contents: &str) -> MapResult<()> {
    let reference = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    if reference.trim() != contents.trim() {
        warn!("Found differences with the reference file {:?}", path);
        print_diff(reference.trim(), contents.trim(), "\n");
        whatever!("Difference detected between the output and the reference {}", path)
    }
    info!("Output matches the reference {:?}", path);
    Ok(())
}

pub fn run(args: &Args) -> MapResult<()> {
    let otype = output_type(args)?;
    let policy = match &args.palette {
        Some(path) => palette_reader::read_palette(path)?,
        None => StylePolicy::default(),
    };
    let source = loader::DataSource::new(
        args.data.as_deref().unwrap_or(DEFAULT_DATA_PATH),
        !args.no_cache_bust,
        Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    );
    let loaded = loader::load(&source);

    if args.interactive {
        let stdin = io::stdin();
        let stdout = io::stdout();
        return console::run_interactive(loaded, &policy, args.animate, stdin.lock(), stdout.lock());
    }

    let failure = loaded.as_ref().err().cloned();
    let mut surface = page::PageSurface::default();
    let page = match start_page(loaded, &policy, &mut surface) {
        Some(p) => p,
        None => {
            if otype == OutputType::Html && args.state.is_none() && args.filter.is_none() {
                write_output(args.out.as_deref(), &page::render_status_page(&surface))?;
            } else if let Some(status) = &surface.status {
                eprintln!("{}", status);
            }
            return match failure {
                Some(source) => Err(MapError::LoadingData { source }),
                None => whatever!("The election data could not be loaded"),
            };
        }
    };

    if args.animate {
        let stderr = io::stderr();
        console::animate(
            &page.stats,
            &AnimationSettings::default(),
            &mut stderr.lock(),
            console::FRAME_INTERVAL,
        )?;
    }

    let output = render(args, &page, &policy, otype)?;
    write_output(args.out.as_deref(), &output)?;

    if let Some(path) = &args.reference {
        check_reference(path, &output)?;
    }
    Ok(())
}
