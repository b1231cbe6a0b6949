use clap::Parser;

/// This is a static page generator and console host for per-state election maps.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path or http(s) URL, default elections.json) The election data. For more information about the
    /// file format, read the documentation of the election_map::manual module.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default html) The type of the output: html or json.
    #[clap(long, value_parser)]
    pub output_type: Option<String>,

    /// (region code, optional) Only render the details of this region, as shown in the overlay.
    #[clap(short, long, value_parser)]
    pub state: Option<String>,

    /// (Local, State, House, Senate or Other) Only render the regions that have this type of election.
    #[clap(short, long, value_parser)]
    pub filter: Option<String>,

    /// (file path, optional) A JSON file with the palette and the coloring rules. The built-in palette is
    /// used when not provided.
    #[clap(short, long, value_parser)]
    pub palette: Option<String>,

    /// (file path) A reference file containing the expected output. If provided, electionmap will
    /// check that the output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If passed as an argument, the data URL is requested as is, without the v=<timestamp> parameter.
    #[clap(long, takes_value = false)]
    pub no_cache_bust: bool,

    /// (default 10) Timeout in seconds when the data is fetched over HTTP.
    #[clap(long, value_parser)]
    pub timeout_secs: Option<u64>,

    /// If passed as an argument, reads map events from the standard input and prints what the page would show.
    #[clap(long, takes_value = false)]
    pub interactive: bool,

    /// If passed as an argument, counts the summary statistics up on the terminal (standard error).
    #[clap(long, takes_value = false)]
    pub animate: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
