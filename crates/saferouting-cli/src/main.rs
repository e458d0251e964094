use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use saferouting_lib::{Bounds, NodeId};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use saferouting_cli::output::OutputFormat;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "Walking-route engine utilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a router from graph input and persist its state.
    Build(BuildArgs),
    /// Answer a route query against a persisted state.
    Route(RouteArgs),
    /// Summarise a persisted state.
    Info {
        /// Persisted router state.
        #[arg(long)]
        state: PathBuf,
    },
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// JSON graph document, or a directory with nodes.csv and edges.csv.
    #[arg(long, conflicts_with_all = ["nodes", "edges"], required_unless_present = "nodes")]
    graph: Option<PathBuf>,
    /// Node CSV with `id,x,y` headers.
    #[arg(long, requires = "edges")]
    nodes: Option<PathBuf>,
    /// Edge CSV with `source,target,weight,reversed` headers.
    #[arg(long, requires = "nodes")]
    edges: Option<PathBuf>,
    /// Where to write the router state.
    #[arg(long)]
    state: PathBuf,
    /// Query bounds as `x0,y0,x1,y1` (top-left then bottom-right corner).
    #[arg(long, allow_hyphen_values = true)]
    bounds: Option<Bounds>,
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Persisted router state.
    #[arg(long)]
    state: PathBuf,
    #[arg(long, allow_hyphen_values = true)]
    x0: f64,
    #[arg(long, allow_hyphen_values = true)]
    y0: f64,
    #[arg(long, allow_hyphen_values = true)]
    x1: f64,
    #[arg(long, allow_hyphen_values = true)]
    y1: f64,
    /// Node ids the route must not pass through (repeatable).
    #[arg(long = "avoid", value_name = "ID")]
    avoid: Vec<NodeId>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Write the updated route cache back to the state file.
    #[arg(long)]
    save: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => commands::build::handle_build(&commands::build::BuildCommandArgs {
            graph: args.graph,
            nodes: args.nodes,
            edges: args.edges,
            state: args.state,
            bounds: args.bounds,
        }),
        Command::Route(args) => commands::route::handle_route(&commands::route::RouteCommandArgs {
            state: args.state,
            x0: args.x0,
            y0: args.y0,
            x1: args.x1,
            y1: args.y1,
            avoid: args.avoid,
            format: args.format,
            save: args.save,
        }),
        Command::Info { state } => commands::info::handle_info(&state),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
