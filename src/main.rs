use std::{fs::File, io::BufReader, path::PathBuf};

use adjbin::{
    decoder,
    io::EdgeFile,
    progress::DEFAULT_PROGRESS_INTERVAL,
    Converter, DEFAULT_FEATURE_ID_CEILING, MEBIBYTE,
};
use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn cli() -> Command
{
    Command::new("adjbin")
        .about("Convert undirected edge lists into binary adjacency records")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .about("Convert an edge list (optionally .gz) into binary records")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Edge list, one `u v` pair per line, `#` starts a comment"),
                )
                .arg(
                    Arg::new("output")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Binary output file"),
                )
                .arg(
                    Arg::new("no-relabel")
                        .long("no-relabel")
                        .action(ArgAction::SetTrue)
                        .help("Keep original node ids in neighbor lists"),
                )
                .arg(
                    Arg::new("feature-ceiling")
                        .long("feature-ceiling")
                        .value_parser(clap::value_parser!(u32))
                        .help("Max feature id of the downstream reader, exceeding it only warns [default: 600000]"),
                )
                .arg(
                    Arg::new("progress")
                        .long("progress")
                        .short('p')
                        .action(ArgAction::SetTrue)
                        .help("Log progress while sorting and writing"),
                )
                .arg(
                    Arg::new("progress-interval")
                        .long("progress-interval")
                        .value_parser(clap::value_parser!(usize))
                        .help("Nodes between two progress lines [default: 10000]"),
                )
                .arg(
                    Arg::new("threads")
                        .long("threads")
                        .short('t')
                        .value_parser(clap::value_parser!(usize))
                        .help("Worker threads for sorting and relabeling [default: all cores]"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Decode a binary file and check its record ordering")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn main() -> Result<()>
{
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli().get_matches().subcommand() {
        Some(("convert", sub_m)) => handle_convert(sub_m),
        Some(("inspect", sub_m)) => handle_inspect(sub_m),
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn handle_convert(matches: &ArgMatches) -> Result<()>
{
    let input = matches.get_one::<PathBuf>("input").expect("required");
    let output = matches.get_one::<PathBuf>("output").expect("required");

    let mut converter = Converter::new()
        .relabel(!matches.get_flag("no-relabel"))
        .feature_id_ceiling(
            matches
                .get_one::<u32>("feature-ceiling")
                .copied()
                .unwrap_or(DEFAULT_FEATURE_ID_CEILING),
        )
        .progress(matches.get_flag("progress"))
        .progress_interval(
            matches
                .get_one::<usize>("progress-interval")
                .copied()
                .unwrap_or(DEFAULT_PROGRESS_INTERVAL),
        );
    if let Some(&threads) = matches.get_one::<usize>("threads") {
        converter = converter.num_threads(threads);
    }

    let summary = converter
        .run(&EdgeFile::new(input), output)
        .with_context(|| format!("converting {} to {}", input.display(), output.display()))?;

    println!("edges:           {}", summary.num_edges);
    println!("max node id:     {}", summary.max_node_id);
    println!("records:         {}", summary.num_active);
    println!("neighbor ids:    {}", summary.total_neighbors);
    if let Some(n) = summary.num_feature_ids {
        println!("feature ids:     1..={}", n);
    }
    println!("bytes written:   {}", summary.bytes_written);
    Ok(())
}

fn handle_inspect(matches: &ArgMatches) -> Result<()>
{
    let path = matches.get_one::<PathBuf>("file").expect("required");
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let inspection = decoder::inspect(BufReader::with_capacity(MEBIBYTE, file))
        .with_context(|| format!("decoding {}", path.display()))?;

    println!("records:          {}", inspection.records);
    println!("neighbor ids:     {}", inspection.neighbors);
    println!("max degree:       {}", inspection.max_degree);
    println!("max node id:      {}", inspection.max_node);
    println!("max neighbor id:  {}", inspection.max_neighbor);
    println!("degree ordered:   {}", inspection.degree_ordered);
    println!("neighbors sorted: {}", inspection.neighbors_sorted);

    if !inspection.is_well_formed() {
        bail!("{} violates the record ordering", path.display());
    }
    Ok(())
}
