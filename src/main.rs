//! yeastwig CLI entry point
//!
//! Telomere, centromere and summit-relative signal extraction for yeast
//! wiggle tracks.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use yeastwig::core::{
    self, AnchorTable, EvaluationGrid, GenomeLayout, GenomeTrackSet, SmoothInput,
    SmoothingStrategy, SummitOptions, DEFAULT_BANDWIDTH, DEFAULT_CENTROMERE_WINDOW,
    DEFAULT_SUMMIT_WINDOW, DEFAULT_TELOMERE_WINDOW,
};
use yeastwig::formats;

/// Smoothing method (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum SmoothMethodArg {
    /// Mean over non-overlapping windows of `bandwidth` bp
    #[default]
    #[value(name = "window")]
    Window,
    /// Gaussian kernel regression
    #[value(name = "kernel")]
    Kernel,
}

#[derive(Parser)]
#[command(name = "yeastwig")]
#[command(about = "Anchor-relative signal extraction for yeast wiggle tracks")]
#[command(version)]
struct Cli {
    /// Number of threads for per-chromosome work (0 = all CPUs)
    #[arg(short = 't', long, global = true, default_value = "0")]
    threads: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the detected genome scheme and chromosome labels
    Scheme {
        /// Wiggle/bedGraph/BigWig file, or directory of per-chromosome files
        input: PathBuf,
    },
    /// Signal flanking both telomeres of every chromosome
    Telomeres {
        /// Wiggle/bedGraph/BigWig file, or directory of per-chromosome files
        input: PathBuf,
        /// Output file (stdout if not specified)
        output: Option<PathBuf>,
        /// Distance from each chromosome end to include (bp)
        #[arg(short = 'l', long, default_value_t = DEFAULT_TELOMERE_WINDOW)]
        length: u64,
        /// Write small/large chromosome averages instead of per-arm profiles
        #[arg(long)]
        summary: bool,
        /// Anchor table overriding the bundled coordinates
        #[arg(long)]
        anchors: Option<PathBuf>,
    },
    /// Signal around every centromere, averaged across chromosomes
    Centromeres {
        /// Wiggle/bedGraph/BigWig file, or directory of per-chromosome files
        input: PathBuf,
        /// Output file (stdout if not specified)
        output: Option<PathBuf>,
        /// Half-window around each centromere midpoint (bp)
        #[arg(short = 'w', long, default_value_t = DEFAULT_CENTROMERE_WINDOW)]
        window: u64,
        /// Drop chromosomes whose window runs past the track
        #[arg(long)]
        only_complete: bool,
        /// Write per-chromosome profiles instead of the average
        #[arg(long)]
        raw: bool,
        /// Anchor table overriding the bundled coordinates
        #[arg(long)]
        anchors: Option<PathBuf>,
    },
    /// Signal around anchors from a BED or `chrom position` file, averaged
    Summits {
        /// Wiggle/bedGraph/BigWig file, or directory of per-chromosome files
        input: PathBuf,
        /// Anchor list
        summits: PathBuf,
        /// Output file (stdout if not specified)
        output: Option<PathBuf>,
        /// Half-window around each anchor (bp)
        #[arg(short = 'w', long, default_value_t = DEFAULT_SUMMIT_WINDOW)]
        window: u64,
        /// Drop anchors whose window runs past the track
        #[arg(long)]
        only_complete: bool,
        /// Write per-anchor profiles instead of the average
        #[arg(long)]
        raw: bool,
    },
    /// Genome-wide and per-chromosome mean signal
    GenomeAverage {
        /// Wiggle/bedGraph/BigWig file, or directory of per-chromosome files
        input: PathBuf,
        /// Output file (stdout if not specified)
        output: Option<PathBuf>,
    },
    /// Smooth one chromosome or the whole genome
    Smooth {
        /// Wiggle/bedGraph/BigWig file, or directory of per-chromosome files
        input: PathBuf,
        /// Output file (stdout if not specified)
        output: Option<PathBuf>,
        /// Smoothing method
        #[arg(short = 'm', long, default_value = "window")]
        method: SmoothMethodArg,
        /// Window width or kernel bandwidth (bp)
        #[arg(short = 'b', long, default_value_t = DEFAULT_BANDWIDTH)]
        bandwidth: u64,
        /// Chromosome to smooth, in either naming scheme (all if not specified)
        #[arg(short = 'c', long)]
        chrom: Option<String>,
        /// Evaluate the kernel every `step` bp instead of at input positions
        #[arg(long)]
        step: Option<u64>,
    },
}

fn load_tracks(input: &Path) -> anyhow::Result<(GenomeTrackSet, GenomeLayout)> {
    let start = Instant::now();
    eprintln!("Loading tracks: {:?}", input);

    let (tracks, stats) = formats::read_tracks(input)
        .with_context(|| format!("Failed to read tracks from {:?}", input))?;
    if stats.failed > 0 {
        eprintln!("Skipped {} malformed line(s)", stats.failed);
    }
    let layout = core::detect_scheme(&tracks)?;

    eprintln!(
        "Loaded {} points ({} genome) in {:.2}s",
        stats.loaded,
        layout.scheme,
        start.elapsed().as_secs_f64()
    );
    Ok((tracks, layout))
}

fn load_anchors(path: Option<&PathBuf>, layout: &GenomeLayout) -> anyhow::Result<AnchorTable> {
    match path {
        Some(path) => {
            let reader = core::open_input(path)
                .with_context(|| format!("Failed to open anchor table {:?}", path))?;
            let table = AnchorTable::from_reader(layout.scheme, reader)?;
            eprintln!("Using anchor table {:?}", path);
            Ok(table)
        }
        None => Ok(AnchorTable::bundled(layout.scheme).clone()),
    }
}

fn open_output(output: Option<&PathBuf>) -> anyhow::Result<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    Ok(BufWriter::with_capacity(core::DEFAULT_BUFFER_SIZE, sink))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
        .context("Failed to create thread pool")?;

    match cli.command {
        Commands::Scheme { input } => {
            let (_, layout) = load_tracks(&input)?;
            println!("scheme\t{}", layout.scheme);
            for entry in &layout.chromosomes {
                println!(
                    "{}\t{}\t{}",
                    entry.name,
                    entry.label,
                    entry.size_class.as_str()
                );
            }
        }

        Commands::Telomeres { input, output, length, summary, anchors } => {
            let (tracks, layout) = load_tracks(&input)?;
            let anchors = load_anchors(anchors.as_ref(), &layout)?;
            let profiles = core::signal_from_telomeres(&tracks, &layout, &anchors, length)?;

            let mut out = open_output(output.as_ref())?;
            if summary {
                let summary = core::telomere_summary(&profiles)?;
                formats::write_aggregated(&mut out, &summary.small, Some("small"))?;
                formats::append_aggregated(&mut out, &summary.large, Some("large"))?;
            } else {
                formats::write_region_profiles(&mut out, &profiles)?;
            }
            out.flush()?;

            eprintln!("\n=== Telomere Statistics ===");
            eprintln!("Profiles:        {}", profiles.len());
            eprintln!("Window:          {} bp", length);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Centromeres { input, output, window, only_complete, raw, anchors } => {
            let (tracks, layout) = load_tracks(&input)?;
            let anchors = load_anchors(anchors.as_ref(), &layout)?;
            let options = SummitOptions { window, only_complete };
            let (profiles, stats) =
                core::signal_at_centromeres(&tracks, &layout, &anchors, &options)?;

            let mut out = open_output(output.as_ref())?;
            if raw {
                formats::write_region_profiles(&mut out, &profiles)?;
            } else {
                let average = core::signal_average(&profiles, false)?;
                formats::write_aggregated(&mut out, &average, None)?;
            }
            out.flush()?;

            eprintln!("\n=== Centromere Statistics ===");
            eprintln!("Chromosomes:     {}", stats.total);
            eprintln!("Extracted:       {}", stats.extracted);
            eprintln!("Incomplete:      {}", stats.skipped);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Summits { input, summits, output, window, only_complete, raw } => {
            let (tracks, layout) = load_tracks(&input)?;
            let reader = core::open_input(&summits)
                .with_context(|| format!("Failed to open anchor list {:?}", summits))?;
            let anchors = formats::read_summits(reader)?;
            let options = SummitOptions { window, only_complete };
            let (profiles, stats) = core::signal_at_summit(&tracks, &layout, &anchors, &options)?;

            let mut out = open_output(output.as_ref())?;
            if raw {
                formats::write_region_profiles(&mut out, &profiles)?;
            } else {
                let average = core::signal_average(&profiles, false)?;
                formats::write_aggregated(&mut out, &average, None)?;
            }
            out.flush()?;

            eprintln!("\n=== Summit Statistics ===");
            eprintln!("Anchors:         {}", stats.total);
            eprintln!("Extracted:       {}", stats.extracted);
            eprintln!("Incomplete:      {}", stats.skipped);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::GenomeAverage { input, output } => {
            let (tracks, layout) = load_tracks(&input)?;
            let average = core::genome_average(&tracks, &layout)?;
            let per_chrom = core::chromosome_averages(&tracks, &layout)?;
            let observations: usize = per_chrom.iter().map(|c| c.n_observations).sum();

            let mut out = open_output(output.as_ref())?;
            formats::write_chromosome_averages(&mut out, &per_chrom)?;
            writeln!(out, "genome\t{}\t{}", average, observations)?;
            out.flush()?;

            eprintln!("Genome average:  {}", average);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Smooth { input, output, method, bandwidth, chrom, step } => {
            let (tracks, layout) = load_tracks(&input)?;
            let strategy = match method {
                SmoothMethodArg::Window => SmoothingStrategy::SlidingWindow { bandwidth },
                SmoothMethodArg::Kernel => SmoothingStrategy::Kernel {
                    bandwidth,
                    grid: step.map_or(EvaluationGrid::Original, |step| {
                        EvaluationGrid::Regular { step }
                    }),
                },
            };

            let smoothed = match chrom {
                Some(chrom) => {
                    let entry = layout
                        .find(&chrom)
                        .with_context(|| format!("Unknown chromosome {}", chrom))?;
                    let input = SmoothInput::Genome {
                        set: &tracks,
                        layout: &layout,
                        chromosome: entry.index,
                    };
                    vec![(entry.name.clone(), core::smooth(input, &strategy)?)]
                }
                None => core::smooth_genome(&tracks, &layout, &strategy)?,
            };

            let mut out = open_output(output.as_ref())?;
            formats::write_smoothed(&mut out, &smoothed)?;
            out.flush()?;

            let rows: usize = smoothed.iter().map(|(_, t)| t.len()).sum();
            let unsupported: usize = smoothed.iter().map(|(_, t)| t.unsupported.len()).sum();
            eprintln!("\n=== Smoothing Statistics ===");
            eprintln!("Chromosomes:     {}", smoothed.len());
            eprintln!("Rows:            {}", rows);
            eprintln!("Unsupported:     {}", unsupported);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
