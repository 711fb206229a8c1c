use anyhow::Context;
use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

use pvalplot::bounded::{DEFAULT_MAXIMUM, DEFAULT_MINIMUM};
use pvalplot::plot::{self, MIN_HEIGHT, MIN_WIDTH, PlotOptions};
use pvalplot::stats::Stats;
use pvalplot::{BoundedKde, Strategy, parsing};

#[derive(Parser)]
#[command(about = "Checks whether p-values look uniformly distributed", version)]
struct Args {
    /// Input file (stdin if not specified)
    input: Option<std::path::PathBuf>,

    /// Boundary correction for the density estimate
    #[arg(short, long, value_enum, default_value_t = Strategy::Reflect)]
    strategy: Strategy,

    /// Lower bound for the logit strategy
    #[arg(long, default_value_t = DEFAULT_MINIMUM, allow_negative_numbers = true)]
    min: f64,

    /// Upper bound for the logit strategy
    #[arg(long, default_value_t = DEFAULT_MAXIMUM, allow_negative_numbers = true)]
    max: f64,

    /// Number of grid points for density curves
    #[arg(short = 'n', long, default_value_t = 500)]
    points: usize,

    /// Chart width in terminal dots
    #[arg(long, default_value_t = 160, value_parser = clap::value_parser!(u32).range(MIN_WIDTH as i64..))]
    width: u32,

    /// Chart height in terminal dots
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u32).range(MIN_HEIGHT as i64..))]
    height: u32,

    /// Hide the per-value marks under the density curve
    #[arg(long)]
    no_data: bool,

    /// Skip the Q-Q chart
    #[arg(long)]
    no_qq: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let data = match &args.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("error opening {}", path.display()))?;
            parsing::read_file_mmap(&file)
                .with_context(|| format!("error reading {}", path.display()))?
        }
        None => parsing::read_reader(io::stdin().lock()).context("error reading stdin")?,
    };

    if data.is_empty() {
        eprintln!("no input");
        return Ok(());
    }

    let kde = BoundedKde::build(args.strategy, &data, args.min, args.max)
        .context("error building density estimate")?;

    let options = PlotOptions {
        width: args.width,
        height: args.height,
        points: args.points,
        show_data: !args.no_data,
    };

    let stats = Stats::new(data);
    print_stats_table(&stats);
    println!();
    plot::plot_pvalues(&stats.data, &kde, &options)?;

    if !args.no_qq {
        println!();
        plot::plot_quantiles(&stats.data, &options);
    }

    Ok(())
}

fn print_stats_table(stats: &Stats) {
    let left_items = [
        ("n", stats.n.to_string()),
        ("mean", format!("{:.4}", stats.mean)),
        ("std dev", format!("{:.4}", stats.std_dev)),
        ("KS D", format!("{:.4}", stats.ks_statistic())),
        ("<= 0.01", format!("{:.4}", stats.fraction_below(0.01))),
        ("<= 0.05", format!("{:.4}", stats.fraction_below(0.05))),
        ("<= 0.10", format!("{:.4}", stats.fraction_below(0.10))),
    ];

    let percentiles = [
        (0.0, "min"),
        (0.05, "5%ile"),
        (0.25, "25%ile"),
        (0.50, "median"),
        (0.75, "75%ile"),
        (0.95, "95%ile"),
        (1.0, "max"),
    ];

    let right_items: Vec<(&str, String)> = percentiles
        .iter()
        .map(|(q, label)| (*label, format!("{:.4}", stats.quantile(*q))))
        .collect();

    let max_rows = left_items.len().max(right_items.len());

    for i in 0..max_rows {
        if let Some((label, value)) = left_items.get(i) {
            print!("{:>8}  {:<20}", label, value);
        } else {
            print!("{:30}", "");
        }

        if let Some((label, value)) = right_items.get(i) {
            println!("{:>8}  {}", label, value);
        } else {
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["pvalplot"]).unwrap();
        assert_eq!(args.strategy, Strategy::Reflect);
        assert_eq!(args.width, 160);
        assert_eq!(args.height, 40);
        assert_eq!(args.points, 500);
    }

    #[test]
    fn test_args_rejects_narrow_width() {
        assert!(Args::try_parse_from(["pvalplot", "--width", "10"]).is_err());
        assert!(Args::try_parse_from(["pvalplot", "--width", "32"]).is_ok());
    }

    #[test]
    fn test_args_rejects_short_height() {
        assert!(Args::try_parse_from(["pvalplot", "--height", "2"]).is_err());
        assert!(Args::try_parse_from(["pvalplot", "--height", "3"]).is_ok());
    }

    #[test]
    fn test_args_logit_bounds() {
        let args =
            Args::try_parse_from(["pvalplot", "-s", "logit", "--min", "-1", "--max", "1"]).unwrap();
        assert_eq!(args.strategy, Strategy::Logit);
        assert_eq!((args.min, args.max), (-1.0, 1.0));
    }
}
