use std::path::PathBuf;

use anyhow::bail;
use anyhow::Result;
use clap::Parser;
use clap::ValueEnum;
use portfolio_frontier::io::load_instrument;
use portfolio_frontier::io::write_samples;
use portfolio_frontier::portfolio::minimum_risk;
use portfolio_frontier::portfolio::PortfolioSample;
use portfolio_frontier::portfolio::SimplexSampling;
use portfolio_frontier::stats::CovarianceWindow;
use portfolio_frontier::Pipeline;
use portfolio_frontier::PipelineConfig;
use prettytable::row;
use prettytable::Table;
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Upper bound on samples per run, to bound memory.
const MAX_SAMPLES: usize = 10_000_000;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WindowChoice {
  Full,
  Trimmed,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SamplingChoice {
  Hundredths,
  StickBreaking,
  Dirichlet,
}

#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Random long-only portfolios with mean-variance risk and return"
)]
struct Args {
  /// Price history CSV per instrument (Date, Symbol, Close, Return+1)
  #[arg(required = true, num_args = 2..)]
  inputs: Vec<PathBuf>,

  /// Number of sampled portfolios
  #[arg(long, short = 'n', default_value_t = 100)]
  samples: usize,

  /// RNG seed; drawn at random when omitted
  #[arg(long)]
  seed: Option<u64>,

  /// Window of each series used for covariance
  #[arg(long, value_enum, default_value_t = WindowChoice::Full)]
  covariance_window: WindowChoice,

  /// Weight sampling scheme
  #[arg(long, value_enum, default_value_t = SamplingChoice::Hundredths)]
  sampling: SamplingChoice,

  /// Write the sample table to this CSV file
  #[arg(long, short = 'o')]
  output: Option<PathBuf>,
}

fn main() -> Result<()> {
  let env_filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("portfolio_frontier=info,frontier=info"));
  tracing_subscriber::fmt().with_env_filter(env_filter).init();
  let args = Args::parse();

  if args.samples > MAX_SAMPLES {
    bail!("--samples must not exceed {MAX_SAMPLES}");
  }

  let instruments = args
    .inputs
    .iter()
    .map(load_instrument)
    .collect::<Result<Vec<_>>>()?;

  let seed = args.seed.unwrap_or_else(|| rand::rng().random());
  info!(seed, "using seed");

  let pipeline = Pipeline::new(PipelineConfig {
    covariance_window: match args.covariance_window {
      WindowChoice::Full => CovarianceWindow::Full,
      WindowChoice::Trimmed => CovarianceWindow::Trimmed,
    },
    sampling: match args.sampling {
      SamplingChoice::Hundredths => SimplexSampling::Hundredths,
      SamplingChoice::StickBreaking => SimplexSampling::StickBreaking,
      SamplingChoice::Dirichlet => SimplexSampling::FlatDirichlet,
    },
    ..Default::default()
  });
  let output = pipeline.run(&instruments, args.samples, seed)?;

  let mut stats = Table::new();
  stats.set_titles(row!["symbol", "geometric mean return", "variance"]);
  for s in &output.stats {
    stats.add_row(row![
      s.symbol,
      format!("{:.6}", s.geometric_mean_return),
      format!("{:.8}", s.variance)
    ]);
  }
  stats.printstd();

  let symbols = output.symbols();
  let mut covs = Table::new();
  covs.set_titles(row!["pair", "covariance"]);
  for p in &output.covariances {
    covs.add_row(row![
      format!("{} / {}", symbols[p.first], symbols[p.second]),
      format!("{:.8}", p.covariance)
    ]);
  }
  covs.printstd();

  let frontier = output.frontier();
  let mut table = Table::new();
  table.set_titles(row!["weights", "risk", "volatility", "return"]);
  for s in &frontier {
    table.add_row(sample_row(s));
  }
  table.printstd();

  if let Some(best) = minimum_risk(&output.samples) {
    info!(
      risk = best.risk,
      expected_return = best.expected_return,
      weights = ?best.weights.to_vec(),
      "minimum-risk sample"
    );
  }
  info!(
    samples = output.samples.len(),
    frontier = frontier.len(),
    "done"
  );

  if let Some(path) = &args.output {
    write_samples(path, &output.stats, &output.samples)?;
    info!(path = %path.display(), "wrote samples");
  }

  Ok(())
}

fn sample_row(s: &PortfolioSample) -> prettytable::Row {
  let weights = s
    .weights
    .iter()
    .map(|w| format!("{w:.2}"))
    .collect::<Vec<_>>()
    .join(" / ");
  row![
    weights,
    format!("{:.8}", s.risk),
    format!("{:.6}", s.volatility()),
    format!("{:.6}", s.expected_return)
  ]
}
