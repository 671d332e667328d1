use anyhow::{Context, Result};
use bondtwist::api::{
    build_graph, diamond, jittered, BondRecord, BondTwistEngine, BondTwists, GridPairs,
    NeighborPolicy, TwistEvent, TwistObserver, TwistSummary, ICE_IC_LATTICE_NM,
};
use bondtwist::cfg::DEFAULT_K;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod frame_io;
mod provenance;
mod table;

#[derive(Parser)]
#[command(name = "bondtwist")]
#[command(about = "Bond-twist order parameters of periodic four-coordinated networks")]
struct Cmd {
    /// Log per-angle diagnostics (debug level)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyKind {
    Explicit,
    Proximity,
    Mutual,
}

#[derive(Subcommand)]
enum Action {
    /// Evaluate every bond of a JSON frame and write a CSV or Parquet table
    Run {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum)]
        policy: PolicyKind,
        /// Neighbor search radius (proximity and mutual)
        #[arg(long)]
        cutoff: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_K)]
        k: usize,
        /// Bond radius for proximity edges; defaults to the cutoff
        #[arg(long)]
        bond_cutoff: Option<f64>,
        #[arg(long)]
        parallel: bool,
        /// Also write rows for bonds without an order parameter
        #[arg(long)]
        keep_skipped: bool,
        #[arg(long)]
        out: PathBuf,
    },
    /// Write an ice Ic (diamond) frame with explicit bonds
    Lattice {
        #[arg(long)]
        reps: usize,
        #[arg(long, default_value_t = ICE_IC_LATTICE_NM)]
        lattice_constant: f64,
        /// Per-component Cartesian jitter amplitude
        #[arg(long, default_value_t = 0.0)]
        jitter: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Run {
            input,
            policy,
            cutoff,
            k,
            bond_cutoff,
            parallel,
            keep_skipped,
            out,
        } => {
            let policy = policy_from(policy, cutoff, k, bond_cutoff)?;
            run(&input, policy, parallel, keep_skipped, &out)
        }
        Action::Lattice {
            reps,
            lattice_constant,
            jitter,
            seed,
            out,
        } => lattice(reps, lattice_constant, jitter, seed, &out),
        Action::Report => report(),
    }
}

fn policy_from(
    kind: PolicyKind,
    cutoff: Option<f64>,
    k: usize,
    bond_cutoff: Option<f64>,
) -> Result<NeighborPolicy> {
    let need_cutoff = || cutoff.context("--cutoff is required for proximity policies");
    Ok(match kind {
        PolicyKind::Explicit => NeighborPolicy::Explicit,
        PolicyKind::Proximity => NeighborPolicy::ProximityK {
            cutoff: need_cutoff()?,
            k,
            bond_cutoff,
        },
        PolicyKind::Mutual => NeighborPolicy::MutualNearest {
            cutoff: need_cutoff()?,
            k,
        },
    })
}

/// Routes engine diagnostics into the log.
struct TracingObserver;

impl TwistObserver for TracingObserver {
    fn observe(&self, event: &TwistEvent) {
        match *event {
            TwistEvent::NearThirtyDegrees {
                a,
                b,
                i,
                j,
                degrees,
                cosine,
                chord,
                dist_ai,
                dist_ab,
                dist_bj,
            } => tracing::debug!(
                a,
                b,
                i,
                j,
                degrees,
                cosine,
                chord,
                dist_ai,
                dist_ab,
                dist_bj,
                "near_thirty_degrees"
            ),
            TwistEvent::DegenerateProjection { a, b, vertex } => {
                tracing::warn!(a, b, vertex, "degenerate_projection")
            }
        }
    }
}

fn run(
    input: &Path,
    policy: NeighborPolicy,
    parallel: bool,
    keep_skipped: bool,
    out: &Path,
) -> Result<()> {
    tracing::info!(input = %input.display(), policy = policy.name(), parallel, "run");
    let frame = frame_io::read_frame(input)?;
    let graph = build_graph(&frame, policy, &GridPairs).context("building neighbor graph")?;
    let observer = TracingObserver;
    let twists = BondTwists::new(BondTwistEngine::new(&frame, &graph).with_observer(&observer));
    let records: Vec<BondRecord> = if parallel {
        twists.par_collect()?
    } else {
        twists.iter().collect::<Result<_, _>>()?
    };

    let summary = TwistSummary::from_records(&records);
    let mean = summary.mean_value;
    tracing::info!(
        atoms = frame.len(),
        edges = summary.edges,
        measured = summary.measured,
        mean_magnitude = ?summary.mean_magnitude,
        mean_re = ?mean.map(|v| v.re),
        mean_im = ?mean.map(|v| v.im),
        "summary"
    );
    for (reason, count) in &summary.skipped_by_reason {
        tracing::info!(reason = reason.as_str(), count, "skipped");
    }

    let rows: Vec<BondRecord> = records
        .into_iter()
        .filter(|r| keep_skipped || r.outcome.is_applicable())
        .collect();
    let mut df = table::records_frame(&rows)?;
    table::write_table(&mut df, out)?;

    let skipped: serde_json::Map<String, serde_json::Value> = summary
        .skipped_by_reason
        .iter()
        .map(|(reason, count)| (reason.as_str().to_string(), json!(count)))
        .collect();
    let payload = provenance::Payload::new(json!({
        "policy": format!("{policy:?}"),
        "parallel": parallel,
        "keep_skipped": keep_skipped,
    }))
    .with_input(input.to_string_lossy())
    .with_summary(json!({
        "atoms": frame.len(),
        "edges": summary.edges,
        "measured": summary.measured,
        "skipped": skipped,
        "mean_magnitude": summary.mean_magnitude,
        "mean_re": mean.map(|v| v.re),
        "mean_im": mean.map(|v| v.im),
    }));
    let sidecar = provenance::write_sidecar(out, payload)?;
    tracing::info!(out = %out.display(), rows = df.height(), sidecar = %sidecar.display(), "wrote");
    Ok(())
}

fn lattice(reps: usize, lattice_constant: f64, jitter: f64, seed: u64, out: &Path) -> Result<()> {
    tracing::info!(reps, lattice_constant, jitter, seed, "lattice");
    let ideal = diamond(reps, lattice_constant).context("building diamond lattice")?;
    let frame = jittered(&ideal, jitter, seed).context("jittering lattice")?;
    frame_io::write_frame(out, &frame)?;
    provenance::write_sidecar(
        out,
        provenance::Payload::new(json!({
            "reps": reps,
            "lattice_constant": lattice_constant,
            "jitter": jitter,
            "seed": seed,
        })),
    )?;
    tracing::info!(atoms = frame.len(), out = %out.display(), "wrote");
    Ok(())
}

fn report() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&provenance::header())?);
    Ok(())
}
