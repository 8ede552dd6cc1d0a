use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use polyoracle::api::{Consistency, Oracle};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod report;

use report::{CheckReport, QueryRecord, QueryReport, Stats};

#[derive(Parser)]
#[command(name = "polyoracle")]
#[command(about = "Facet separation oracle for VLP polytopes", version)]
struct Cmd {
    /// Oracle configuration (JSON); missing keys keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the JSON report here instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Log debug events from the oracle and the solver
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Load a VLP file and check that its interior point is consistent
    Check { vlp: PathBuf },
    /// Separate points and directions from the polytope
    Query {
        vlp: PathBuf,
        /// Affine point, comma separated
        #[arg(long = "point", allow_hyphen_values = true)]
        points: Vec<String>,
        /// Direction at infinity, comma separated
        #[arg(long = "direction", allow_hyphen_values = true)]
        directions: Vec<String>,
        /// File with homogeneous vertices, one per line
        #[arg(long)]
        queries: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let cfg = input::load_config(cmd.config.as_deref())?;
    match cmd.action {
        Action::Check { vlp } => check(&vlp, cfg, cmd.out.as_deref()),
        Action::Query {
            vlp,
            points,
            directions,
            queries,
        } => {
            let mut vertices = Vec::new();
            for p in &points {
                let mut v = input::parse_coords(p).with_context(|| format!("--point {p}"))?;
                v.push(1.0);
                vertices.push(v);
            }
            for d in &directions {
                let mut v = input::parse_coords(d).with_context(|| format!("--direction {d}"))?;
                v.push(0.0);
                vertices.push(v);
            }
            if let Some(path) = &queries {
                vertices.extend(input::read_queries(path)?);
            }
            if vertices.is_empty() {
                bail!("nothing to ask: pass --point, --direction or --queries");
            }
            query(&vlp, cfg, &vertices, cmd.out.as_deref())
        }
    }
}

fn open_ready(vlp: &Path, cfg: polyoracle::OracleConfig) -> Result<(Oracle, &'static str)> {
    let mut oracle = Oracle::open(vlp, cfg)?;
    tracing::info!(
        vlp = %vlp.display(),
        rows = oracle.polytope().rows,
        cols = oracle.polytope().cols,
        objs = oracle.polytope().objs,
        "loaded"
    );
    let consistency = match oracle.initialize()? {
        Consistency::Ready => "ready",
        Consistency::Empty => "empty",
        Consistency::LimitReached(limit) => {
            tracing::warn!(?limit, "consistency check did not finish");
            "limit"
        }
    };
    Ok((oracle, consistency))
}

fn check(vlp: &Path, cfg: polyoracle::OracleConfig, out: Option<&Path>) -> Result<()> {
    let (oracle, consistency) = open_ready(vlp, cfg)?;
    let stats = Stats::new(oracle.stats(), oracle.solver_version());
    let report = CheckReport::new(
        vlp.display().to_string(),
        oracle.polytope(),
        consistency,
        stats,
    );
    report::emit(&report, out)
}

fn query(
    vlp: &Path,
    cfg: polyoracle::OracleConfig,
    vertices: &[Vec<f64>],
    out: Option<&Path>,
) -> Result<()> {
    let (mut oracle, consistency) = open_ready(vlp, cfg)?;
    if consistency != "ready" {
        bail!("{}: oracle is not ready ({consistency})", vlp.display());
    }
    let mut data = oracle.data();
    let mut records = Vec::with_capacity(vertices.len());
    for v in vertices {
        let (last, coords) = v.split_last().context("empty query vertex")?;
        match *last {
            x if x == 0.0 => data.set_direction(coords),
            x if x == 1.0 => data.set_point(coords),
            _ => bail!("query {v:?}: last coordinate must be 1 (point) or 0 (direction)"),
        }
        let answer = oracle
            .ask(&mut data)
            .with_context(|| format!("query {v:?}"))?;
        records.push(QueryRecord::new(&data, answer));
    }
    let stats = oracle.stats();
    tracing::info!(
        calls = stats.calls,
        iterations = stats.iterations,
        centiseconds = stats.centiseconds,
        "done"
    );
    let report = QueryReport {
        source: vlp.display().to_string(),
        queries: records,
        stats: Stats::new(stats, oracle.solver_version()),
    };
    report::emit(&report, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SQUARE: &str = "\
p vlp min 4 2 0 2 0
i 1 d 0 1
i 2 d 0 1
i 3 u 2
i 4 d -1 1
a 1 1 1
a 2 2 1
a 3 1 1
a 3 2 1
a 4 1 1
a 4 2 -1
j 1 f
j 2 f
o 1 1 1
o 2 2 1
x 1 0.5
x 2 0.5
";

    #[test]
    fn check_and_query_write_reports() {
        let dir = tempdir().unwrap();
        let vlp = dir.path().join("square.vlp");
        fs::write(&vlp, SQUARE).unwrap();

        let out = dir.path().join("check.json");
        check(&vlp, Default::default(), Some(&out)).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(parsed["consistency"], "ready");
        assert_eq!(parsed["objs"], 2);

        let out = dir.path().join("query.json");
        let vertices = vec![vec![1.0, 0.0, 0.0], vec![1.0, 0.5, 1.0]];
        query(&vlp, Default::default(), &vertices, Some(&out)).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(parsed["queries"][0]["answer"], "facet");
        assert_eq!(parsed["queries"][1]["reason"], "point-inside");
        assert_eq!(parsed["stats"]["calls"], 3);
    }

    #[test]
    fn malformed_vertices_are_rejected() {
        let dir = tempdir().unwrap();
        let vlp = dir.path().join("square.vlp");
        fs::write(&vlp, SQUARE).unwrap();
        let vertices = vec![vec![1.0, 0.0, 2.0]];
        assert!(query(&vlp, Default::default(), &vertices, None).is_err());
    }
}
