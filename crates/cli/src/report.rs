use anyhow::{Context, Result};
use polyoracle::api::{Answer, Limit, OracleData, OracleStats, Polytope, Unbounded};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct Stats {
    pub calls: u64,
    pub iterations: u64,
    pub centiseconds: u64,
    pub solver: &'static str,
    pub version: &'static str,
}

impl Stats {
    pub fn new(stats: OracleStats, solver: &'static str) -> Self {
        Self {
            calls: stats.calls,
            iterations: stats.iterations,
            centiseconds: stats.centiseconds,
            solver,
            version: polyoracle::VERSION,
        }
    }
}

/// Output of `check`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub source: String,
    pub direction: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub objs: usize,
    pub interior: Vec<f64>,
    pub comments: Vec<String>,
    pub consistency: &'static str,
    pub stats: Stats,
}

impl CheckReport {
    pub fn new(source: String, polytope: &Polytope, consistency: &'static str, stats: Stats) -> Self {
        Self {
            source,
            direction: match polytope.direction {
                polyoracle::api::Direction::Min => "min",
                polyoracle::api::Direction::Max => "max",
            },
            rows: polytope.rows,
            cols: polytope.cols,
            objs: polytope.objs,
            interior: polytope.interior.iter().copied().collect(),
            comments: polytope.comments.clone(),
            consistency,
            stats,
        }
    }
}

/// One answered query.
#[derive(Debug, PartialEq, Serialize)]
pub struct QueryRecord {
    pub vertex: Vec<f64>,
    pub answer: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<Vec<f64>>,
}

impl QueryRecord {
    pub fn new(data: &OracleData, answer: Answer) -> Self {
        let vertex = data.vertex.iter().copied().collect();
        let (answer, reason, facet) = match answer {
            Answer::Facet => ("facet", None, Some(data.facet.iter().copied().collect())),
            Answer::Unbounded(Unbounded::RayNeverExits) => {
                ("unbounded", Some("ray-never-exits"), None)
            }
            Answer::Unbounded(Unbounded::PointInside) => ("unbounded", Some("point-inside"), None),
            Answer::LimitReached(Limit::Iterations) => ("limit", Some("iterations"), None),
            Answer::LimitReached(Limit::Time) => ("limit", Some("time"), None),
        };
        Self {
            vertex,
            answer,
            reason,
            facet,
        }
    }
}

/// Output of `query`.
#[derive(Debug, Serialize)]
pub struct QueryReport {
    pub source: String,
    pub queries: Vec<QueryRecord>,
    pub stats: Stats,
}

/// Pretty JSON to `out`, or to stdout when `out` is `None`.
pub fn emit<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        None => println!("{json}"),
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating output dir {}", parent.display()))?;
                }
            }
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        }
    }
    Ok(())
}
