use anyhow::{bail, Context, Result};
use polyoracle::OracleConfig;
use std::fs;
use std::path::Path;

/// Read an `OracleConfig` from a JSON file; missing keys keep their defaults.
pub fn load_config(path: Option<&Path>) -> Result<OracleConfig> {
    let Some(path) = path else {
        return Ok(OracleConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let cfg: OracleConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    if !(cfg.eps.is_finite() && cfg.eps > 0.0) {
        bail!("config {}: eps must be a positive number", path.display());
    }
    Ok(cfg)
}

/// Numbers separated by commas and/or whitespace.
pub fn parse_coords(text: &str) -> Result<Vec<f64>> {
    let coords = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<f64>()
                .with_context(|| format!("not a number: {t:?}"))
        })
        .collect::<Result<Vec<_>>>()?;
    if coords.is_empty() {
        bail!("no coordinates in {text:?}");
    }
    Ok(coords)
}

/// Homogeneous query vertices, one per line; blank lines and `#` comments are skipped.
pub fn read_queries(path: &Path) -> Result<Vec<Vec<f64>>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading queries {}", path.display()))?;
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.split('#').next().unwrap_or("").trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(lineno, line)| {
            parse_coords(line).with_context(|| format!("{}:{lineno}", path.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyoracle::api::Pricing;
    use tempfile::tempdir;

    #[test]
    fn coords_accept_commas_and_blanks() {
        assert_eq!(parse_coords("1,2.5, -3").unwrap(), vec![1.0, 2.5, -3.0]);
        assert_eq!(parse_coords(" 4  5\t6 ").unwrap(), vec![4.0, 5.0, 6.0]);
        assert!(parse_coords("1,x").is_err());
        assert!(parse_coords(" , ").is_err());
    }

    #[test]
    fn missing_config_means_defaults() {
        assert_eq!(load_config(None).unwrap(), OracleConfig::default());
    }

    #[test]
    fn partial_config_overrides_some_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("oracle.json");
        fs::write(
            &path,
            r#"{"shuffle": false, "pricing": "steepest-edge", "eps": 1e-7}"#,
        )
        .unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert!(!cfg.shuffle);
        assert_eq!(cfg.pricing, Pricing::SteepestEdge);
        assert_eq!(cfg.eps, 1e-7);
        assert_eq!(cfg.iteration_limit, OracleConfig::default().iteration_limit);
    }

    #[test]
    fn bad_configs_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"eps": -1}"#).unwrap();
        assert!(load_config(Some(&path)).is_err());
        fs::write(&path, r#"{"method": "barrier"}"#).unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
        assert!(load_config(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn query_file_skips_comments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("q.txt");
        fs::write(&path, "# outward points\n2 2 1\n\n1, 0, 0  # a direction\n").unwrap();
        let queries = read_queries(&path).unwrap();
        assert_eq!(queries, vec![vec![2.0, 2.0, 1.0], vec![1.0, 0.0, 0.0]]);
    }

    #[test]
    fn query_file_errors_carry_the_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("q.txt");
        fs::write(&path, "2 2 1\n2 two 1\n").unwrap();
        let err = read_queries(&path).unwrap_err();
        assert!(format!("{err:#}").contains("q.txt:2"));
    }
}
