//! Per-trial records, descriptive statistics and CSV export for experiment runs.

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// One heuristic's result on one board. Serialized as one CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialRecord {
    #[serde(rename = "Trial")]
    pub trial: usize,
    #[serde(rename = "Heuristic")]
    pub heuristic: String,
    #[serde(rename = "Solved")]
    pub solved: bool,
    #[serde(rename = "ExecutionTime (ms)")]
    pub execution_time_ms: f64,
    /// Estimated peak memory of the search structures.
    #[serde(rename = "Memory (bytes)")]
    pub memory_bytes: usize,
    #[serde(rename = "NodesExpanded")]
    pub nodes_expanded: usize,
    /// Empty when the search did not reach the goal.
    #[serde(rename = "SolutionDepth")]
    pub solution_depth: Option<u32>,
    #[serde(rename = "EBF")]
    pub effective_branching_factor: f64,
}

/// Effective branching factor as `expanded^(1/depth)`; `0.0` for a zero-depth solution.
///
/// # Examples
/// ```
/// use npuzzle_solver::report::effective_branching_factor;
/// assert!((effective_branching_factor(8, 3) - 2.0).abs() < 1e-9);
/// assert_eq!(effective_branching_factor(5, 0), 0.0);
/// ```
pub fn effective_branching_factor(nodes_expanded: usize, depth: u32) -> f64 {
    if depth == 0 {
        0.0
    } else {
        (nodes_expanded as f64).powf(1.0 / depth as f64)
    }
}

/// Mean and population standard deviation of a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl Summary {
    /// Summarizes `values`. An empty sample yields all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Summary::default();
        }
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        Summary {
            count,
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

/// Aggregated statistics of all trials run under one heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicSummary {
    pub heuristic: String,
    pub trials: usize,
    pub solved: usize,
    pub total_time_ms: f64,
    pub execution_time_ms: Summary,
    pub memory_bytes: Summary,
    pub nodes_expanded: Summary,
    /// Over solved trials only.
    pub solution_depth: Summary,
    /// Over solved trials only.
    pub effective_branching_factor: Summary,
}

/// Groups `records` by heuristic, in order of first appearance, and summarizes each group.
pub fn summarize(records: &[TrialRecord]) -> Vec<HeuristicSummary> {
    let mut names: Vec<&str> = Vec::new();
    for record in records {
        if !names.contains(&record.heuristic.as_str()) {
            names.push(&record.heuristic);
        }
    }

    names
        .into_iter()
        .map(|name| {
            let group: Vec<&TrialRecord> =
                records.iter().filter(|r| r.heuristic == name).collect();
            let solved: Vec<&TrialRecord> =
                group.iter().copied().filter(|r| r.solved).collect();

            let times: Vec<f64> = group.iter().map(|r| r.execution_time_ms).collect();
            let memory: Vec<f64> = group.iter().map(|r| r.memory_bytes as f64).collect();
            let nodes: Vec<f64> = group.iter().map(|r| r.nodes_expanded as f64).collect();
            let depths: Vec<f64> = solved
                .iter()
                .filter_map(|r| r.solution_depth)
                .map(f64::from)
                .collect();
            let ebfs: Vec<f64> = solved.iter().map(|r| r.effective_branching_factor).collect();

            HeuristicSummary {
                heuristic: name.to_string(),
                trials: group.len(),
                solved: solved.len(),
                total_time_ms: times.iter().sum(),
                execution_time_ms: Summary::from_values(&times),
                memory_bytes: Summary::from_values(&memory),
                nodes_expanded: Summary::from_values(&nodes),
                solution_depth: Summary::from_values(&depths),
                effective_branching_factor: Summary::from_values(&ebfs),
            }
        })
        .collect()
}

/// Writes `records` to `path` as CSV with a header row, replacing any existing file.
pub fn write_csv(path: &Path, records: &[TrialRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|source| Error::Io {
        operation: format!("flush {}", path.display()),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(trial: usize, heuristic: &str, time: f64, nodes: usize, depth: Option<u32>) -> TrialRecord {
        TrialRecord {
            trial,
            heuristic: heuristic.to_string(),
            solved: depth.is_some(),
            execution_time_ms: time,
            memory_bytes: nodes * 100,
            nodes_expanded: nodes,
            solution_depth: depth,
            effective_branching_factor: depth
                .map(|d| effective_branching_factor(nodes, d))
                .unwrap_or(0.0),
        }
    }

    #[test]
    fn test_summary_mean_and_population_std_dev() {
        let summary = Summary::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(summary.count, 8);
        assert!((summary.mean - 5.0).abs() < 1e-12);
        assert!((summary.std_dev - 2.0).abs() < 1e-12);

        assert_eq!(Summary::from_values(&[]), Summary::default());
    }

    #[test]
    fn test_effective_branching_factor() {
        assert!((effective_branching_factor(27, 3) - 3.0).abs() < 1e-9);
        assert_eq!(effective_branching_factor(1, 5), 1.0);
        assert_eq!(effective_branching_factor(100, 0), 0.0);
    }

    #[test]
    fn test_summarize_groups_by_heuristic_in_order() {
        let records = vec![
            record(0, "Hamming", 2.0, 40, Some(4)),
            record(0, "Manhattan", 1.0, 10, Some(4)),
            record(1, "Hamming", 4.0, 60, Some(6)),
            record(1, "Manhattan", 3.0, 20, None),
        ];
        let summaries = summarize(&records);
        assert_eq!(summaries.len(), 2);

        let hamming = &summaries[0];
        assert_eq!(hamming.heuristic, "Hamming");
        assert_eq!(hamming.trials, 2);
        assert_eq!(hamming.solved, 2);
        assert_eq!(hamming.total_time_ms, 6.0);
        assert_eq!(hamming.nodes_expanded.mean, 50.0);
        assert_eq!(hamming.memory_bytes.mean, 5000.0);
        assert_eq!(hamming.memory_bytes.std_dev, 1000.0);
        assert_eq!(hamming.solution_depth.mean, 5.0);

        let manhattan = &summaries[1];
        assert_eq!(manhattan.heuristic, "Manhattan");
        assert_eq!(manhattan.solved, 1);
        assert_eq!(manhattan.nodes_expanded.mean, 15.0);
        assert_eq!(manhattan.memory_bytes.mean, 1500.0);
        assert_eq!(manhattan.solution_depth.count, 1);
        assert_eq!(manhattan.solution_depth.mean, 4.0);
    }

    #[test]
    fn test_write_csv_writes_header_and_rows() {
        let path = std::env::temp_dir().join(format!(
            "npuzzle_report_test_{}.csv",
            std::process::id()
        ));
        let records = vec![
            record(0, "Hamming", 1.5, 8, Some(1)),
            record(0, "Manhattan", 0.5, 2, None),
        ];
        write_csv(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "Trial,Heuristic,Solved,ExecutionTime (ms),Memory (bytes),NodesExpanded,SolutionDepth,EBF"
        );
        assert_eq!(lines[1], "0,Hamming,true,1.5,800,8,1,8.0");
        assert_eq!(lines[2], "0,Manhattan,false,0.5,200,2,,0.0");
        assert_eq!(lines.len(), 3);
    }
}
