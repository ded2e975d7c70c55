//! Persistent run reports - `~/.curlprobe/reports/`
//!
//! Every `curlprobe run` that reaches its target is saved regardless of
//! `--output` mode unless `--no-save` is given.
//! Directory layout: `{host_port}_{timestamp}/`

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use curlprobe_core::{Config, RunResult, Verdict, to_curl_command, url_scheme};

/// Everything needed to persist one run.
pub struct ReportData<'a> {
    pub config: &'a Config,
    pub result: &'a RunResult,
    pub target: &'a str,
    pub duration_secs: f64,
}

/// Save under the user's report directory.
///
/// Returns the report directory path on success.
pub fn save_report(data: &ReportData) -> Result<PathBuf, std::io::Error> {
    save_report_in(&report_base_dir()?, data)
}

/// Save under `base/{host_port}_{timestamp}/`.
pub fn save_report_in(base: &Path, data: &ReportData) -> Result<PathBuf, std::io::Error> {
    let report_dir = base.join(build_dir_name(data.target));
    std::fs::create_dir_all(&report_dir)?;

    let config_toml =
        toml::to_string_pretty(data.config).map_err(|e| std::io::Error::other(e.to_string()))?;
    std::fs::write(report_dir.join("config.toml"), config_toml)?;

    let summary = serde_json::json!({
        "target": data.target,
        "summary": data.result.summary,
        "meta": {
            "timestamp": timestamp_iso(),
            "duration_secs": data.duration_secs,
        },
    });
    write_json(&report_dir.join("summary.json"), &summary)?;
    let verdicts = serde_json::to_value(&data.result.verdicts).map_err(std::io::Error::other)?;
    write_json(&report_dir.join("verdicts.json"), &verdicts)?;

    let failures: Vec<&Verdict> = data.result.failures().collect();
    if !failures.is_empty() {
        std::fs::write(
            report_dir.join("reproductions.sh"),
            reproduction_script(&failures),
        )?;
    }

    Ok(report_dir)
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<(), std::io::Error> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    std::fs::write(path, text)
}

/// Shell script replaying every failed case, one commented block each.
fn reproduction_script(failures: &[&Verdict]) -> String {
    let mut script = String::from("#!/bin/sh\n");
    for v in failures {
        script.push_str(&format!(
            "\n# {} - {} (expected {}, got {})\n{}\n",
            v.case.category,
            v.case.description,
            v.case.expected_result,
            v.outcome.status,
            to_curl_command(&v.case.request)
        ));
    }
    script
}

fn report_base_dir() -> Result<PathBuf, std::io::Error> {
    let home = std::env::var("HOME")
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::NotFound, "HOME not set"))?;
    Ok(PathBuf::from(home).join(".curlprobe").join("reports"))
}

fn build_dir_name(target: &str) -> String {
    format!("{}_{}", host_port(target), timestamp_compact())
}

/// `"http://localhost:8080/objects"` -> `"localhost_8080"`
fn host_port(url: &str) -> String {
    let rest = url_scheme(url).map_or(url, |scheme| &url[scheme.len() + 3..]);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if authority.is_empty() {
        "unknown".to_string()
    } else {
        authority.replace(':', "_")
    }
}

/// `20261019T093000`
fn timestamp_compact() -> String {
    let (y, mo, d, h, mi, s) = utc_now();
    format!("{y:04}{mo:02}{d:02}T{h:02}{mi:02}{s:02}")
}

/// `2026-10-19T09:30:00Z`
fn timestamp_iso() -> String {
    let (y, mo, d, h, mi, s) = utc_now();
    format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}Z")
}

fn utc_now() -> (i64, u64, u64, u64, u64, u64) {
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let tod = secs % 86_400;
    let (y, m, d) = civil_from_days(secs / 86_400);
    (y, m, d, tod / 3600, (tod % 3600) / 60, tod % 60)
}

/// Days since 1970-01-01 to a proleptic Gregorian date.
///
/// Howard Hinnant's algorithm, restricted to non-negative day counts.
fn civil_from_days(days: u64) -> (i64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = (yoe + era * 400) as i64 + i64::from(m <= 2);
    (y, m, d)
}
