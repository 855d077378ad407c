//! TCL emission for a Synopsys-DC-style synthesis tool.
//!
//! Section order is fixed because the tool executes directives top to
//! bottom: library setup, then source reads + top module, then the clock,
//! then switching-activity annotations, then case-analysis pins.
//!
//! `render` is a pure function of the accumulated state: identical configs
//! produce byte-identical scripts (callers diff and cache them), so nothing
//! time- or environment-dependent goes into the output.

use crate::Result;
use crate::config::JobConfig;
use anyhow::{Context, bail};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve last-write-wins over the switching declarations: a signal named
/// by several records is kept only in the last record naming it. Returns
/// per-record surviving signal lists; emptied records are dropped later.
fn surviving_switching(cfg: &JobConfig) -> Vec<(usize, Vec<&str>)> {
    let mut last: BTreeMap<&str, usize> = BTreeMap::new();
    for (i, sw) in cfg.switching.iter().enumerate() {
        for signal in &sw.signals {
            last.insert(signal.as_str(), i);
        }
    }

    cfg.switching
        .iter()
        .enumerate()
        .map(|(i, sw)| {
            let mut kept: Vec<&str> = Vec::new();
            for signal in &sw.signals {
                if last.get(signal.as_str()) == Some(&i) && !kept.contains(&signal.as_str()) {
                    kept.push(signal.as_str());
                }
            }
            (i, kept)
        })
        .collect()
}

/// Same policy for case-analysis records: only the last declaration per
/// signal is emitted, at its own position.
fn surviving_cases(cfg: &JobConfig) -> Vec<usize> {
    let mut last: BTreeMap<&str, usize> = BTreeMap::new();
    for (i, case) in cfg.cases.iter().enumerate() {
        last.insert(case.signal.as_str(), i);
    }

    cfg.cases
        .iter()
        .enumerate()
        .filter(|(i, case)| last.get(case.signal.as_str()) == Some(i))
        .map(|(i, _)| i)
        .collect()
}

/// Render the full script. Assumes the config passed `validate`; missing
/// optional sections are simply omitted rather than panicking, but callers
/// must not emit an unvalidated config (`write_script` enforces this).
pub fn render(cfg: &JobConfig) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(library) = cfg.library.as_deref() {
        let mut s = format!("# {} power intent script\n", cfg.name);
        s.push_str(&format!("set target_library {}\n", library));
        s.push_str(&format!("set link_library [list * {}]\n", library));
        sections.push(s);
    }

    if let Some(set) = &cfg.sources {
        let mut s = String::new();
        for file in &set.files {
            s.push_str(&format!("read_verilog {}\n", file));
        }
        s.push_str(&format!("current_design {}\n", set.top));
        s.push_str("link\n");
        sections.push(s);
    }

    if let Some(clock) = &cfg.clock {
        sections.push(format!(
            "create_clock -period {} [get_ports {}]\n",
            clock.period, clock.port
        ));
    }

    let mut s = String::new();
    for (i, kept) in surviving_switching(cfg) {
        if kept.is_empty() {
            continue;
        }
        let sw = &cfg.switching[i];
        s.push_str(&format!(
            "set_switching_activity -toggle_rate {} -static_probability {} [get_ports {{{}}}]\n",
            sw.toggle_rate,
            sw.static_probability,
            kept.join(" ")
        ));
    }
    if !s.is_empty() {
        sections.push(s);
    }

    let mut s = String::new();
    for i in surviving_cases(cfg) {
        let case = &cfg.cases[i];
        s.push_str(&format!(
            "set_case_analysis {} [get_ports {}]\n",
            case.value.as_digit(),
            case.signal
        ));
    }
    if !s.is_empty() {
        sections.push(s);
    }

    sections.join("\n")
}

/// Validate, render and write the script. The default output path is
/// `<jobname>.tcl` in the working directory. The text goes to a temporary
/// file next to the destination and is renamed into place only on full
/// success, so a failure never leaves a truncated script visible.
pub fn write_script(cfg: &JobConfig, out: Option<&Path>) -> Result<PathBuf> {
    let violations = crate::validate::validate(cfg)?;
    if !violations.is_empty() {
        let list: Vec<String> = violations.iter().map(|v| format!("  - {}", v)).collect();
        bail!(
            "cannot generate script for '{}':\n{}",
            cfg.name,
            list.join("\n")
        );
    }

    for c in crate::validate::conflicts(cfg) {
        eprintln!("WARN: {}", c);
    }

    let out: PathBuf = match out {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(format!("{}.tcl", cfg.name)),
    };
    let tmp = out.with_extension("tcl.tmp");

    let text = render(cfg);
    fs::write(&tmp, &text).with_context(|| format!("write {}", tmp.display()))?;
    if let Err(e) = fs::rename(&tmp, &out) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("publish {}", out.display()));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaseValue;
    use pretty_assertions::assert_eq;

    fn mac_config() -> JobConfig {
        let mut cfg = JobConfig::new("mac");
        cfg.set_library("L.db");
        cfg.set_sources(vec!["a.v".into()], "mac_unit");
        cfg.set_clock("clk", 1.0);
        cfg.add_switching_activity(vec!["in_a".into(), "in_b".into()], 0.3, 0.5);
        cfg.add_case_activity("pulse", CaseValue::One);
        cfg.add_case_activity("reset", CaseValue::Zero);
        cfg
    }

    #[test]
    fn renders_full_script_in_directive_order() {
        let expected = "\
# mac power intent script
set target_library L.db
set link_library [list * L.db]

read_verilog a.v
current_design mac_unit
link

create_clock -period 1 [get_ports clk]

set_switching_activity -toggle_rate 0.3 -static_probability 0.5 [get_ports {in_a in_b}]

set_case_analysis 1 [get_ports pulse]
set_case_analysis 0 [get_ports reset]
";
        assert_eq!(render(&mac_config()), expected);
    }

    #[test]
    fn render_is_deterministic() {
        let cfg = mac_config();
        assert_eq!(render(&cfg), render(&cfg));
    }

    #[test]
    fn activity_directives_keep_insertion_order() {
        let mut cfg = mac_config();
        cfg.add_switching_activity(vec!["z_late".into()], 0.1, 0.9);
        cfg.add_case_activity("a_late", CaseValue::One);

        let text = render(&cfg);
        let first_sw = text.find("{in_a in_b}").unwrap();
        let second_sw = text.find("{z_late}").unwrap();
        assert!(first_sw < second_sw);

        let pulse = text.find("get_ports pulse").unwrap();
        let reset = text.find("get_ports reset").unwrap();
        let late = text.find("get_ports a_late").unwrap();
        assert!(pulse < reset && reset < late);
    }

    #[test]
    fn duplicate_switching_signal_takes_last_declaration() {
        let mut cfg = mac_config();
        cfg.add_switching_activity(vec!["in_a".into()], 0.9, 0.1);

        let text = render(&cfg);
        // in_a dropped from the earlier group, re-emitted with the new pair.
        assert!(text.contains(
            "set_switching_activity -toggle_rate 0.3 -static_probability 0.5 [get_ports {in_b}]"
        ));
        assert!(text.contains(
            "set_switching_activity -toggle_rate 0.9 -static_probability 0.1 [get_ports {in_a}]"
        ));
    }

    #[test]
    fn fully_overridden_group_is_dropped() {
        let mut cfg = mac_config();
        cfg.add_switching_activity(vec!["in_a".into(), "in_b".into()], 1.5, 0.25);

        let text = render(&cfg);
        assert_eq!(text.matches("set_switching_activity").count(), 1);
        assert!(text.contains("-toggle_rate 1.5 -static_probability 0.25"));
    }

    #[test]
    fn duplicate_case_signal_takes_last_declaration() {
        let mut cfg = mac_config();
        cfg.add_case_activity("pulse", CaseValue::Zero);

        let text = render(&cfg);
        assert_eq!(text.matches("get_ports pulse").count(), 1);
        // The surviving pulse directive comes after reset, at the position
        // of the later declaration.
        let reset = text.find("set_case_analysis 0 [get_ports reset]").unwrap();
        let pulse = text.find("set_case_analysis 0 [get_ports pulse]").unwrap();
        assert!(reset < pulse);
    }

    fn temp_out(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dcscript-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join("out.tcl")
    }

    #[test]
    fn write_script_is_idempotent_and_leaves_no_temp_file() {
        let out = temp_out("idem");
        let cfg = mac_config();

        let first = write_script(&cfg, Some(&out)).unwrap();
        let a = fs::read(&first).unwrap();
        let second = write_script(&cfg, Some(&out)).unwrap();
        let b = fs::read(&second).unwrap();

        assert_eq!(first, second);
        assert_eq!(a, b);
        assert!(!out.with_extension("tcl.tmp").exists());
    }

    #[test]
    fn write_script_refuses_invalid_config_and_writes_nothing() {
        let out = temp_out("invalid");
        let cfg = JobConfig::new("incomplete");

        let err = write_script(&cfg, Some(&out)).unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains("no target library set"));
        assert!(msg.contains("no RTL source files given"));
        assert!(msg.contains("no clock defined"));

        assert!(!out.exists());
        assert!(!out.with_extension("tcl.tmp").exists());
    }
}
