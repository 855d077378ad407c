//! Pre-emission checks over an accumulated `JobConfig`.
//!
//! `validate` aggregates every problem into one list instead of stopping at
//! the first, so a driver sees all of them in a single pass. `conflicts`
//! reports duplicate per-signal declarations separately; those are warnings
//! and never block emission (the emitter applies last-write-wins).

use crate::Result;
use crate::config::JobConfig;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    MissingJobName,
    MissingLibrary,
    MissingSources,
    MissingTopModule,
    MissingClock,
    BadClockPeriod(f64),
    BadToggleRate { signal: String, rate: f64 },
    BadStaticProbability { signal: String, prob: f64 },
    BadSignalName(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingJobName => write!(f, "job name is empty"),
            Violation::MissingLibrary => write!(f, "no target library set"),
            Violation::MissingSources => write!(f, "no RTL source files given"),
            Violation::MissingTopModule => write!(f, "top module name is empty"),
            Violation::MissingClock => write!(f, "no clock defined"),
            Violation::BadClockPeriod(p) => {
                write!(f, "clock period must be positive, got {}", p)
            }
            Violation::BadToggleRate { signal, rate } => {
                write!(f, "toggle rate for '{}' must be in [0, 2], got {}", signal, rate)
            }
            Violation::BadStaticProbability { signal, prob } => write!(
                f,
                "static probability for '{}' must be in [0, 1], got {}",
                signal, prob
            ),
            Violation::BadSignalName(name) => {
                write!(f, "'{}' is not a legal signal name", name)
            }
        }
    }
}

/// Which declaration list a duplicate signal appeared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Switching,
    Case,
}

/// A signal declared more than once in the same list. Non-fatal: the last
/// declaration wins at render time, but the duplicate is worth telling the
/// caller about even when both declarations agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub signal: String,
    pub kind: ConflictKind,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ConflictKind::Switching => "switching-activity",
            ConflictKind::Case => "case-analysis",
        };
        write!(
            f,
            "signal '{}' has more than one {} declaration; the last one wins",
            self.signal, what
        )
    }
}

/// Check one `/`-separated hierarchical signal path against the tool's
/// identifier syntax: each segment is an identifier with an optional bus
/// index, e.g. `core/regs/q[3]`.
fn signal_name_ok(re: &Regex, name: &str) -> bool {
    !name.is_empty() && name.split('/').all(|seg| re.is_match(seg))
}

/// Collect every violation in the accumulated state. Empty result means the
/// config is ready for emission.
pub fn validate(cfg: &JobConfig) -> Result<Vec<Violation>> {
    let seg_re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\[[0-9]+\])?$")?;
    let mut out = Vec::new();

    if cfg.name.is_empty() {
        out.push(Violation::MissingJobName);
    }

    match cfg.library.as_deref() {
        Some(path) if !path.is_empty() => {}
        _ => out.push(Violation::MissingLibrary),
    }

    match &cfg.sources {
        None => {
            out.push(Violation::MissingSources);
            out.push(Violation::MissingTopModule);
        }
        Some(set) => {
            if set.files.is_empty() {
                out.push(Violation::MissingSources);
            }
            if set.top.is_empty() {
                out.push(Violation::MissingTopModule);
            }
        }
    }

    match &cfg.clock {
        None => out.push(Violation::MissingClock),
        Some(clock) => {
            if !(clock.period > 0.0 && clock.period.is_finite()) {
                out.push(Violation::BadClockPeriod(clock.period));
            }
            if !signal_name_ok(&seg_re, &clock.port) {
                out.push(Violation::BadSignalName(clock.port.clone()));
            }
        }
    }

    for sw in &cfg.switching {
        for signal in &sw.signals {
            if !signal_name_ok(&seg_re, signal) {
                out.push(Violation::BadSignalName(signal.clone()));
            }
            // Ranges are inclusive on both ends.
            if !(sw.toggle_rate.is_finite() && (0.0..=2.0).contains(&sw.toggle_rate)) {
                out.push(Violation::BadToggleRate {
                    signal: signal.clone(),
                    rate: sw.toggle_rate,
                });
            }
            if !(sw.static_probability.is_finite()
                && (0.0..=1.0).contains(&sw.static_probability))
            {
                out.push(Violation::BadStaticProbability {
                    signal: signal.clone(),
                    prob: sw.static_probability,
                });
            }
        }
    }

    for case in &cfg.cases {
        if !signal_name_ok(&seg_re, &case.signal) {
            out.push(Violation::BadSignalName(case.signal.clone()));
        }
    }

    Ok(out)
}

/// Report signals declared more than once, in the order the duplicate
/// (second and later) declarations appear.
pub fn conflicts(cfg: &JobConfig) -> Vec<Conflict> {
    let mut out = Vec::new();

    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for sw in &cfg.switching {
        for signal in &sw.signals {
            let count = seen.entry(signal.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                out.push(Conflict {
                    signal: signal.clone(),
                    kind: ConflictKind::Switching,
                });
            }
        }
    }

    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for case in &cfg.cases {
        let count = seen.entry(case.signal.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            out.push(Conflict {
                signal: case.signal.clone(),
                kind: ConflictKind::Case,
            });
        }
    }

    out
}
