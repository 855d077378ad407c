//! Job configuration accumulator.
//!
//! A `JobConfig` holds everything one synthesis job needs: the target cell
//! library, RTL sources plus top module, a clock definition, and the
//! activity annotations (switching rates and pinned case-analysis values).
//! Setters only mutate in-memory state; checking and file I/O happen later
//! in the pipeline (`validate`, then `render`).

/// Fixed logic value for case analysis. Two-state by construction so an
/// out-of-domain value cannot exist past the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseValue {
    Zero,
    One,
}

impl CaseValue {
    pub fn as_digit(self) -> char {
        match self {
            CaseValue::Zero => '0',
            CaseValue::One => '1',
        }
    }
}

/// Ordered RTL file list plus the top-level module name.
#[derive(Debug, Clone)]
pub struct SourceSet {
    pub files: Vec<String>,
    pub top: String,
}

/// Clock port and period (tool time units, typically ns).
#[derive(Debug, Clone)]
pub struct ClockSpec {
    pub port: String,
    pub period: f64,
}

/// One grouped switching-activity declaration: all named signals share the
/// same toggle rate (transitions per cycle, [0, 2]) and static probability
/// (fraction of time high, [0, 1]). Caller order is preserved.
#[derive(Debug, Clone)]
pub struct SwitchingActivity {
    pub signals: Vec<String>,
    pub toggle_rate: f64,
    pub static_probability: f64,
}

/// One case-analysis declaration: the signal is pinned to a constant value
/// for the whole analysis window.
#[derive(Debug, Clone)]
pub struct CaseActivity {
    pub signal: String,
    pub value: CaseValue,
}

#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Job/design name; script title and default output filename stem.
    pub name: String,
    pub library: Option<String>,
    pub sources: Option<SourceSet>,
    pub clock: Option<ClockSpec>,
    pub switching: Vec<SwitchingActivity>,
    pub cases: Vec<CaseActivity>,
}

impl JobConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            library: None,
            sources: None,
            clock: None,
            switching: Vec::new(),
            cases: Vec::new(),
        }
    }

    /// Record the cell-library database path. The path is stored raw; a
    /// later call overwrites the previous one.
    pub fn set_library(&mut self, path: impl Into<String>) {
        self.library = Some(path.into());
    }

    /// Record the RTL sources and top module, replacing any prior set.
    /// Emptiness is caught by `validate`, not here.
    pub fn set_sources(&mut self, files: Vec<String>, top: impl Into<String>) {
        self.sources = Some(SourceSet {
            files,
            top: top.into(),
        });
    }

    /// Record the clock. At most one clock per job; a later call replaces
    /// the previous one.
    pub fn set_clock(&mut self, port: impl Into<String>, period: f64) {
        self.clock = Some(ClockSpec {
            port: port.into(),
            period,
        });
    }

    /// Append one switching-activity declaration covering `signals`.
    /// Duplicates against earlier declarations are kept here; the emitter
    /// applies last-write-wins per signal and `conflicts` reports them.
    pub fn add_switching_activity(
        &mut self,
        signals: Vec<String>,
        toggle_rate: f64,
        static_probability: f64,
    ) {
        self.switching.push(SwitchingActivity {
            signals,
            toggle_rate,
            static_probability,
        });
    }

    /// Append one case-analysis declaration.
    pub fn add_case_activity(&mut self, signal: impl Into<String>, value: CaseValue) {
        self.cases.push(CaseActivity {
            signal: signal.into(),
            value,
        });
    }
}
