//! Job description as it appears in a job.json file.
//!
//! JSON shape:
//! {
//!   "name": "TrivialMAC",
//!   "library": "pdk/tcbn12.db",
//!   "sources": { "files": ["./mac_int4_int8.v"], "top": "mac_unit" },
//!   "clock": { "port": "clk", "period": 1 },
//!   "switching": [
//!     { "signals": ["in_a", "in_b"], "toggle_rate": 0.3, "static_probability": 0.5 }
//!   ],
//!   "case": [
//!     { "signal": "pulse", "value": 1 },
//!     { "signal": "reset", "value": 0 }
//!   ]
//! }
//!
//! Everything except `name` is optional here; missing required facets are
//! reported by the validator, not at parse time. The one exception is the
//! case value: anything other than 0 or 1 cannot be represented past this
//! boundary, so it is rejected during conversion.

use crate::Result;
use crate::config::{CaseValue, JobConfig};
use anyhow::bail;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JobSpec {
    pub name: String,

    #[serde(default)]
    pub library: Option<String>,

    #[serde(default)]
    pub sources: Option<SourcesSpec>,

    #[serde(default)]
    pub clock: Option<ClockFieldSpec>,

    #[serde(default)]
    pub switching: Vec<SwitchingFieldSpec>,

    #[serde(default, rename = "case")]
    pub cases: Vec<CaseFieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesSpec {
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub top: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClockFieldSpec {
    pub port: String,
    pub period: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwitchingFieldSpec {
    pub signals: Vec<String>,
    pub toggle_rate: f64,
    pub static_probability: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseFieldSpec {
    pub signal: String,
    pub value: u8,
}

impl JobSpec {
    /// Feed the raw description through the accumulator setters, in the
    /// order the file lists things.
    pub fn into_config(self) -> Result<JobConfig> {
        if self.name.is_empty() {
            bail!("job name must not be empty");
        }

        let mut cfg = JobConfig::new(self.name);

        if let Some(library) = self.library {
            cfg.set_library(library);
        }
        if let Some(sources) = self.sources {
            cfg.set_sources(sources.files, sources.top);
        }
        if let Some(clock) = self.clock {
            cfg.set_clock(clock.port, clock.period);
        }
        for sw in self.switching {
            cfg.add_switching_activity(sw.signals, sw.toggle_rate, sw.static_probability);
        }
        for case in self.cases {
            let value = match case.value {
                0 => CaseValue::Zero,
                1 => CaseValue::One,
                other => bail!(
                    "case value for '{}' must be 0 or 1, got {}",
                    case.signal,
                    other
                ),
            };
            cfg.add_case_activity(case.signal, value);
        }

        Ok(cfg)
    }
}
