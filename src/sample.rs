use crate::error::{DfResult, DimuForgeError};
use crate::vars::EventRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumString};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    Signal,
    Background,
    Data,
}

/// One entry of a sample manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub name: String,
    pub kind: SampleKind,
    /// Cross section in pb. Ignored for data.
    #[serde(default)]
    pub xsec: f64,
    /// Number of generated events before any selection. Ignored for data.
    #[serde(default)]
    pub n_original: f64,
    /// JSON file holding the sample's events, relative to the manifest.
    pub file: PathBuf,
}

impl SampleKind {
    /// Suffix of the summed `<category>_Net_<suffix>` histogram.
    pub fn net_suffix(self) -> &'static str {
        match self {
            SampleKind::Signal => "Signal",
            SampleKind::Background => "Bkg",
            SampleKind::Data => "Data",
        }
    }
}

impl Sample {
    pub fn is_data(&self) -> bool {
        self.kind == SampleKind::Data
    }

    /// Luminosity normalisation applied after filling. Data is left as is.
    pub fn scale_factor(&self, luminosity: f64) -> f64 {
        if self.is_data() || self.n_original <= 0.0 {
            1.0
        } else {
            self.xsec * luminosity / self.n_original
        }
    }

    pub fn load_events(&self) -> DfResult<Vec<EventRecord>> {
        let content = fs::read_to_string(&self.file).map_err(|e| {
            DimuForgeError::Validation(format!(
                "sample '{}': cannot read {}: {}",
                self.name,
                self.file.display(),
                e
            ))
        })?;
        let events: Vec<EventRecord> = serde_json::from_str(&content)?;
        debug!("Sample '{}': {} events", self.name, events.len());
        Ok(events)
    }
}

/// Reads a manifest (JSON array of samples). Relative event files resolve against the manifest's directory.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> DfResult<Vec<Sample>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let mut samples: Vec<Sample> = serde_json::from_str(&content)?;

    if samples.is_empty() {
        return Err(DimuForgeError::Config(format!(
            "manifest {} lists no samples",
            path.display()
        )));
    }

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for s in &mut samples {
        if s.file.is_relative() {
            s.file = base.join(&s.file);
        }
        if !s.is_data() && s.n_original <= 0.0 {
            return Err(DimuForgeError::Validation(format!(
                "sample '{}' needs a positive n_original",
                s.name
            )));
        }
    }
    Ok(samples)
}
