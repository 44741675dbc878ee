//! Activity Catalog: the fixed registry of supportive micro-activities.
//!
//! Entries are loaded once from a JSON resource (built-in, or a file that
//! overrides it) and are read-only afterwards. Order in the resource is kept
//! and used as the final tie-break everywhere, so selection is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::locale::LocalizedText;
use crate::error::{SuggestError, SuggestResult};

const BUILTIN_CATALOG: &str = include_str!("../../resources/activities.json");

// ── Types ──────────────────────────────────────────────

/// Activity families a user can ask for by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityDomain {
    Music,
    Breathing,
    Journaling,
    Routine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyRequirement {
    VeryLow,
    Low,
    Medium,
}

/// How much of each need an activity satisfies, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CapabilityVector {
    pub calming: f32,
    pub distraction: f32,
    pub activation: f32,
    pub processing: f32,
}

impl CapabilityVector {
    fn values(&self) -> [f32; 4] {
        [self.calming, self.distraction, self.activation, self.processing]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityProfile {
    pub id: String,
    #[serde(default)]
    pub domain: Option<ActivityDomain>,
    pub name: LocalizedText,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub action_text: LocalizedText,
    pub duration_minutes: u32,
    pub icon: String,
    pub visual_style: String,
    pub route: String,
    pub capabilities: CapabilityVector,
    /// 1 (low effort) to 5 (high effort).
    pub commitment_level: u8,
    /// 0 (slow to help) to 1 (immediate relief).
    pub immediacy: f32,
    #[serde(default)]
    pub requires_talking: bool,
    pub energy_required: EnergyRequirement,
    #[serde(default)]
    pub base_priority: i32,
    #[serde(default)]
    pub good_for_emotions: Vec<String>,
}

impl ActivityProfile {
    pub fn is_good_for(&self, emotion: &str) -> bool {
        self.good_for_emotions.iter().any(|e| e == emotion)
    }

    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("activity with empty id".to_string());
        }
        if !(1..=5).contains(&self.commitment_level) {
            return Err(format!(
                "{}: commitment_level {} outside 1..=5",
                self.id, self.commitment_level
            ));
        }
        if !(0.0..=1.0).contains(&self.immediacy) {
            return Err(format!("{}: immediacy {} outside [0, 1]", self.id, self.immediacy));
        }
        if self
            .capabilities
            .values()
            .iter()
            .any(|v| !(0.0..=1.0).contains(v))
        {
            return Err(format!("{}: capability outside [0, 1]", self.id));
        }
        Ok(())
    }
}

// ── Registry ───────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ActivityCatalog {
    entries: Vec<ActivityProfile>,
    by_id: HashMap<String, usize>,
}

impl ActivityCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> SuggestResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> SuggestResult<Self> {
        let entries: Vec<ActivityProfile> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<ActivityProfile>) -> SuggestResult<Self> {
        if entries.is_empty() {
            return Err(SuggestError::InvalidCatalog("catalog is empty".to_string()));
        }
        let mut by_id = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            entry.validate().map_err(SuggestError::InvalidCatalog)?;
            if by_id.insert(entry.id.clone(), idx).is_some() {
                return Err(SuggestError::InvalidCatalog(format!(
                    "duplicate activity id: {}",
                    entry.id
                )));
            }
        }
        tracing::debug!("[Catalog] Registered {} activities", entries.len());
        Ok(Self { entries, by_id })
    }

    pub fn load(path: &Path) -> SuggestResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load an override file; a missing or invalid file falls back to the built-in catalog.
    pub fn load_or_builtin(path: &Path) -> SuggestResult<Self> {
        match Self::load(path) {
            Ok(catalog) => {
                tracing::info!(
                    "[Catalog] Loaded {} activities from {}",
                    catalog.len(),
                    path.display()
                );
                Ok(catalog)
            }
            Err(e) => {
                tracing::warn!(
                    "[Catalog] Could not load {}: {} — using built-in catalog",
                    path.display(),
                    e
                );
                Self::builtin()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&ActivityProfile> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    /// Entries in resource order.
    pub fn iter(&self) -> impl Iterator<Item = &ActivityProfile> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest `base_priority` entry in `domain`; earlier entries win ties.
    pub fn best_for_domain(&self, domain: ActivityDomain) -> Option<&ActivityProfile> {
        self.entries
            .iter()
            .filter(|e| e.domain == Some(domain))
            .fold(None, |best: Option<&ActivityProfile>, e| match best {
                Some(b) if b.base_priority >= e.base_priority => Some(b),
                _ => Some(e),
            })
    }
}
