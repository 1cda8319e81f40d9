use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::corpus::read_embedded;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Pro,
}

/// A predefined exercise set with a fixed time budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub level: Level,
    pub language: String,
    /// Time budget in seconds.
    pub time: u32,
    pub exercises: Vec<String>,
}

/// A mission ready to be typed: the chosen exercise and its time budget.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionRun {
    pub mission_id: u32,
    pub exercise_index: usize,
    pub total_exercises: usize,
    pub text: String,
    pub target_value: u32,
}

#[derive(Debug, Clone, Default)]
pub struct MissionCatalog {
    missions: Vec<Mission>,
}

impl MissionCatalog {
    pub fn new(missions: Vec<Mission>) -> Self {
        Self { missions }
    }

    pub fn embedded() -> Self {
        Self::new(read_embedded("missions.json").unwrap_or_default())
    }

    pub fn all(&self) -> &[Mission] {
        &self.missions
    }

    pub fn by_level(&self, level: Level) -> Vec<&Mission> {
        self.missions.iter().filter(|m| m.level == level).collect()
    }

    /// `"all"` returns everything; otherwise the language plus general missions.
    pub fn by_language(&self, language: &str) -> Vec<&Mission> {
        self.missions
            .iter()
            .filter(|m| language == "all" || m.language == language || m.language == "general")
            .collect()
    }

    pub fn get(&self, id: u32) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    /// The mission after `id` in catalog order.
    pub fn next_after(&self, id: u32) -> Option<&Mission> {
        let idx = self.missions.iter().position(|m| m.id == id)?;
        self.missions.get(idx + 1)
    }

    /// Picks one of the mission's exercises at random.
    pub fn start<R: Rng + ?Sized>(&self, id: u32, rng: &mut R) -> Result<MissionRun> {
        let mission = self.get(id).ok_or(Error::UnknownMission(id))?;
        if mission.exercises.is_empty() {
            return Err(Error::NoExercises(id));
        }

        let exercise_index = rng.gen_range(0..mission.exercises.len());
        Ok(MissionRun {
            mission_id: mission.id,
            exercise_index,
            total_exercises: mission.exercises.len(),
            text: mission.exercises[exercise_index].clone(),
            target_value: mission.time,
        })
    }
}
