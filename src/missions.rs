use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    CleanPollution,
    InstallSolar,
    PlantGreen,
    ReduceCarbon,
}

#[derive(Debug, Clone, Serialize)]
pub struct Mission {
    pub id: u32,
    pub title: &'static str,
    pub kind: MissionKind,
    pub target: u32,
    pub current: u32,
    pub completed: bool,
    pub reward: u32,
}

impl Mission {
    fn new(id: u32, title: &'static str, kind: MissionKind, target: u32, reward: u32) -> Self {
        Self {
            id,
            title,
            kind,
            target,
            current: 0,
            completed: false,
            reward,
        }
    }
}

/// Money and user-facing notices produced by a progress update.
#[derive(Debug, Default)]
pub struct MissionProgress {
    pub reward: u32,
    pub notices: Vec<String>,
}

/// The fixed daily mission board. Progress counters are monotonic and each
/// mission completes, and pays out, exactly once per process.
#[derive(Debug, Clone, Serialize)]
pub struct MissionBoard {
    missions: Vec<Mission>,
    pub visible: bool,
}

impl MissionBoard {
    pub fn standard() -> Self {
        Self {
            missions: vec![
                Mission::new(1, "Clean 3 pollution spots", MissionKind::CleanPollution, 3, 10),
                Mission::new(2, "Install 2 solar panels", MissionKind::InstallSolar, 2, 10),
                Mission::new(3, "Plant 4 green spaces", MissionKind::PlantGreen, 4, 10),
                Mission::new(4, "Reduce carbon by 8%", MissionKind::ReduceCarbon, 8, 15),
            ],
            visible: false,
        }
    }

    /// Board for scenarios with missions toggled off. Nothing to progress,
    /// nothing to pay out.
    pub fn disabled() -> Self {
        Self {
            missions: Vec::new(),
            visible: false,
        }
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    /// One more unit of progress for the matching count-based mission.
    pub fn record(&mut self, kind: MissionKind) -> MissionProgress {
        self.update(kind, |current| current + 1)
    }

    /// Absolute progress for the ReduceCarbon mission; the counter never
    /// moves backwards even if the metric recovers.
    pub fn record_carbon_reduction(&mut self, total_reduction: u32) -> MissionProgress {
        self.update(MissionKind::ReduceCarbon, |current| {
            current.max(total_reduction)
        })
    }

    fn update(&mut self, kind: MissionKind, next: impl Fn(u32) -> u32) -> MissionProgress {
        let mut progress = MissionProgress::default();
        for mission in &mut self.missions {
            if mission.kind != kind || mission.completed {
                continue;
            }
            mission.current = next(mission.current);
            if mission.current >= mission.target {
                mission.completed = true;
                progress.reward += mission.reward;
                progress.notices.push(format!(
                    "Mission completed: {}! +{} money",
                    mission.title, mission.reward
                ));
            }
        }
        progress
    }
}
