use serde::Serialize;

/// Number of tutorial steps; reaching the last one retires the overlay for
/// the rest of the process.
const FINAL_STEP: u8 = 6;

/// Guided-first-actions state machine. Each flag latches on the first
/// matching action while the tutorial sits on the step expecting it, and the
/// step then advances by exactly one, producing a coaching message.
#[derive(Debug, Clone, Serialize)]
pub struct Tutorial {
    step: u8,
    active: bool,
    moved: bool,
    collected_scrap: bool,
    placed_green: bool,
    placed_solar: bool,
    viewed_missions: bool,
}

impl Tutorial {
    pub fn new(enabled: bool) -> Self {
        Self {
            step: 0,
            active: enabled,
            moved: false,
            collected_scrap: false,
            placed_green: false,
            placed_solar: false,
            viewed_missions: false,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// Whether the overlay should still be shown.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Any action while the welcome message is up moves the tutorial onto
    /// its first real step.
    pub fn note_any_action(&mut self) {
        if self.active && self.step == 0 {
            self.step = 1;
        }
    }

    pub fn note_moved(&mut self) -> Option<String> {
        if self.active && !self.moved && self.step == 1 {
            self.moved = true;
            self.step = 2;
            return Some("Great! Now collect some energy scraps.".into());
        }
        None
    }

    pub fn note_scrap_collected(&mut self) -> Option<String> {
        if self.active && !self.collected_scrap && self.step == 2 {
            self.collected_scrap = true;
            self.step = 3;
            return Some("Excellent! Now place a green space using '2'.".into());
        }
        None
    }

    pub fn note_green_placed(&mut self) -> Option<String> {
        if self.active && !self.placed_green && self.step == 3 {
            self.placed_green = true;
            self.step = 4;
            return Some("Well done! Now install a solar panel using '1'.".into());
        }
        None
    }

    pub fn note_solar_placed(&mut self) -> Option<String> {
        if self.active && !self.placed_solar && self.step == 4 {
            self.placed_solar = true;
            self.step = 5;
            return Some("Perfect! Now check your missions using 'M'.".into());
        }
        None
    }

    pub fn note_missions_viewed(&mut self) -> Option<String> {
        if self.active && !self.viewed_missions && self.step == 5 {
            self.viewed_missions = true;
            self.step = FINAL_STEP;
            self.active = false;
            return Some("Tutorial complete! Press 'H' for help anytime.".into());
        }
        None
    }
}
