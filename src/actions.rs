//! Player action rules: each action inspects the tile under the player and
//! either mutates state and applies its metric deltas, or reports why it did
//! nothing. No action can fail the program; every outcome is a message.

use rand::Rng;

use crate::{
    grid::{Tile, GREEN_KINDS},
    missions::MissionKind,
    rng::RngExt,
    world::World,
};

/// Result of one Action API call. `message` is the primary user-facing
/// feedback line; `notices` carries mission and tutorial flashes raised by
/// the same call, in the order they fired.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub applied: bool,
    pub message: String,
    pub notices: Vec<String>,
}

impl ActionOutcome {
    pub(crate) fn applied(message: impl Into<String>) -> Self {
        Self {
            applied: true,
            message: message.into(),
            notices: Vec::new(),
        }
    }

    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self {
            applied: false,
            message: message.into(),
            notices: Vec::new(),
        }
    }

    fn with_notices(mut self, notices: Vec<String>) -> Self {
        self.notices = notices;
        self
    }
}

impl World {
    pub(crate) fn action_move(&mut self, dx: i64, dy: i64) -> ActionOutcome {
        let grid_w = self.grid().width() as i64;
        let grid_h = self.grid().height() as i64;
        let x = (self.player().x as i64 + dx).clamp(0, grid_w - 1) as usize;
        let y = (self.player().y as i64 + dy).clamp(0, grid_h - 1) as usize;
        self.player_mut().x = x;
        self.player_mut().y = y;

        let mut notices = Vec::new();
        notices.extend(self.tutorial_mut().note_moved());

        if self.take_scrap_at(x, y) {
            self.metrics_mut().energy += 1;
            notices.extend(self.tutorial_mut().note_scrap_collected());
            return ActionOutcome::applied("Collected scrap: +1 Energy").with_notices(notices);
        }
        ActionOutcome::applied(format!("Moved to ({x}, {y})")).with_notices(notices)
    }

    pub(crate) fn action_place_solar(&mut self) -> ActionOutcome {
        let (x, y) = (self.player().x, self.player().y);
        match self.player_tile() {
            Tile::Building { has_solar: false } => {
                if self.player().solar_panels == 0 {
                    return ActionOutcome::rejected("No solar panels available. Buy more (key 5)");
                }
                self.grid_mut().set_tile(x, y, Tile::Building { has_solar: true });
                self.player_mut().solar_panels -= 1;
                self.metrics_mut().renewables += 1;
                let mut notices = self.apply_effects(-3.0, 1.0);
                notices.extend(self.record_mission(MissionKind::InstallSolar));
                notices.extend(self.tutorial_mut().note_solar_placed());
                tracing::debug!(x, y, "solar panel installed");
                ActionOutcome::applied("Solar installed: cleaner energy!").with_notices(notices)
            }
            _ => ActionOutcome::rejected("Find a building to place solar (1)"),
        }
    }

    pub(crate) fn action_add_green(&mut self, rng: &mut impl Rng) -> ActionOutcome {
        let (x, y) = (self.player().x, self.player().y);
        match self.player_tile() {
            Tile::Empty | Tile::Park => {
                if self.player().green_spaces == 0 {
                    return ActionOutcome::rejected("No green spaces available. Buy more (key 6)");
                }
                let green = *rng.pick(&GREEN_KINDS);
                self.grid_mut().set_tile(x, y, Tile::Green { green });
                self.player_mut().green_spaces -= 1;
                self.metrics_mut().green_spaces += 1;
                let mut notices = self.apply_effects(-2.0, 2.0);
                notices.extend(self.record_mission(MissionKind::PlantGreen));
                notices.extend(self.tutorial_mut().note_green_placed());
                tracing::debug!(x, y, ?green, "green space planted");
                ActionOutcome::applied("Green space added: cleaner air!").with_notices(notices)
            }
            Tile::Green { .. } => ActionOutcome::rejected("This spot is already green"),
            _ => ActionOutcome::rejected("Add green on empty/park tiles (2)"),
        }
    }

    pub(crate) fn action_upgrade_road(&mut self) -> ActionOutcome {
        let (x, y) = (self.player().x, self.player().y);
        match self.player_tile() {
            Tile::Road { upgraded: false } => {
                self.grid_mut().set_tile(x, y, Tile::Road { upgraded: true });
                let notices = self.apply_effects(-2.0, 1.0);
                ActionOutcome::applied("Road upgraded: bike/pedestrian friendly!")
                    .with_notices(notices)
            }
            Tile::Road { upgraded: true } => ActionOutcome::rejected("Road already upgraded"),
            _ => ActionOutcome::rejected("Upgrade roads into bike/ped paths (3)"),
        }
    }

    pub(crate) fn action_feed_building(&mut self) -> ActionOutcome {
        match self.player_tile() {
            Tile::Building { has_solar } => {
                if self.metrics().energy == 0 {
                    return ActionOutcome::rejected("No energy. Collect scraps first.");
                }
                self.metrics_mut().energy -= 1;
                let carbon_delta = if has_solar { -3.0 } else { -1.5 };
                let notices = self.apply_effects(carbon_delta, 0.5);
                ActionOutcome::applied("Fed building with energy!").with_notices(notices)
            }
            _ => ActionOutcome::rejected("Stand on a building to feed (F)"),
        }
    }

    pub(crate) fn action_clean_pollution(&mut self) -> ActionOutcome {
        let (x, y) = (self.player().x, self.player().y);
        match self.player_tile() {
            Tile::Pollution { amount, .. } if amount > 0 => {
                self.grid_mut().set_tile(
                    x,
                    y,
                    Tile::Pollution {
                        amount: amount - 1,
                        cleaned: true,
                    },
                );
                let mut notices = self.apply_effects(-1.0, 0.5);
                notices.extend(self.record_mission(MissionKind::CleanPollution));
                ActionOutcome::applied("Pollution cleaned! +1 Happiness").with_notices(notices)
            }
            _ => ActionOutcome::rejected("Clean pollution spots (C)"),
        }
    }

    pub(crate) fn action_buy_solar(&mut self) -> ActionOutcome {
        let price = self.scenario().prices.solar_panel;
        if self.player().money < price {
            return ActionOutcome::rejected(format!("Need ${price} to buy solar panel"));
        }
        self.player_mut().money -= price;
        self.player_mut().solar_panels += 1;
        ActionOutcome::applied("Bought 1 solar panel! Use key 1 to place")
    }

    pub(crate) fn action_buy_green(&mut self) -> ActionOutcome {
        let price = self.scenario().prices.green_space;
        if self.player().money < price {
            return ActionOutcome::rejected(format!("Need ${price} to buy green space"));
        }
        self.player_mut().money -= price;
        self.player_mut().green_spaces += 1;
        ActionOutcome::applied("Bought 1 green space! Use key 2 to place")
    }

    pub(crate) fn action_place_bin(&mut self) -> ActionOutcome {
        let (x, y) = (self.player().x, self.player().y);
        let price = self.scenario().prices.rubbish_bin;
        if matches!(self.player_tile(), Tile::Empty) && self.player().money >= price {
            self.player_mut().money -= price;
            self.grid_mut().set_tile(x, y, Tile::RubbishBin);
            let notices = self.apply_effects(-0.5, 0.3);
            ActionOutcome::applied("Rubbish bin placed! Prevents pollution buildup")
                .with_notices(notices)
        } else {
            ActionOutcome::rejected(format!("Place bins on empty spaces. Cost: ${price}"))
        }
    }

    pub(crate) fn action_toggle_missions(&mut self) -> ActionOutcome {
        let mut notices = Vec::new();
        notices.extend(self.tutorial_mut().note_missions_viewed());
        let visible = !self.missions().visible;
        self.missions_mut().visible = visible;
        let message = if visible {
            "Missions shown"
        } else {
            "Missions hidden"
        };
        ActionOutcome::applied(message).with_notices(notices)
    }
}
