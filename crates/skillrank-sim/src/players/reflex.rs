use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use skillrank_core::traits::{MashPad, SlotLight};

use super::{jittered, lock, Prompt};
use crate::config::MashProfile;

/// Watches the pad and slaps whichever slot lights up.
#[derive(Debug)]
pub struct ReflexBot {
    profile: MashProfile,
    rng: Mutex<SmallRng>,
    lit: Prompt<usize>,
    active: AtomicBool,
    presses: AtomicU32,
}

impl ReflexBot {
    pub fn new(profile: MashProfile, seed: u64) -> Self {
        Self {
            profile,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
            lit: Prompt::new(),
            active: AtomicBool::new(false),
            presses: AtomicU32::new(0),
        }
    }

    /// Presses made so far, on target or not.
    pub fn presses(&self) -> u32 {
        self.presses.load(Ordering::Relaxed)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MashPad for ReflexBot {
    fn slot_count(&self) -> usize {
        self.profile.slots
    }

    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    fn set_slot(&self, slot: usize, light: SlotLight) {
        match light {
            SlotLight::Lit => self.lit.raise(slot),
            SlotLight::Missed | SlotLight::Off => self.lit.clear_if(slot),
            SlotLight::Accepted => {}
        }
    }

    async fn next_press(&self) -> Option<usize> {
        let slots = self.profile.slots.max(1);
        let press = self
            .lit
            .respond(|target| {
                let mut rng = lock(&self.rng);
                if rng.random_bool(self.profile.miss_rate.clamp(0.0, 1.0)) {
                    return None;
                }
                let delay = jittered(&mut rng, self.profile.reaction_ms, self.profile.jitter_ms);
                let slot = if rng.random_bool(self.profile.accuracy.clamp(0.0, 1.0)) {
                    target
                } else {
                    (target + 1 + rng.random_range(0..slots.max(2) - 1)) % slots
                };
                Some((delay, slot))
            })
            .await;
        if press.is_some() {
            self.presses.fetch_add(1, Ordering::Relaxed);
        }
        press
    }
}
