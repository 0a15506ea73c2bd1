//! Random game notices for the demo.
use rand::{Rng, SeedableRng, rngs::StdRng};

const MONSTERS: &[&str] = &[
    "the orc",
    "the goblin",
    "the kobold",
    "the giant rat",
    "the gnome lord",
    "the jackal",
];

const OUTCOMES: &[&str] = &[
    "hits you.",
    "misses you.",
    "bites you.",
    "kicks you.",
    "hits you. You are hit.",
    "is killed!",
];

const DESCRIPTIONS: &[&str] = &[
    "You are standing in a dimly lit hall. Torches flicker along the damp walls and a cold \
     draft carries the smell of something long dead.",
    "You have entered a vaulted chamber. Broken statues line the aisle and a faint humming \
     rises from a cracked altar at the far end of the room.",
    "You find yourself at the edge of an underground lake. The water is black and perfectly \
     still, and something glitters far beneath the surface.",
];

/// One combat notice, shown as subject and outcome fragments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Notice {
    pub subject: &'static str,
    pub outcome: &'static str,
}

impl Notice {
    pub fn text(&self) -> String {
        format!("{} {}", self.subject, self.outcome)
    }
}

pub struct NoticeGenerator<R: Rng> {
    rng: R,
}

impl NoticeGenerator<StdRng> {
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> NoticeGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// One to four notices for a single monster turn.
    pub fn combat_round(&mut self) -> Vec<Notice> {
        let count = self.rng.gen_range(1..=4);
        (0..count)
            .map(|_| Notice {
                subject: pick(&mut self.rng, MONSTERS),
                outcome: pick(&mut self.rng, OUTCOMES),
            })
            .collect()
    }

    pub fn description(&mut self) -> &'static str {
        pick(&mut self.rng, DESCRIPTIONS)
    }
}

fn pick<R: Rng>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}
