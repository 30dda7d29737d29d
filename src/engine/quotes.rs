use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub const QUOTES: &[&str] = &[
    "The journey of a thousand miles begins with a single step.",
    "Success is the sum of small efforts, repeated day in and day out.",
    "We are what we repeatedly do.",
    "It does not matter how slowly you go as long as you do not stop.",
    "Discipline is choosing between what you want now and what you want most.",
    "Fall seven times, stand up eight.",
    "A river cuts through rock not because of its power, but its persistence.",
    "Motivation gets you going, but habit keeps you going.",
];

pub struct QuoteBook {
    current: usize,
    rng: SmallRng,
}

impl QuoteBook {
    /// Starts on the first quote; later picks are random.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_rng(rng: SmallRng) -> Self {
        Self { current: 0, rng }
    }

    pub fn current(&self) -> &'static str {
        QUOTES[self.current]
    }

    /// Switch to a different quote than the one shown.
    pub fn advance(&mut self) -> &'static str {
        // Draw from the other quotes only, then shift past the current index.
        let offset = self.rng.gen_range(1..QUOTES.len());
        self.current = (self.current + offset) % QUOTES.len();
        self.current()
    }
}

impl Default for QuoteBook {
    fn default() -> Self {
        Self::new()
    }
}
