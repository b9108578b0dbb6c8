//! Engine configuration (C10, ambient) — a consuming builder in the same style as
//! `algorithms::kmeans::KMeansBuilder`.

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Short-memory size that triggers novelty detection.
    pub num_ex_trigger: usize,
    /// Ageing window, in time-steps, for stale micros and stale unknowns.
    pub window: u64,
    /// Radius factor used by the absorption test (`f=1.0` in the design).
    pub absorb_factor: f64,
    /// Radius factor used by novelty detection's known/sleeping label match (`f=1.1`).
    pub match_factor: f64,
    /// Engine-wide micro-count hint handed to the clustering adaptor during novelty detection.
    pub micro_count_hint: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_ex_trigger: 2000,
            window: 4000,
            absorb_factor: 1.0,
            match_factor: 1.1,
            micro_count_hint: 100,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }
}

pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn num_ex_trigger(mut self, n: usize) -> Self {
        self.config.num_ex_trigger = n;
        self
    }

    pub fn window(mut self, w: u64) -> Self {
        self.config.window = w;
        self
    }

    pub fn absorb_factor(mut self, f: f64) -> Self {
        self.config.absorb_factor = f;
        self
    }

    pub fn match_factor(mut self, f: f64) -> Self {
        self.config.match_factor = f;
        self
    }

    pub fn micro_count_hint(mut self, k: usize) -> Self {
        self.config.micro_count_hint = k;
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
