//! Run-level state: one registry, one configuration and the genomes they govern.
//!
//! A [`Session`] is the owner the operators expect: it holds the single
//! [`InnovationRegistry`] of a run and lends it to every factory and mutation
//! call. Selection and reproduction policies stay with the caller.

use log::info;
use rand::Rng;

use crate::config::{ConfigError, NeatConfig};
use crate::genome::Genome;
use crate::innovation::InnovationRegistry;

/// Errors raised when a session is opened.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// An evolutionary run.
#[derive(Debug, Clone)]
pub struct Session {
    config: NeatConfig,
    registry: InnovationRegistry,
    population: Vec<Genome>,
}

impl Session {
    /// Open a new run.
    ///
    /// Builds one default genome from `config`, then fills the population with
    /// `population_size` independent single-step mutants of it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if `config` does not validate.
    pub fn create<R: Rng>(
        config: NeatConfig,
        population_size: usize,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let mut registry = InnovationRegistry::new();
        let base = Genome::from_config(&config, &mut registry, rng);
        let population = (0..population_size)
            .map(|_| base.mutate(&config, &mut registry, rng))
            .collect();

        info!(
            "session created: {} inputs, {} outputs, population {}",
            config.num_inputs, config.num_outputs, population_size
        );
        Ok(Self {
            config,
            registry,
            population,
        })
    }

    /// Continue a run from previously saved genomes.
    ///
    /// The registry is rebuilt from the genomes' genes, so new structure never
    /// reuses an id already present in the population.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if `config` does not validate.
    pub fn resume(config: NeatConfig, population: Vec<Genome>) -> Result<Self, SessionError> {
        config.validate()?;
        let registry = InnovationRegistry::from_genomes(&population);
        info!(
            "session resumed: population {}, {} recorded edges",
            population.len(),
            registry.len()
        );
        Ok(Self {
            config,
            registry,
            population,
        })
    }

    /// Replace every genome with a mutated copy of itself.
    pub fn mutate_population<R: Rng>(&mut self, rng: &mut R) {
        let Self {
            config,
            registry,
            population,
        } = self;
        for genome in population.iter_mut() {
            *genome = genome.mutate(config, registry, rng);
        }
    }

    #[must_use]
    pub fn config(&self) -> &NeatConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &InnovationRegistry {
        &self.registry
    }

    /// Mutable access for callers driving operators directly.
    pub fn registry_mut(&mut self) -> &mut InnovationRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut Vec<Genome> {
        &mut self.population
    }

    /// Split the session into its configuration, registry and population.
    #[must_use]
    pub fn into_parts(self) -> (NeatConfig, InnovationRegistry, Vec<Genome>) {
        (self.config, self.registry, self.population)
    }
}
