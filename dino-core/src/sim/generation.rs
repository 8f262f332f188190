use super::*;

use crate::agent::Action;
use crate::collision::collides;

/// One evaluation round: a population of agents against one shared
/// obstacle timeline, from tick 0 until [`TerminationReason`].
pub struct Generation<'p> {
    ordinal: u32,
    seed: u32,
    config: SimConfig,
    state: SimulationState,
    agents: Vec<Agent>,
    policies: Vec<Box<dyn Policy + 'p>>,
    alive_count: usize,
    status: GenerationStatus,
}

impl<'p> Generation<'p> {
    pub fn new(
        config: SimConfig,
        seed: u32,
        ordinal: u32,
        policies: Vec<Box<dyn Policy + 'p>>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if policies.is_empty() {
            return Err(SimError::EmptyPopulation);
        }

        let agents = policies.iter().map(|_| Agent::new(&config)).collect();
        Ok(Self {
            ordinal,
            seed,
            config,
            state: SimulationState::new(&config, seed),
            agents,
            alive_count: policies.len(),
            policies,
            status: GenerationStatus::Running,
        })
    }

    #[inline]
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[inline]
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    #[inline]
    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        matches!(self.status, GenerationStatus::Terminated(_))
    }

    /// Stops the generation between ticks. Fitness computed so far stays
    /// valid and is what [`Generation::report`] returns.
    pub fn abort(&mut self) {
        if !self.is_terminated() {
            self.status = GenerationStatus::Terminated(TerminationReason::Aborted);
        }
    }

    /// Advances the shared environment, then every live agent, then decides
    /// termination.
    pub fn step(&mut self) -> Result<TickOutcome, SimError> {
        if self.is_terminated() {
            return Err(SimError::GenerationTerminated {
                tick: self.state.tick(),
            });
        }

        self.state.advance(&self.config);
        let tick = self.state.tick();
        let speed = self.state.speed();
        let obstacles = self.state.obstacles.active();

        // Every policy answers before any agent moves, so a contract violation
        // leaves all agents at the end of the previous tick.
        let mut actions = Vec::with_capacity(self.agents.len());
        for (index, (agent, policy)) in self
            .agents
            .iter()
            .zip(self.policies.iter_mut())
            .enumerate()
        {
            if !agent.is_alive() {
                actions.push(None);
                continue;
            }

            let observation = agent.observe(obstacles, speed, self.config.world_width);
            let raw = policy.evaluate(&observation);
            let Some(action) = Action::from_id(raw) else {
                self.status = GenerationStatus::Terminated(TerminationReason::ContractViolation);
                return Err(SimError::InvalidAction {
                    agent: index,
                    tick,
                    action: raw,
                });
            };
            actions.push(Some(action));
        }

        let mut deaths = 0;
        for (agent, action) in self.agents.iter_mut().zip(actions) {
            let Some(action) = action else {
                continue;
            };

            agent.apply_action(action, &self.config);
            if collides(&agent.hitbox(), obstacles) {
                agent.kill(tick);
                deaths += 1;
                continue;
            }
            agent.accrue(speed);
        }

        self.alive_count = self.agents.iter().filter(|agent| agent.is_alive()).count();
        if self.alive_count == 0 {
            self.status = GenerationStatus::Terminated(TerminationReason::AllDead);
        } else if tick >= self.config.tick_cap {
            self.status = GenerationStatus::Terminated(TerminationReason::TickCap);
        }

        Ok(TickOutcome {
            tick,
            speed,
            alive_count: self.alive_count,
            deaths,
            status: self.status,
        })
    }

    pub fn run(&mut self) -> Result<GenerationReport, SimError> {
        self.run_observed(|_| {})
    }

    /// Runs to termination, handing `observe` a snapshot after every tick.
    pub fn run_observed(
        &mut self,
        mut observe: impl FnMut(&TickSnapshot),
    ) -> Result<GenerationReport, SimError> {
        while !self.is_terminated() {
            self.step()?;
            observe(&self.snapshot());
        }
        Ok(self.report())
    }

    /// Runs until termination or until `should_abort` returns true between
    /// ticks.
    pub fn run_until(
        &mut self,
        mut should_abort: impl FnMut(&Self) -> bool,
    ) -> Result<GenerationReport, SimError> {
        while !self.is_terminated() {
            if should_abort(self) {
                self.abort();
                break;
            }
            self.step()?;
        }
        Ok(self.report())
    }

    pub fn fitness(&self) -> Vec<f64> {
        self.agents
            .iter()
            .map(|agent| agent.fitness(&self.config))
            .collect()
    }

    pub fn report(&self) -> GenerationReport {
        GenerationReport {
            generation: self.ordinal,
            seed: self.seed,
            ticks: self.state.tick(),
            final_speed: self.state.speed(),
            termination: match self.status {
                GenerationStatus::Running => None,
                GenerationStatus::Terminated(reason) => Some(reason),
            },
            alive_count: self.alive_count,
            obstacles_spawned: self.state.obstacles.spawned(),
            fitness: self.fitness(),
            distances: self.agents.iter().map(Agent::distance).collect(),
            ticks_lived: self.agents.iter().map(Agent::ticks_lived).collect(),
        }
    }

    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            generation: self.ordinal,
            tick: self.state.tick(),
            speed: self.state.speed(),
            alive_count: self.alive_count,
            agents: self
                .agents
                .iter()
                .map(|agent| AgentSnapshot {
                    pose: agent.pose(),
                    x: agent.x(),
                    y: agent.y(),
                    alive: agent.is_alive(),
                    distance: agent.distance(),
                })
                .collect(),
            obstacles: self
                .state
                .obstacles
                .active()
                .iter()
                .map(|obstacle| ObstacleSnapshot {
                    kind: obstacle.kind,
                    variant: obstacle.variant,
                    x: obstacle.rect.x,
                    y: obstacle.rect.y,
                    width: obstacle.rect.width,
                    height: obstacle.rect.height,
                })
                .collect(),
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        let nearest = self.state.obstacles.nearest();
        Checkpoint {
            tick: self.state.tick(),
            speed: self.state.speed(),
            alive_count: self.alive_count,
            rng_state: self.state.rng_state(),
            obstacles_spawned: self.state.obstacles.spawned(),
            obstacle_kind: nearest.map(|obstacle| obstacle.kind),
            obstacle_x: nearest.map(|obstacle| obstacle.rect.x),
            best_distance: self
                .agents
                .iter()
                .map(Agent::distance)
                .max()
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests;
