//! Indexed placement model.
//!
//! `NetworkModel` resolves every name in the raw config exactly once into
//! dense, index-addressed tables (site/task arenas, delay matrix,
//! `[period][site][task]` demand). Unresolvable references surface as
//! `ConfigError`s at build time instead of silent defaults during
//! solving. The model is immutable once built; both algorithm paths read
//! from it and neither mutates shared state.

use std::collections::HashMap;

use crate::models::{PlacementConfig, Site, TaskType};
use crate::validation::{validate_config, ConfigError};

/// Default optimization duration when the config does not specify one.
pub const DEFAULT_PERIODS: usize = 24;

/// A validated, name-indexed placement problem instance.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    sites: Vec<Site>,
    tasks: Vec<TaskType>,
    site_index: HashMap<String, usize>,
    task_index: HashMap<String, usize>,
    delay_ms: Vec<Vec<f64>>,
    demand: Vec<Vec<Vec<f64>>>,
    periods: usize,
}

impl NetworkModel {
    /// Builds a model from raw input.
    ///
    /// If any of sites/tasks/delay/demand is absent, the canonical
    /// built-in example is substituted wholesale so callers always get a
    /// runnable model. Validation failures are returned as the full list
    /// of detected `ConfigError`s.
    pub fn from_config(config: &PlacementConfig) -> Result<Self, Vec<ConfigError>> {
        let periods = config.duration_periods.unwrap_or(DEFAULT_PERIODS);
        let resolved;
        let config = if config.is_complete() {
            config
        } else {
            resolved = Self::canonical_example(periods);
            &resolved
        };

        // is_complete() guarantees all four parts below.
        let sites = config.sites.as_deref().unwrap_or_default();
        let tasks = config.tasks.as_deref().unwrap_or_default();
        let empty_delay = Default::default();
        let delay = config.delay.as_ref().unwrap_or(&empty_delay);
        let empty_demand = Default::default();
        let demand = config.demand.as_ref().unwrap_or(&empty_demand);

        validate_config(sites, tasks, delay, demand, periods)?;

        let site_index: HashMap<String, usize> = sites
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
        let task_index: HashMap<String, usize> = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();

        // Dense delay matrix; absent self-delay is 0 by convention.
        let site_count = sites.len();
        let mut delay_ms = vec![vec![0.0; site_count]; site_count];
        for (source, row) in delay {
            let s = site_index[source.as_str()];
            for (dest, &value) in row {
                delay_ms[s][site_index[dest.as_str()]] = value;
            }
        }

        // Dense demand; absent (site, task) cells are zero demand.
        let task_count = tasks.len();
        let mut demand_table = vec![vec![vec![0.0; task_count]; site_count]; periods];
        for (period_key, per_site) in demand {
            let h: usize = period_key.parse().unwrap_or_default();
            for (site, per_task) in per_site {
                let v = site_index[site.as_str()];
                for (task, &load) in per_task {
                    demand_table[h][v][task_index[task.as_str()]] = load;
                }
            }
        }

        Ok(Self {
            sites: sites.to_vec(),
            tasks: tasks.to_vec(),
            site_index,
            task_index,
            delay_ms,
            demand: demand_table,
            periods,
        })
    }

    /// The canonical built-in example: 3 European sites, 2 LLM task
    /// types, synthetic linear delay, uniform demand in every period.
    pub fn canonical_example(periods: usize) -> PlacementConfig {
        let sites = vec![
            Site::new("Zurich", 0.013, 900.0).with_coordinates(47.3769, 8.5417),
            Site::new("Paris", 0.054, 3000.0).with_coordinates(48.8566, 2.3522),
            Site::new("London", 0.165, 2560.0).with_coordinates(51.5074, -0.1278),
        ];
        let tasks = vec![
            TaskType::new("LLM_NLP", 500.0)
                .with_latency(500.0, 40.0)
                .with_footprint(1.0)
                .with_carbon_weight(0.8),
            TaskType::new("LLM_IR", 150.0)
                .with_latency(700.0, 80.0)
                .with_footprint(2.0)
                .with_carbon_weight(1.2),
        ];

        let mut config = PlacementConfig::new().with_duration(periods);
        for (i, source) in sites.iter().enumerate() {
            for (j, dest) in sites.iter().enumerate() {
                let delay = 5.0 + 10.0 * (i as f64 - j as f64).abs();
                config = config.with_delay_entry(source.name.as_str(), dest.name.as_str(), delay);
            }
        }
        for h in 0..periods {
            for site in &sites {
                for task in &tasks {
                    config =
                        config.with_demand_entry(h, site.name.as_str(), task.name.as_str(), 100.0);
                }
            }
        }
        config.with_sites(sites).with_tasks(tasks)
    }

    /// Number of sites.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Number of task types.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of periods.
    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Site attributes by index.
    pub fn site(&self, v: usize) -> &Site {
        &self.sites[v]
    }

    /// Task attributes by index.
    pub fn task(&self, a: usize) -> &TaskType {
        &self.tasks[a]
    }

    /// All sites in catalog order.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// All task types in catalog order.
    pub fn tasks(&self) -> &[TaskType] {
        &self.tasks
    }

    /// Index of a site name, if known.
    pub fn site_id(&self, name: &str) -> Option<usize> {
        self.site_index.get(name).copied()
    }

    /// Index of a task name, if known.
    pub fn task_id(&self, name: &str) -> Option<usize> {
        self.task_index.get(name).copied()
    }

    /// Network delay source → destination (ms).
    pub fn delay_ms(&self, source: usize, dest: usize) -> f64 {
        self.delay_ms[source][dest]
    }

    /// Demand at (period, site, task).
    pub fn demand(&self, period: usize, site: usize, task: usize) -> f64 {
        self.demand[period][site][task]
    }

    /// Total demand across all sites and tasks in a period.
    pub fn total_demand(&self, period: usize) -> f64 {
        self.demand[period].iter().flatten().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ConfigErrorKind;

    #[test]
    fn test_empty_config_uses_canonical_example() {
        let model = NetworkModel::from_config(&PlacementConfig::new()).unwrap();

        assert_eq!(model.site_count(), 3);
        assert_eq!(model.task_count(), 2);
        assert_eq!(model.periods(), DEFAULT_PERIODS);
        assert_eq!(model.site(0).name, "Zurich");
        assert_eq!(model.task(1).name, "LLM_IR");
        // Uniform example demand in every period.
        assert!((model.demand(0, 0, 0) - 100.0).abs() < 1e-10);
        assert!((model.demand(23, 2, 1) - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_partial_config_substituted_wholesale() {
        // Sites alone are not enough; the whole example takes over.
        let config = PlacementConfig::new()
            .with_sites(vec![Site::new("Solo", 0.5, 10.0)])
            .with_duration(2);
        let model = NetworkModel::from_config(&config).unwrap();

        assert_eq!(model.site_count(), 3);
        assert!(model.site_id("Solo").is_none());
        assert_eq!(model.periods(), 2);
    }

    #[test]
    fn test_canonical_example_delay_formula() {
        let model = NetworkModel::from_config(&PlacementConfig::new()).unwrap();
        let zurich = model.site_id("Zurich").unwrap();
        let london = model.site_id("London").unwrap();

        // 5 + 10·|i−j|
        assert!((model.delay_ms(zurich, zurich) - 5.0).abs() < 1e-10);
        assert!((model.delay_ms(zurich, london) - 25.0).abs() < 1e-10);
        assert!((model.delay_ms(london, zurich) - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_complete_config_used_verbatim() {
        let config = PlacementConfig::new()
            .with_sites(vec![Site::new("A", 0.1, 100.0), Site::new("B", 0.2, 50.0)])
            .with_tasks(vec![TaskType::new("t", 10.0)])
            .with_delay_entry("A", "B", 7.0)
            .with_delay_entry("B", "A", 9.0)
            .with_demand_entry(0, "A", "t", 25.0)
            .with_duration(1);
        let model = NetworkModel::from_config(&config).unwrap();

        assert_eq!(model.site_count(), 2);
        assert_eq!(model.periods(), 1);
        let a = model.site_id("A").unwrap();
        let b = model.site_id("B").unwrap();
        assert!((model.delay_ms(a, b) - 7.0).abs() < 1e-10);
        assert!((model.delay_ms(b, a) - 9.0).abs() < 1e-10);
        // Missing self-delay defaults to 0.
        assert!((model.delay_ms(a, a) - 0.0).abs() < 1e-10);
        assert!((model.demand(0, a, 0) - 25.0).abs() < 1e-10);
        // Absent (site, task) cell is zero demand.
        assert!((model.demand(0, b, 0) - 0.0).abs() < 1e-10);
        assert!((model.total_demand(0) - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_config_propagates_errors() {
        let config = PlacementConfig::new()
            .with_sites(vec![Site::new("A", 0.1, 100.0)])
            .with_tasks(vec![TaskType::new("t", 10.0)])
            .with_delay(Default::default())
            .with_demand_entry(0, "GHOST", "t", 1.0)
            .with_duration(1);

        let errors = NetworkModel::from_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ConfigErrorKind::UnknownSite));
    }

    #[test]
    fn test_duration_without_demand_periods_fails() {
        let config = PlacementConfig::new()
            .with_sites(vec![Site::new("A", 0.1, 100.0)])
            .with_tasks(vec![TaskType::new("t", 10.0)])
            .with_delay(Default::default())
            .with_demand_entry(0, "A", "t", 1.0)
            .with_duration(3);

        let errors = NetworkModel::from_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ConfigErrorKind::MissingPeriod));
    }

    #[test]
    fn test_zero_periods_model() {
        let config = PlacementConfig::new()
            .with_sites(vec![Site::new("A", 0.1, 100.0)])
            .with_tasks(vec![TaskType::new("t", 10.0)])
            .with_delay(Default::default())
            .with_demand(Default::default())
            .with_duration(0);

        let model = NetworkModel::from_config(&config).unwrap();
        assert_eq!(model.periods(), 0);
    }
}
