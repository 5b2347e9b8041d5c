//! Input validation for placement problems.
//!
//! Checks structural integrity of sites, task types, the delay matrix,
//! and the demand map before model building. Detects:
//! - Duplicate names
//! - Demand or delay entries referencing unknown sites/tasks
//! - Missing demand periods and missing cross-site delay pairs
//! - Out-of-range values (negative capacity, non-positive throughput, ...)
//!
//! All problems are collected and reported together; the caller never
//! retries a configuration that failed validation.

use std::collections::HashSet;

use crate::models::{DelayMap, DemandMap, Site, TaskType};

/// Validation result.
pub type ConfigResult = Result<(), Vec<ConfigError>>;

/// A configuration error.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Error category.
    pub kind: ConfigErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// Two catalog entries share the same name.
    DuplicateName,
    /// A demand or delay entry references a site not in the catalog.
    UnknownSite,
    /// A demand entry references a task type not in the catalog.
    UnknownTask,
    /// A demand period key is unparsable or outside `[0, duration)`.
    UnknownPeriod,
    /// The demand map lacks a period inside `[0, duration)`.
    MissingPeriod,
    /// The delay matrix lacks an entry for a cross-site pair.
    MissingDelay,
    /// A numeric attribute is out of range (negative load, zero throughput, ...).
    InvalidValue,
}

impl ConfigError {
    fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Validates a complete placement problem description.
///
/// Checks:
/// 1. No duplicate site or task names
/// 2. Site attributes non-negative, task throughput positive
/// 3. Delay entries reference known sites, values non-negative,
///    and every ordered cross-site pair is present
/// 4. Demand keys resolve to known periods/sites/tasks, loads non-negative,
///    and every period in `[0, duration)` is present
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(
    sites: &[Site],
    tasks: &[TaskType],
    delay: &DelayMap,
    demand: &DemandMap,
    duration_periods: usize,
) -> ConfigResult {
    let mut errors = Vec::new();

    // Catalog names and duplicates
    let mut site_names = HashSet::new();
    for site in sites {
        if !site_names.insert(site.name.as_str()) {
            errors.push(ConfigError::new(
                ConfigErrorKind::DuplicateName,
                format!("Duplicate site name: {}", site.name),
            ));
        }
        if !(site.carbon_intensity >= 0.0) {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidValue,
                format!("Site '{}' has negative carbon intensity", site.name),
            ));
        }
        if !(site.hardware_capacity >= 0.0) {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidValue,
                format!("Site '{}' has negative hardware capacity", site.name),
            ));
        }
    }

    let mut task_names = HashSet::new();
    for task in tasks {
        if !task_names.insert(task.name.as_str()) {
            errors.push(ConfigError::new(
                ConfigErrorKind::DuplicateName,
                format!("Duplicate task name: {}", task.name),
            ));
        }
        if !(task.throughput_per_instance > 0.0) {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidValue,
                format!("Task '{}' must have positive throughput", task.name),
            ));
        }
        if !(task.compute_footprint >= 0.0) {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidValue,
                format!("Task '{}' has negative compute footprint", task.name),
            ));
        }
        if !(task.latency_budget_ms >= 0.0) || !(task.overhead_ms >= 0.0) {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidValue,
                format!("Task '{}' has negative latency parameters", task.name),
            ));
        }
        if !(task.carbon_weight >= 0.0) {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidValue,
                format!("Task '{}' has negative carbon weight", task.name),
            ));
        }
    }

    // Delay matrix: known endpoints, non-negative, all cross pairs present
    for (source, row) in delay {
        if !site_names.contains(source.as_str()) {
            errors.push(ConfigError::new(
                ConfigErrorKind::UnknownSite,
                format!("Delay matrix references unknown source site '{source}'"),
            ));
        }
        for (dest, &value) in row {
            if !site_names.contains(dest.as_str()) {
                errors.push(ConfigError::new(
                    ConfigErrorKind::UnknownSite,
                    format!("Delay matrix references unknown destination site '{dest}'"),
                ));
            }
            if !(value >= 0.0) {
                errors.push(ConfigError::new(
                    ConfigErrorKind::InvalidValue,
                    format!("Delay {source}→{dest} is negative"),
                ));
            }
        }
    }
    for source in sites {
        for dest in sites {
            if source.name == dest.name {
                continue; // Self-delay defaults to 0
            }
            let present = delay
                .get(&source.name)
                .is_some_and(|row| row.contains_key(&dest.name));
            if !present {
                errors.push(ConfigError::new(
                    ConfigErrorKind::MissingDelay,
                    format!("No delay entry for {}→{}", source.name, dest.name),
                ));
            }
        }
    }

    // Demand: resolvable keys, non-negative loads, all periods present
    let mut seen_periods = HashSet::new();
    for (period_key, per_site) in demand {
        match period_key.parse::<usize>() {
            Ok(period) if period < duration_periods => {
                seen_periods.insert(period);
            }
            Ok(period) => {
                errors.push(ConfigError::new(
                    ConfigErrorKind::UnknownPeriod,
                    format!("Demand period {period} outside duration {duration_periods}"),
                ));
            }
            Err(_) => {
                errors.push(ConfigError::new(
                    ConfigErrorKind::UnknownPeriod,
                    format!("Demand period key '{period_key}' is not an index"),
                ));
            }
        }
        for (site, per_task) in per_site {
            if !site_names.contains(site.as_str()) {
                errors.push(ConfigError::new(
                    ConfigErrorKind::UnknownSite,
                    format!("Demand references unknown site '{site}'"),
                ));
            }
            for (task, &load) in per_task {
                if !task_names.contains(task.as_str()) {
                    errors.push(ConfigError::new(
                        ConfigErrorKind::UnknownTask,
                        format!("Demand references unknown task '{task}'"),
                    ));
                }
                if !(load >= 0.0) {
                    errors.push(ConfigError::new(
                        ConfigErrorKind::InvalidValue,
                        format!("Demand for ({site}, {task}) in period {period_key} is negative"),
                    ));
                }
            }
        }
    }
    for period in 0..duration_periods {
        if !seen_periods.contains(&period) {
            errors.push(ConfigError::new(
                ConfigErrorKind::MissingPeriod,
                format!("Demand has no entry for period {period}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
