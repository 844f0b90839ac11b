// crates/core/src/catalog.rs
//! Job catalog: enumerates job descriptors from the plot dimensions.
//!
//! Jobs are chunked by city so one external-process invocation can reuse a
//! loaded simulation. A profile selects default dimension subsets; explicit
//! override lists replace the profile's choice for that dimension.

use std::str::FromStr;

use crate::error::CatalogError;
use crate::types::JobDescriptor;

/// Empirical cost of producing one plot, measured on the full runner.
pub const SECONDS_PER_PLOT: f64 = 4.05;

/// Cities verified to have prerun simulation data.
pub const CITIES: &[&str] = &[
    "C.12060", "C.12420", "C.12580", "C.12940", "C.14460", "C.16740", "C.16980", "C.17460",
    "C.18140", "C.19100", "C.19820", "C.26420", "C.26900", "C.27260", "C.29820", "C.31080",
    "C.32820", "C.33100", "C.35380", "C.35620", "C.36740", "C.37980", "C.38060", "C.40140",
    "C.40900", "C.41700", "C.41740", "C.41860", "C.42660", "C.45300", "C.47900",
];

pub const SCENARIOS: &[&str] = &["cessation", "brief_interruption", "prolonged_interruption"];

pub const OUTCOMES: &[&str] = &[
    "incidence", "diagnosed.prevalence", "suppression", "testing", "prep.uptake", "awareness",
    "rw.clients", "adap.clients", "non.adap.clients", "oahs.clients", "adap.proportion",
    "oahs.suppression", "adap.suppression", "new",
];

pub const STATISTICS: &[&str] = &[
    "mean.and.interval",
    "median.and.interval",
    "individual.simulation",
];

/// All facet choices: none, each single dimension, and every combination.
pub const FACETS: &[&str] = &[
    "none", "age", "race", "sex", "risk",
    "age+race", "age+sex", "age+risk", "race+sex", "race+risk", "sex+risk",
    "age+race+sex", "age+race+risk", "age+sex+risk", "race+sex+risk",
    "age+race+sex+risk",
];

/// Named configuration profile selecting default dimension subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Single city/scenario/outcome/statistic/facet: exactly 1 plot.
    Minimal,
    /// 4 cities, 3 outcomes, 1 statistic, 3 facets: 108 plots.
    Test,
    /// 6 cities, 5 outcomes, 2 statistics, 5 facets: ~1,000 plots.
    Medium,
    /// Every dimension value.
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Minimal => "minimal",
            Profile::Test => "test",
            Profile::Medium => "medium",
            Profile::Full => "full",
        }
    }
}

impl FromStr for Profile {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(Profile::Minimal),
            "test" => Ok(Profile::Test),
            "medium" => Ok(Profile::Medium),
            "full" => Ok(Profile::Full),
            other => Err(CatalogError::UnknownProfile {
                name: other.to_string(),
            }),
        }
    }
}

/// The dimension lists a batch will be generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimensions {
    pub cities: Vec<String>,
    pub scenarios: Vec<String>,
    pub outcomes: Vec<String>,
    pub statistics: Vec<String>,
    pub facets: Vec<String>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Dimensions {
    /// Default dimension subsets for a profile.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Minimal => Self {
                cities: owned(&["C.12580"]),
                scenarios: owned(&["cessation"]),
                outcomes: owned(&["incidence"]),
                statistics: owned(&["mean.and.interval"]),
                facets: owned(&["none"]),
            },
            Profile::Test => Self {
                cities: owned(&["C.12580", "C.12940", "C.14460", "C.16740"]),
                scenarios: owned(SCENARIOS),
                outcomes: owned(&["incidence", "diagnosed.prevalence", "adap.proportion"]),
                statistics: owned(&["mean.and.interval"]),
                facets: owned(&["none", "sex", "age"]),
            },
            Profile::Medium => Self {
                cities: owned(&[
                    "C.12580", "C.12940", "C.14460", "C.16740", "C.19100", "C.26420",
                ]),
                scenarios: owned(SCENARIOS),
                outcomes: owned(&[
                    "incidence",
                    "diagnosed.prevalence",
                    "adap.proportion",
                    "suppression",
                    "prep.uptake",
                ]),
                statistics: owned(&["mean.and.interval", "median.and.interval"]),
                facets: owned(&["none", "sex", "age", "race", "sex+age"]),
            },
            Profile::Full => Self {
                cities: owned(CITIES),
                scenarios: owned(SCENARIOS),
                outcomes: owned(OUTCOMES),
                statistics: owned(STATISTICS),
                facets: owned(FACETS),
            },
        }
    }

    /// Plots produced per city for these dimensions.
    pub fn plots_per_city(&self) -> usize {
        self.scenarios.len() * self.outcomes.len() * self.statistics.len() * self.facets.len()
    }
}

/// Optional per-dimension override lists; `None` keeps the profile default.
#[derive(Debug, Clone, Default)]
pub struct DimensionOverrides {
    pub cities: Option<Vec<String>>,
    pub scenarios: Option<Vec<String>>,
    pub outcomes: Option<Vec<String>>,
    pub statistics: Option<Vec<String>>,
    pub facets: Option<Vec<String>>,
}

impl DimensionOverrides {
    fn apply(&self, mut dims: Dimensions) -> Dimensions {
        if let Some(cities) = &self.cities {
            dims.cities = cities.clone();
        }
        if let Some(scenarios) = &self.scenarios {
            dims.scenarios = scenarios.clone();
        }
        if let Some(outcomes) = &self.outcomes {
            dims.outcomes = outcomes.clone();
        }
        if let Some(statistics) = &self.statistics {
            dims.statistics = statistics.clone();
        }
        if let Some(facets) = &self.facets {
            dims.facets = facets.clone();
        }
        dims
    }
}

/// Generate one job descriptor per city from a profile plus overrides.
pub fn generate_jobs(profile: Profile, overrides: &DimensionOverrides) -> Vec<JobDescriptor> {
    let dims = overrides.apply(Dimensions::for_profile(profile));
    generate_jobs_from(&dims)
}

/// Generate one job descriptor per city from explicit dimension lists.
pub fn generate_jobs_from(dims: &Dimensions) -> Vec<JobDescriptor> {
    let expected_plots = dims.plots_per_city();
    let estimated_hours = estimate_hours(expected_plots);

    dims.cities
        .iter()
        .map(|city| JobDescriptor {
            city: city.clone(),
            scenarios: dims.scenarios.clone(),
            outcomes: dims.outcomes.clone(),
            statistics: dims.statistics.clone(),
            facets: dims.facets.clone(),
            expected_plots,
            estimated_hours,
        })
        .collect()
}

/// Estimated duration for `plots` plots, in hours rounded to 2 decimals.
pub fn estimate_hours(plots: usize) -> f64 {
    let seconds = plots as f64 * SECONDS_PER_PLOT;
    (seconds / 3600.0 * 100.0).round() / 100.0
}

/// Total expected plots across a batch.
pub fn total_expected_plots(jobs: &[JobDescriptor]) -> usize {
    jobs.iter().map(|j| j.expected_plots).sum()
}

/// Sum of per-job estimates: sequential wall-clock hours.
pub fn estimated_total_hours(jobs: &[JobDescriptor]) -> f64 {
    jobs.iter().map(|j| j.estimated_hours).sum()
}

/// The longest single job: ideal parallel wall-clock hours.
pub fn estimated_parallel_hours(jobs: &[JobDescriptor]) -> f64 {
    jobs.iter().map(|j| j.estimated_hours).fold(0.0, f64::max)
}

/// Plot count of the complete catalog, used for full-scale extrapolation.
pub fn full_scale_plot_count() -> usize {
    let full = Dimensions::for_profile(Profile::Full);
    full.cities.len() * full.plots_per_city()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expected_plots_is_dimension_product() {
        let overrides = DimensionOverrides {
            cities: Some(vec!["C.12580".to_string(), "C.12940".to_string()]),
            scenarios: Some(vec!["cessation".to_string(), "brief_interruption".to_string()]),
            outcomes: Some(vec![
                "incidence".to_string(),
                "suppression".to_string(),
                "testing".to_string(),
            ]),
            statistics: Some(vec!["mean.and.interval".to_string()]),
            facets: Some(vec!["none".to_string(), "sex".to_string()]),
        };
        let jobs = generate_jobs(Profile::Full, &overrides);
        assert_eq!(jobs.len(), 2);
        for job in &jobs {
            assert_eq!(
                job.expected_plots,
                job.scenarios.len() * job.outcomes.len() * job.statistics.len() * job.facets.len()
            );
            assert_eq!(job.expected_plots, 2 * 3 * 1 * 2);
        }
    }

    #[test]
    fn test_minimal_profile_yields_one_plot() {
        let jobs = generate_jobs(Profile::Minimal, &DimensionOverrides::default());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].city, "C.12580");
        assert_eq!(jobs[0].expected_plots, 1);
        assert_eq!(total_expected_plots(&jobs), 1);
    }

    #[test]
    fn test_test_profile_yields_108_plots() {
        let jobs = generate_jobs(Profile::Test, &DimensionOverrides::default());
        assert_eq!(jobs.len(), 4);
        for job in &jobs {
            // 3 scenarios x 3 outcomes x 1 statistic x 3 facets
            assert_eq!(job.expected_plots, 27);
        }
        assert_eq!(total_expected_plots(&jobs), 108);
    }

    #[test]
    fn test_all_profiles_nonempty() {
        for profile in [Profile::Minimal, Profile::Test, Profile::Medium, Profile::Full] {
            let jobs = generate_jobs(profile, &DimensionOverrides::default());
            assert!(!jobs.is_empty(), "profile {:?} produced no jobs", profile);
            assert!(total_expected_plots(&jobs) > 0);
        }
    }

    #[test]
    fn test_full_profile_magnitude() {
        let jobs = generate_jobs(Profile::Full, &DimensionOverrides::default());
        assert_eq!(jobs.len(), 31);
        // 3 x 14 x 3 x 16 per city
        assert_eq!(jobs[0].expected_plots, 2016);
        assert_eq!(total_expected_plots(&jobs), full_scale_plot_count());
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!("minimal".parse::<Profile>().unwrap(), Profile::Minimal);
        assert_eq!("test".parse::<Profile>().unwrap(), Profile::Test);
        assert_eq!("medium".parse::<Profile>().unwrap(), Profile::Medium);
        assert_eq!("full".parse::<Profile>().unwrap(), Profile::Full);
        assert!("gigantic".parse::<Profile>().is_err());
    }

    #[test]
    fn test_estimate_hours_rounding() {
        // 27 plots x 4.05s = 109.35s = 0.030375h, rounded to 0.03
        assert_eq!(estimate_hours(27), 0.03);
        // 2016 plots x 4.05s = 8164.8s = 2.268h, rounded to 2.27
        assert_eq!(estimate_hours(2016), 2.27);
        assert_eq!(estimate_hours(0), 0.0);
    }

    #[test]
    fn test_parallel_hours_is_max_job_estimate() {
        let jobs = generate_jobs(Profile::Test, &DimensionOverrides::default());
        let per_job = jobs[0].estimated_hours;
        assert_eq!(estimated_parallel_hours(&jobs), per_job);
        assert!((estimated_total_hours(&jobs) - per_job * 4.0).abs() < 1e-9);
    }
}
