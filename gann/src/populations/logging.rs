use super::Population;

use crate::Genome;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllGenomes,
    /// Clones only the population champion.
    PopulationChampion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a population.
#[derive(Clone, Debug)]
pub struct Log {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord,
    pub genome_count: usize,
    pub record_fitness: f64,
    pub genome_stats: Vec<(String, Stats)>,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \tgenome_count: {:?}\n\
            \trecord_fitness: {:?}\n\
            {}\
            }}",
            &self.generation_number,
            &self.genome_count,
            &self.record_fitness,
            self.genome_stats
                .iter()
                .map(|(name, stats)| format!("\t{}: {:?}\n", name, stats))
                .collect::<Vec<_>>()
                .join("")
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if it is empty.
    ///
    /// # Examples
    /// ```
    /// use gann::logging::Stats;
    ///
    /// let stats = Stats::from_values([-2.0, -1.0, 0.5, 1.0, 1.5]).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from_values(data: impl IntoIterator<Item = f64>) -> Option<Stats> {
        let mut data: Vec<f64> = data.into_iter().collect();
        if data.is_empty() {
            return None;
        }
        data.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f64>() / data.len() as f64,
            median,
        })
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord {
    /// Every genome, in ID order.
    Genomes(Vec<Genome>),
    /// Only the population champion.
    PopulationChampion(Genome),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population.
    ///
    /// The `genome_stat_extractor` provides a way of
    /// obtaining arbitrary statistics on the population,
    /// where each statistic is named by `stat_names`.
    /// Snapshots are meant to be taken once every genome
    /// has been evaluated, right before the epoch.
    ///
    /// # Examples
    /// ```
    /// use gann::{Population, PopulationConfig};
    /// use gann::logging::{EvolutionLogger, ReportingLevel};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let mut logger = EvolutionLogger::new(ReportingLevel::PopulationChampion);
    /// let mut population = Population::new(PopulationConfig::default(), 3, &mut rng).unwrap();
    ///
    /// population.evaluate_fitness(|g| g.chromosome()[0]).unwrap();
    /// logger.log(&population, &|g| [g.fitness(), g.chromosome()[1]], ["fitness", "gene 1"]);
    ///
    /// let log = logger.iter().next().unwrap();
    /// assert_eq!(log.genome_stats[0].0, "fitness");
    /// assert_eq!(log.genome_stats[0].1.maximum, population.champion().unwrap().fitness());
    /// ```
    pub fn log<GSE, const N: usize>(
        &mut self,
        population: &Population,
        genome_stat_extractor: &GSE,
        stat_names: [&str; N],
    ) where
        GSE: Fn(&Genome) -> [f64; N],
    {
        let stats: Vec<[f64; N]> = population.genomes().map(genome_stat_extractor).collect();
        let genome_stats = stat_names
            .iter()
            .cloned()
            .map(String::from)
            .zip(unzip_n_vecs(stats.into_iter()))
            .filter_map(|(name, data)| Stats::from_values(data).map(|stats| (name, stats)))
            .collect();
        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample: match self.reporting_level {
                ReportingLevel::AllGenomes => {
                    GenerationMemberRecord::Genomes(population.genomes().cloned().collect())
                }
                ReportingLevel::PopulationChampion => match population.champion() {
                    Some(champion) => GenerationMemberRecord::PopulationChampion(champion.clone()),
                    None => GenerationMemberRecord::None,
                },
                ReportingLevel::NoGenomes => GenerationMemberRecord::None,
            },
            genome_count: population.len(),
            record_fitness: population.record_fitness(),
            genome_stats,
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }
}

fn unzip_n_vecs<T: Clone, const N: usize>(iter: impl Iterator<Item = [T; N]>) -> Vec<Vec<T>> {
    let mut vecs = vec![Vec::default(); N];
    for items in iter {
        for (vec, item) in vecs.iter_mut().zip(items) {
            vec.push(item);
        }
    }
    vecs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenomeId, PopulationConfig};
    use std::num::NonZeroUsize;

    #[test]
    fn even_median() {
        let stats = Stats::from_values([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(Stats::from_values(std::iter::empty()), None);
    }

    #[test]
    fn unzip() {
        let v = unzip_n_vecs(vec![[1, 2], [3, 4], [5, 6]].into_iter());
        assert_eq!(v, vec![vec![1, 3, 5], vec![2, 4, 6]]);
    }

    #[test]
    fn logs_every_generation() {
        let genomes = (0..3).map(|i| Genome::new(vec![i as f64])).collect();
        let mut population = Population::from_genomes(
            PopulationConfig {
                size: NonZeroUsize::new(3).unwrap(),
                ..PopulationConfig::zero()
            },
            genomes,
        )
        .unwrap();
        let mut logger = EvolutionLogger::new(ReportingLevel::AllGenomes);

        for i in 0..3 {
            population.update_fitness(GenomeId(i), i as f64 + 1.0).unwrap();
        }
        logger.log(&population, &|g| [g.fitness()], ["fitness"]);

        let log = logger.iter().next().unwrap();
        assert_eq!(log.generation_number, 0);
        assert_eq!(log.genome_count, 3);
        assert_eq!(log.record_fitness, 3.0);
        assert_eq!(
            log.genome_stats,
            vec![(
                "fitness".to_string(),
                Stats {
                    maximum: 3.0,
                    minimum: 1.0,
                    mean: 2.0,
                    median: 2.0
                }
            )]
        );
        assert!(matches!(
            &log.generation_sample,
            GenerationMemberRecord::Genomes(g) if g.len() == 3
        ));
        assert!(log.to_string().contains("generation_number: 0"));
    }
}
