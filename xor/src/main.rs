use gann::logging::{EvolutionLogger, ReportingLevel, Stats};
use gann::rng::rand_int;
use gann::{DimensionError, Genome, GenomeId, Population, PopulationConfig, ReportedFitness};
use gann_nn::{
    network_performance, seed_population, train, Network, NetworkEvaluator, Sample, Topology,
    TruthTable,
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{error, info, warn};

use std::{fs, process};

/// Truth-table score at which a network is taken to compute XOR.
const SOLVED_FITNESS: f64 = 0.9;
const MAX_GENERATIONS: usize = 200;

fn xor_topology() -> Topology {
    Topology::new(vec![2, 2, 1]).expect("XOR topology is valid")
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "evolve".to_string());
    let config = match args.next() {
        Some(path) => load_config(&path).unwrap_or_else(|e| {
            error!("{}", e);
            process::exit(1);
        }),
        None => PopulationConfig::default(),
    };

    match mode.as_str() {
        "evolve" => evolve(&config),
        "stress" => stress_test(&config),
        "agents" => externally_driven(&config),
        "train" => backprop(),
        "serde" => serde_test(&config),
        _ => {
            eprintln!("usage: xor [evolve|stress|agents|train|serde] [population_config.ron]");
            process::exit(1);
        }
    }
}

fn load_config(path: &str) -> Result<PopulationConfig, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    let config: PopulationConfig = ron::from_str(&text).map_err(|e| format!("{}: {}", path, e))?;
    config.validate().map_err(|e| format!("{}: {}", path, e))?;
    Ok(config)
}

/// Self-contained evolution, each genome scored by a
/// private network against the XOR truth table.
fn evolve(config: &PopulationConfig) {
    let mut rng = StdRng::from_entropy();
    let topology = xor_topology();
    let xor = TruthTable::xor();

    let mut population = match seed_population(config.clone(), &topology, &mut rng) {
        Ok(population) => population,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    let mut evaluator = NetworkEvaluator::new(Network::new(&topology, &mut rng), |network| {
        network_performance(network, &xor, false).unwrap_or(0.0)
    });
    let mut logger = EvolutionLogger::new(ReportingLevel::PopulationChampion);

    for _ in 0..MAX_GENERATIONS {
        if let Err(e) = population.evaluate_with(&mut evaluator) {
            error!("{}", e);
            return;
        }
        logger.log(
            &population,
            &|g| [g.fitness(), g.chromosome().iter().map(|w| w.abs()).sum()],
            ["fitness", "weight magnitude"],
        );
        if solved(&population) {
            break;
        }
        if let Err(e) = population.epoch(&mut rng) {
            error!("{}", e);
            return;
        }
    }

    if let Some(log) = logger.iter().last() {
        println!("{}", log);
    }
    if let Some(champion) = population.champion() {
        if let Err(e) = score_champion(&topology, champion, &xor) {
            warn!("champion could not be scored: {}", e);
        }
        println!("Champion after {} generations: {}", population.generation(), champion);
    }
}

/// Scores a genome on a fresh network, tracing
/// per-case outputs at debug level.
fn score_champion(
    topology: &Topology,
    champion: &Genome,
    table: &TruthTable,
) -> Result<f64, DimensionError> {
    let mut network = Network::new(topology, &mut StdRng::seed_from_u64(0));
    network.load(champion)?;
    network_performance(&mut network, table, true)
}

fn solved(population: &Population) -> bool {
    population
        .champion()
        .map_or(false, |champion| champion.fitness() >= SOLVED_FITNESS)
}

/// Runs many independent evolutions in parallel and reports
/// how many generations successful runs needed.
fn stress_test(config: &PopulationConfig) {
    const ITERATIONS: u64 = 200;

    let generations: Vec<Option<usize>> = (0..ITERATIONS)
        .into_par_iter()
        .map(|seed| run_to_solution(config, seed))
        .collect();

    let failures = generations.iter().filter(|g| g.is_none()).count();
    println!(
        "Successful run generation count {:?}, {}% failure rate over {} iterations",
        Stats::from_values(generations.iter().flatten().map(|g| *g as f64)),
        failures as f64 * 100.0 / ITERATIONS as f64,
        ITERATIONS
    );
}

fn run_to_solution(config: &PopulationConfig, seed: u64) -> Option<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let topology = xor_topology();
    let xor = TruthTable::xor();
    let mut population = seed_population(config.clone(), &topology, &mut rng).ok()?;
    let mut evaluator = NetworkEvaluator::new(Network::new(&topology, &mut rng), |network| {
        network_performance(network, &xor, false).unwrap_or(0.0)
    });

    for _ in 0..MAX_GENERATIONS {
        population.evaluate_with(&mut evaluator).ok()?;
        if solved(&population) {
            return Some(population.generation());
        }
        population.epoch(&mut rng).ok()?;
    }
    None
}

/// Agents own their networks and are scored concurrently;
/// the population only receives their snapshots and reports.
fn externally_driven(config: &PopulationConfig) {
    let mut rng = StdRng::from_entropy();
    let topology = xor_topology();
    let xor = TruthTable::xor();

    let mut agents: Vec<Network> = (0..config.size.get())
        .map(|_| Network::new(&topology, &mut rng))
        .collect();
    let mut population = match Population::empty(config.clone()) {
        Ok(population) => population,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    for agent in &agents {
        if let Err(e) = population.add_genome(agent.snapshot()) {
            error!("{}", e);
            return;
        }
    }

    let mut reports = ReportedFitness::new();
    for _ in 0..MAX_GENERATIONS {
        let genomes: Vec<_> = population.genomes().cloned().collect();
        let scores: Vec<(GenomeId, f64)> = agents
            .par_iter_mut()
            .zip(&genomes)
            .enumerate()
            .map(|(i, (agent, genome))| {
                let score = agent
                    .load(genome)
                    .and_then(|()| network_performance(agent, &xor, false))
                    .map_or(0.0, |score| score.max(0.0));
                (GenomeId(i), score)
            })
            .collect();
        for (id, score) in scores {
            reports.report(id, score);
        }

        if let Err(e) = population.evaluate_with(&mut reports) {
            error!("{}", e);
            return;
        }
        if solved(&population) {
            break;
        }
        if let Err(e) = population.epoch(&mut rng) {
            error!("{}", e);
            return;
        }
    }

    info!(
        generation = population.generation(),
        record_fitness = population.record_fitness(),
        "externally driven run finished"
    );
    if let Some(champion) = population.champion() {
        println!("Champion: {}", champion);
    }
}

/// Plain backpropagation on XOR, then on a small
/// platformer control rule set.
fn backprop() {
    let mut rng = StdRng::from_entropy();

    let xor: Vec<Sample> = TruthTable::xor().cases().to_vec();
    let mut network = Network::new(&xor_topology(), &mut rng);
    for pass in 0..2000 {
        match train(&mut network, &xor) {
            Ok(error) if pass % 500 == 0 => info!(pass, error, "training XOR"),
            Ok(_) => {}
            Err(e) => {
                error!("{}", e);
                return;
            }
        }
    }
    for case in &xor {
        if network.feed_forward(&case.inputs).is_ok() {
            println!("{:?} -> {:?} (target {:?})", case.inputs, network.results(), case.targets);
        }
    }

    let topology = Topology::new(vec![4, 4, 3]).expect("control topology is valid");
    let mut network = Network::new(&topology, &mut rng);
    let samples: Vec<Sample> = (0..2000).map(|_| control_sample(&mut rng)).collect();
    match train(&mut network, &samples) {
        Ok(error) => println!("Control rules recent average error: {:.6}", error),
        Err(e) => error!("{}", e),
    }
}

/// Random sensor readings (pit below, wall behind, ceiling
/// above, wall ahead) and the actions (jump, retreat,
/// advance) expected for them.
fn control_sample<R: Rng + ?Sized>(rng: &mut R) -> Sample {
    let sensors: Vec<bool> = (0..4).map(|_| rand_int(rng, 0, 2) == 1).collect();
    let (floor, behind, above, ahead) = (sensors[0], sensors[1], sensors[2], sensors[3]);

    let jump = !above && (!floor || ahead);
    let retreat = ahead && above && !behind;
    let advance = !ahead || !above;

    let as_value = |b: bool| if b { 1.0 } else { 0.0 };
    Sample::new(
        sensors.iter().copied().map(as_value).collect(),
        vec![as_value(jump), as_value(retreat), as_value(advance)],
    )
}

/// Round-trips a population through RON midway
/// through its evolution.
fn serde_test(config: &PopulationConfig) {
    let mut rng = StdRng::from_entropy();
    let topology = xor_topology();
    let xor = TruthTable::xor();
    let evaluate = |genome: &gann::Genome| {
        let mut network = Network::new(&topology, &mut StdRng::seed_from_u64(0));
        network
            .load(genome)
            .and_then(|()| network_performance(&mut network, &xor, false))
            .map_or(0.0, |score| score.max(0.0))
    };

    let mut population = match seed_population(config.clone(), &topology, &mut rng) {
        Ok(population) => population,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    for _ in 0..10 {
        if let Err(e) = population
            .evaluate_fitness(evaluate)
            .and_then(|()| population.epoch(&mut rng))
        {
            error!("{}", e);
            return;
        }
    }

    let text = match ron::to_string(&population) {
        Ok(text) => text,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    let mut population: Population = match ron::from_str(&text) {
        Ok(population) => population,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    info!(generation = population.generation(), "population restored");

    for _ in 0..MAX_GENERATIONS {
        if let Err(e) = population.evaluate_fitness(evaluate) {
            error!("{}", e);
            return;
        }
        if solved(&population) {
            break;
        }
        if let Err(e) = population.epoch(&mut rng) {
            error!("{}", e);
            return;
        }
    }
    if let Some(champion) = population.champion() {
        println!("{}", champion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn champion_scoring_reports_mismatches() {
        let topology = xor_topology();
        let xor = TruthTable::xor();

        let score = score_champion(&topology, &Genome::new(vec![0.0; 9]), &xor).unwrap();
        assert_eq!(score, 0.5);
        assert_eq!(
            score_champion(&topology, &Genome::new(vec![0.0; 4]), &xor),
            Err(DimensionError::Weights {
                expected: 9,
                found: 4
            })
        );
    }

    #[test]
    fn control_rules_fit_the_control_topology() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..32 {
            let sample = control_sample(&mut rng);
            assert_eq!(sample.inputs.len(), 4);
            assert_eq!(sample.targets.len(), 3);
        }
    }
}
