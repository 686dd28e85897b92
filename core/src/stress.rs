use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ttable::{TableConfig, TableError, TableStats, TranspositionTable};

use crate::args::Args;
use crate::payload::{Bound, SearchEntry, SearchResult};

/// Half-width of the synthetic alpha-beta window.
const WINDOW: i16 = 40;
const MAX_SCORE: i16 = 1000;

pub fn run(args: &Args, config: &TableConfig) -> Result<(), TableError> {
    let table = TranspositionTable::from_config(config)?;

    let stress = Stress::new(table, args, config.clear_between_searches.value);
    stress.run();

    Ok(())
}

/// Simulates the probe-then-store traffic of an iterative search over a
/// fixed pool of positions, one generation per move.
struct Stress {
    table: TranspositionTable<SearchEntry>,
    rng: StdRng,
    positions: Vec<u64>,
    generations: u32,
    inserts: usize,
    max_depth: u8,
    clear: bool,
}

impl Stress {
    fn new(table: TranspositionTable<SearchEntry>, args: &Args, clear: bool) -> Self {
        let mut rng = StdRng::seed_from_u64(args.seed);
        let positions = (0..args.key_space.max(1)).map(|_| rng.gen()).collect();

        Self {
            table,
            rng,
            positions,
            generations: args.generations,
            inserts: args.inserts,
            max_depth: args.max_depth,
            clear,
        }
    }

    fn run(mut self) {
        self.print_header();

        let mut totals = Totals::default();
        for generation in 1..=self.generations {
            let report = self.run_generation(generation);
            Self::print_generation(&report);
            totals.add(&report);

            self.next_generation();
        }

        self.print_summary(&totals);
    }

    fn print_header(&self) {
        println!(
            "Running stress: {} generations x {} inserts, {} positions, {} slots, {}\n",
            self.generations,
            self.inserts,
            self.positions.len(),
            self.table.capacity(),
            if self.clear { "clear" } else { "age" }
        );
    }

    fn run_generation(&mut self, generation: u32) -> GenerationReport {
        let start = Instant::now();
        let mut hits = 0;
        let mut misses = 0;
        let mut cutoffs = 0;

        for _ in 0..self.inserts {
            let key = self.positions[self.rng.gen_range(0..self.positions.len())];
            let depth = self.rng.gen_range(0..=self.max_depth);

            match self.table.probe_mut(key) {
                // Deep enough to reuse: the search would return without storing
                Some(entry) if entry.depth >= depth => {
                    hits += 1;
                    cutoffs += 1;
                    entry.stale = false;
                    trace!("Cutoff {:#018x} depth {}: {}", key, entry.depth, entry.payload);
                    continue;
                }
                Some(_) => hits += 1,
                None => misses += 1,
            }

            let result = self.search_result();
            self.table.insert(SearchEntry::new(key, depth, result));
        }

        GenerationReport {
            generation,
            probes: self.inserts,
            hits,
            misses,
            cutoffs,
            stats: self.table.stats(),
            elapsed: start.elapsed(),
        }
    }

    fn search_result(&mut self) -> SearchResult {
        let value = self.rng.gen_range(-MAX_SCORE..=MAX_SCORE);
        let center = self.rng.gen_range(-MAX_SCORE..=MAX_SCORE);

        SearchResult {
            value,
            bound: Bound::classify(value, center - WINDOW, center + WINDOW),
            best_move_packed: self.rng.gen(),
        }
    }

    fn next_generation(&mut self) {
        self.table.reset_collisions();

        if self.clear {
            self.table.clear();
        } else {
            self.table.age();
        }
    }

    fn print_generation(report: &GenerationReport) {
        println!(
            "generation {} probes {} hits {} misses {} cutoffs {} {} time {} ms",
            report.generation,
            report.probes,
            report.hits,
            report.misses,
            report.cutoffs,
            report.stats,
            report.elapsed.as_millis()
        );
        debug!("Generation {} finished: {}", report.generation, report.stats);
    }

    fn print_summary(&self, totals: &Totals) {
        println!("\n=== Stress Summary ===");
        println!("Probes: {}", totals.probes);
        println!("Hits: {} ({:.1}%)", totals.hits, percent(totals.hits, totals.probes));
        println!(
            "Misses: {} ({:.1}%)",
            totals.misses,
            percent(totals.misses, totals.probes)
        );
        println!(
            "Cutoffs: {} ({:.1}%)",
            totals.cutoffs,
            percent(totals.cutoffs, totals.probes)
        );
        println!("Collisions: {}", totals.collisions);
        // Table state as the last generation left it, before aging or clearing
        if let Some(stats) = totals.last_stats {
            println!("Filled: {} / {}", stats.filled, stats.capacity);
            println!("Hashfull: {}", stats.hashfull);
        }
        println!("Time: {} ms", totals.elapsed.as_millis());

        info!(
            "Stress finished: {} probes, {} collisions, {} ms",
            totals.probes,
            totals.collisions,
            totals.elapsed.as_millis()
        );
    }
}

struct GenerationReport {
    generation: u32,
    probes: usize,
    hits: usize,
    misses: usize,
    cutoffs: usize,
    stats: TableStats,
    elapsed: Duration,
}

#[derive(Default)]
struct Totals {
    probes: usize,
    hits: usize,
    misses: usize,
    cutoffs: usize,
    collisions: u64,
    elapsed: Duration,
    last_stats: Option<TableStats>,
}

impl Totals {
    fn add(&mut self, report: &GenerationReport) {
        self.probes += report.probes;
        self.hits += report.hits;
        self.misses += report.misses;
        self.cutoffs += report.cutoffs;
        self.collisions += report.stats.collisions;
        self.elapsed += report.elapsed;
        self.last_stats = Some(report.stats);
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn stress(extra: &[&str]) -> Stress {
        let args = Args::try_parse_from(
            ["ttstress", "--entries", "1000", "--inserts", "5000", "--key-space", "3000"]
                .into_iter()
                .chain(extra.iter().copied()),
        )
        .unwrap();
        let config = args.table_config().unwrap();
        let table = TranspositionTable::from_config(&config).unwrap();
        Stress::new(table, &args, config.clear_between_searches.value)
    }

    #[test]
    fn test_generation_counts() {
        let mut stress = stress(&[]);
        let report = stress.run_generation(1);

        assert_eq!(report.probes, 5000);
        assert!(report.cutoffs <= report.hits);
        assert_eq!(report.hits + report.misses, report.probes);
        // The first generation starts empty, so the first probe always misses
        assert!(report.misses > 0);
        assert_eq!(report.stats.capacity, 1001);
        assert!(report.stats.filled > 0);
        assert!(report.stats.filled <= report.stats.capacity);
        // 3000 positions over 1001 slots must collide
        assert!(report.stats.collisions > 0);
    }

    #[test]
    fn test_aging_keeps_entries() {
        let mut stress = stress(&[]);
        stress.run_generation(1);
        let filled = stress.table.filled();

        stress.next_generation();
        assert_eq!(stress.table.filled(), filled);
        assert_eq!(stress.table.collisions(), 0);
    }

    #[test]
    fn test_clear_between_generations() {
        let mut stress = stress(&["--clear"]);
        stress.run_generation(1);
        stress.next_generation();

        assert_eq!(stress.table.filled(), 0);
        assert_eq!(stress.table.collisions(), 0);
    }

    #[test]
    fn test_same_seed_same_traffic() {
        let first = stress(&["--seed", "42"]).run_generation(1);
        let second = stress(&["--seed", "42"]).run_generation(1);

        assert_eq!(first.hits, second.hits);
        assert_eq!(first.stats.filled, second.stats.filled);
        assert_eq!(first.stats.collisions, second.stats.collisions);
    }

    #[test]
    fn test_totals_keep_last_generation_state() {
        let mut stress = stress(&["--clear"]);
        let mut totals = Totals::default();

        let first = stress.run_generation(1);
        totals.add(&first);
        stress.next_generation();
        let second = stress.run_generation(2);
        totals.add(&second);
        stress.next_generation();

        assert_eq!(totals.probes, 10_000);
        assert_eq!(totals.hits + totals.misses, totals.probes);
        assert_eq!(totals.last_stats, Some(second.stats));
        assert!(totals.last_stats.unwrap().filled > 0);
        assert_eq!(stress.table.filled(), 0);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
