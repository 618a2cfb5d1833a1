//! Tournament scheduling: Comparative and Competitive modes (C8).
//!
//! A small hand-rolled `WorkerPool` gives the enqueue/wait_for_all/shutdown
//! contract design notes §9 and spec §5 call for, sized by the caller's
//! `num_threads`, and collapses to synchronous, same-thread execution at
//! size <= 1. Every task it dispatches writes its outcome into a
//! mutex-protected results vector rather than returning a value, the way
//! the teacher's `Population::evaluate` reduces under a lock instead of
//! threading results back through a return type.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use crate::engine::GameResult;
use crate::error_collector::ErrorCollector;
use crate::map::BoardInfo;
use crate::match_runner::run_match;

/// Runs enqueued closures on a fixed pool of OS threads. A pool built with
/// `size <= 1` runs every job synchronously on the caller's thread and
/// spawns no background threads at all.
pub struct WorkerPool {
    sender: Option<mpsc::Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
    synchronous: bool,
}

type Job = Box<dyn FnOnce() + Send + 'static>;

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        if size <= 1 {
            return WorkerPool { sender: None, workers: Vec::new(), synchronous: true };
        }

        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let mut workers = Vec::with_capacity(size);
        for _ in 0..size {
            let receiver = Arc::clone(&receiver);
            workers.push(thread::spawn(move || loop {
                let job = { receiver.lock().unwrap().recv() };
                match job {
                    Ok(job) => job(),
                    Err(_) => break,
                }
            }));
        }
        WorkerPool { sender: Some(sender), workers, synchronous: false }
    }

    /// Enqueue `job`. In synchronous mode it runs immediately on this
    /// thread before `enqueue` returns.
    pub fn enqueue(&self, job: impl FnOnce() + Send + 'static) {
        match &self.sender {
            Some(sender) => sender.send(Box::new(job)).expect("worker pool channel closed"),
            None => job(),
        }
    }

    /// No-op beyond a synchronization point: every enqueued job has
    /// already completed (synchronous mode) or is drained by `shutdown`.
    pub fn wait_for_all(&self) {}

    /// Drain the queue, join every worker, and stop accepting new jobs.
    pub fn shutdown(mut self) {
        if let Some(sender) = self.sender.take() {
            drop(sender);
        }
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }

    pub fn is_synchronous(&self) -> bool {
        self.synchronous
    }
}

/// Run one match, catching a panic from inside a (not fully trusted)
/// plugin at the task boundary instead of letting it unwind into the
/// scheduler.
fn run_match_catching(
    board_info: &BoardInfo,
    engine_name: &str,
    algo1: &str,
    algo2: &str,
) -> Result<GameResult, String> {
    match catch_unwind(AssertUnwindSafe(|| run_match(board_info, engine_name, algo1, algo2, false))) {
        Ok(Ok((result, _))) => Ok(result),
        Ok(Err(plugin_error)) => Err(plugin_error.to_string()),
        Err(_) => Err("match task panicked".to_string()),
    }
}

/// One comparative-mode equivalence group: the engines whose runs on this
/// map and algorithm pair produced a bit-identical outcome.
pub struct ComparativeGroup {
    pub engine_names: Vec<String>,
    pub result: GameResult,
}

fn outcome_key(r: &GameResult) -> (u32, &'static str, u32, String) {
    (r.winner, r.reason.label(), r.rounds, r.final_board_text.clone())
}

/// One map, one algorithm pair, several engine implementations: run each
/// once across a pool of `num_threads` worker threads (synchronous on the
/// caller's thread when `num_threads <= 1`) and group bit-identical
/// outcomes.
pub fn run_comparative(
    board_info: &BoardInfo,
    engine_names: &[String],
    algo1: &str,
    algo2: &str,
    num_threads: usize,
    errors: &Arc<Mutex<ErrorCollector>>,
) -> Vec<ComparativeGroup> {
    let pool = WorkerPool::new(num_threads);
    let board_info = Arc::new(board_info.deep_clone());
    let algo1 = Arc::new(algo1.to_string());
    let algo2 = Arc::new(algo2.to_string());
    let outcomes: Arc<Mutex<Vec<(String, Option<GameResult>)>>> = Arc::new(Mutex::new(Vec::with_capacity(engine_names.len())));

    for engine_name in engine_names {
        let board_info = Arc::clone(&board_info);
        let algo1 = Arc::clone(&algo1);
        let algo2 = Arc::clone(&algo2);
        let outcomes = Arc::clone(&outcomes);
        let errors = Arc::clone(errors);
        let engine_name = engine_name.clone();
        pool.enqueue(move || {
            let outcome = match run_match_catching(&board_info, &engine_name, &algo1, &algo2) {
                Ok(result) => (engine_name.clone(), Some(result)),
                Err(reason) => {
                    errors.lock().unwrap().add_game_manager_error(&engine_name, &reason);
                    (engine_name.clone(), None)
                }
            };
            outcomes.lock().unwrap().push(outcome);
        });
    }
    pool.wait_for_all();
    pool.shutdown();

    let outcomes = Arc::try_unwrap(outcomes).unwrap().into_inner().unwrap();
    let mut groups: Vec<ComparativeGroup> = Vec::new();
    for (name, result) in outcomes {
        let Some(result) = result else { continue };
        let key = outcome_key(&result);
        if let Some(group) = groups.iter_mut().find(|g| outcome_key(&g.result) == key) {
            group.engine_names.push(name);
        } else {
            groups.push(ComparativeGroup { engine_names: vec![name], result });
        }
    }
    groups
}

/// The pairing formula from spec §4.8: for map index `k` over `n`
/// algorithms, `{ sort({i, (i + 1 + k mod (n-1)) mod n}) : 0 <= i < n }`,
/// deduplicated and with no self-pair.
pub fn pairings_for_map(n: usize, k: usize) -> Vec<(usize, usize)> {
    if n < 2 {
        return Vec::new();
    }
    let mut pairs = Vec::new();
    for i in 0..n {
        let offset = 1 + (k % (n - 1));
        let j = (i + offset) % n;
        if i == j {
            continue;
        }
        let pair = if i < j { (i, j) } else { (j, i) };
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
    pairs
}

/// Per-algorithm standing in a competitive tournament.
#[derive(Clone, Debug)]
pub struct Standing {
    pub algorithm_name: String,
    pub score: u32,
}

/// Many maps, many algorithms, one engine: dispatch a game per unordered
/// pair per map across a pool of `num_threads` worker threads
/// (synchronous on the caller's thread when `num_threads <= 1`), score
/// 3/1/0, and sort descending by score.
pub fn run_competitive(
    boards: &[BoardInfo],
    algorithm_names: &[String],
    engine_name: &str,
    num_threads: usize,
    errors: &Arc<Mutex<ErrorCollector>>,
) -> Vec<Standing> {
    let pool = WorkerPool::new(num_threads);
    let algorithm_names_arc = Arc::new(algorithm_names.to_vec());
    let engine_name = Arc::new(engine_name.to_string());
    let scores: Arc<Vec<Mutex<u32>>> = Arc::new(algorithm_names.iter().map(|_| Mutex::new(0)).collect());

    for (k, board_info) in boards.iter().enumerate() {
        let pairs = pairings_for_map(algorithm_names.len(), k);
        let board_info = Arc::new(board_info.deep_clone());
        for (i, j) in pairs {
            let board_info = Arc::clone(&board_info);
            let algorithm_names = Arc::clone(&algorithm_names_arc);
            let engine_name = Arc::clone(&engine_name);
            let scores = Arc::clone(&scores);
            let errors = Arc::clone(errors);
            pool.enqueue(move || {
                match run_match_catching(&board_info, &engine_name, &algorithm_names[i], &algorithm_names[j]) {
                    Ok(result) => {
                        let (delta_i, delta_j) = match result.winner {
                            0 => (1, 1),
                            w if w == 1 => (3, 0),
                            _ => (0, 3),
                        };
                        *scores[i].lock().unwrap() += delta_i;
                        *scores[j].lock().unwrap() += delta_j;
                    }
                    Err(reason) => {
                        errors.lock().unwrap().add_algorithm_error(&board_info.name, &reason);
                    }
                }
            });
        }
    }
    pool.wait_for_all();
    pool.shutdown();

    let scores = Arc::try_unwrap(scores).unwrap();
    let mut standings: Vec<Standing> = algorithm_names
        .iter()
        .zip(scores.iter())
        .map(|(name, score)| Standing { algorithm_name: name.clone(), score: *score.lock().unwrap() })
        .collect();
    standings.sort_by(|a, b| b.score.cmp(&a.score));
    standings
}
