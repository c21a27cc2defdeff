use std::sync::Arc;
use std::thread;

use crossbeam::channel::bounded;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::core::config::Config;
use crate::eval::relevance::{QueryRow, RelevanceJudgment};
use crate::query::{QueryEngine, QueryMode};

/// One `(query_id, query_text, relevant_doc_id)` unit of work (§4.7).
#[derive(Debug, Clone)]
pub struct EvalTask {
    pub query_id: u32,
    pub query_text: String,
    pub relevant_doc_id: u32,
}

/// Joins queries to their relevance judgments by `query_id`. Queries with no
/// matching judgment are dropped — there is nothing to score them against.
pub fn build_tasks(queries: &[QueryRow], relevance: &[RelevanceJudgment]) -> Vec<EvalTask> {
    queries
        .iter()
        .filter_map(|q| {
            relevance
                .iter()
                .find(|r| r.query_id == q.query_id)
                .map(|r| EvalTask { query_id: q.query_id, query_text: q.text.clone(), relevant_doc_id: r.relevant_doc_id })
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct TaskResult {
    reciprocal_rank: f64,
}

/// A pool of `W` OS threads (default: host logical-core count) sharing one
/// [`QueryEngine`] — and through it, one cross-thread posting cache (§4.7,
/// C7). The task queue is a bounded `crossbeam::channel`; dropping the
/// sender closes it, which is this pool's stop signal — each worker's
/// `recv()` loop ends on its own once the channel is empty and closed, and
/// `JoinHandle::join` is the drain. This is an idiomatic stand-in for the
/// "stop flag + condition variable" contract in §5.
pub struct Pool {
    engine: Arc<QueryEngine>,
    workers: usize,
}

impl Pool {
    pub fn new(config: &Config, engine: QueryEngine) -> Self {
        Pool { engine: Arc::new(engine), workers: config.workers.max(1) }
    }

    /// Runs every task in conjunctive mode and returns `MRR@n` (§4.7, §8 S6).
    pub fn evaluate(&self, tasks: Vec<EvalTask>) -> f64 {
        let (sender, receiver) = bounded::<EvalTask>(self.workers * 4);
        let results = Arc::new(Mutex::new(Vec::with_capacity(tasks.len())));

        let handles: Vec<_> = (0..self.workers)
            .map(|worker_id| {
                let receiver = receiver.clone();
                let engine = Arc::clone(&self.engine);
                let results = Arc::clone(&results);
                thread::spawn(move || {
                    while let Ok(task) = receiver.recv() {
                        let reciprocal_rank = run_task(&engine, &task, worker_id);
                        results.lock().push(TaskResult { reciprocal_rank });
                    }
                })
            })
            .collect();

        for task in tasks {
            if sender.send(task).is_err() {
                break;
            }
        }
        drop(sender);

        for handle in handles {
            let _ = handle.join();
        }

        let results = results.lock();
        if results.is_empty() {
            return 0.0;
        }
        let sum: f64 = results.iter().map(|r| r.reciprocal_rank).sum();
        let mrr = sum / results.len() as f64;
        info!(queries = results.len(), mrr, "evaluation pool finished");
        mrr
    }
}

fn run_task(engine: &QueryEngine, task: &EvalTask, worker_id: usize) -> f64 {
    match engine.search(&task.query_text, QueryMode::Conjunctive) {
        Ok(results) => results
            .iter()
            .position(|r| r.doc_id == task.relevant_doc_id)
            .map(|position| 1.0 / (1.0 + position as f64))
            .unwrap_or(0.0),
        Err(err) => {
            warn!(worker_id, query_id = task.query_id, error = %err, "query failed during evaluation, scoring 0");
            0.0
        }
    }
}
