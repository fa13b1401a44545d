use good_lp::{default_solver, variable, Expression, ProblemVariables, Solution, SolverModel, Variable};
use std::collections::HashMap;

use crate::{
    config::DiversityStrategy,
    error::{AppError, AppResult},
    models::{BookId, Genre},
};

/// Keeps equal scores in rank order under the optimal strategy; small enough
/// that it never outweighs a real score difference (scores move in 0.1 steps).
const TIE_BREAK: f64 = 1e-6;

/// A ranked book as seen by the diversity filter
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub book_id: BookId,
    pub score: f64,
    pub authors: &'a [String],
    /// Genres counted against the genre cap
    pub genres: Vec<Genre>,
}

/// Most picks a single author or genre may take in one result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiversityCaps {
    pub author: usize,
    pub genre: usize,
}

/// Running per-author and per-genre selection counters
#[derive(Debug, Default)]
struct Counters<'a> {
    authors: HashMap<&'a str, usize>,
    genres: HashMap<Genre, usize>,
}

impl<'a> Counters<'a> {
    fn admits(&self, candidate: &Candidate<'a>, caps: DiversityCaps) -> bool {
        let author_full = candidate
            .authors
            .iter()
            .any(|a| self.authors.get(a.as_str()).copied().unwrap_or(0) >= caps.author);
        let genre_full = candidate
            .genres
            .iter()
            .any(|g| self.genres.get(g).copied().unwrap_or(0) >= caps.genre);
        !author_full && !genre_full
    }

    fn record(&mut self, candidate: &Candidate<'a>) {
        for author in candidate.authors {
            *self.authors.entry(author.as_str()).or_insert(0) += 1;
        }
        for genre in &candidate.genres {
            *self.genres.entry(*genre).or_insert(0) += 1;
        }
    }
}

/// Picks up to `wanted` candidates without exceeding the caps
///
/// `candidates` must already be ranked. Returns indices into it, in rank order.
pub fn select(
    candidates: &[Candidate<'_>],
    caps: DiversityCaps,
    wanted: usize,
    strategy: DiversityStrategy,
) -> Vec<usize> {
    match strategy {
        DiversityStrategy::Greedy => select_greedy(candidates, caps, wanted),
        DiversityStrategy::Optimal => select_optimal(candidates, caps, wanted).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Optimal diversity selection failed, using greedy");
            select_greedy(candidates, caps, wanted)
        }),
    }
}

/// Single forward pass: a candidate that would break a cap is skipped for
/// good, and scanning continues with the next one
pub fn select_greedy(candidates: &[Candidate<'_>], caps: DiversityCaps, wanted: usize) -> Vec<usize> {
    let mut counters = Counters::default();
    let mut selected = Vec::new();

    for (index, candidate) in candidates.iter().enumerate() {
        if selected.len() >= wanted {
            break;
        }
        if !counters.admits(candidate, caps) {
            continue;
        }
        counters.record(candidate);
        selected.push(index);
    }

    selected
}

/// Chooses the subset with the highest total score under the caps
///
/// Formulated as a 0/1 program: one binary variable per candidate, one
/// constraint per author and per genre, and one on the result size.
pub fn select_optimal(
    candidates: &[Candidate<'_>],
    caps: DiversityCaps,
    wanted: usize,
) -> AppResult<Vec<usize>> {
    if candidates.is_empty() || wanted == 0 {
        return Ok(Vec::new());
    }

    let mut vars = ProblemVariables::new();
    let picks: Vec<Variable> = candidates
        .iter()
        .map(|_| vars.add(variable().binary()))
        .collect();

    let mut by_author: HashMap<&str, Vec<Variable>> = HashMap::new();
    let mut by_genre: HashMap<Genre, Vec<Variable>> = HashMap::new();
    for (candidate, &pick) in candidates.iter().zip(&picks) {
        for author in candidate.authors {
            by_author.entry(author.as_str()).or_default().push(pick);
        }
        for genre in &candidate.genres {
            by_genre.entry(*genre).or_default().push(pick);
        }
    }

    let n = candidates.len() as f64;
    let mut objective = Expression::from(0);
    let mut size = Expression::from(0);
    for (rank, (candidate, &pick)) in candidates.iter().zip(&picks).enumerate() {
        let weight = candidate.score + TIE_BREAK * (n - rank as f64) / n;
        objective = objective + weight * pick;
        size = size + pick;
    }

    let mut problem = vars.maximise(objective).using(default_solver);
    problem = problem.with(size.leq(wanted as f64));
    for group in by_author.values() {
        problem = problem.with(sum_of(group).leq(caps.author as f64));
    }
    for group in by_genre.values() {
        problem = problem.with(sum_of(group).leq(caps.genre as f64));
    }

    let solution = problem
        .solve()
        .map_err(|e| AppError::Optimization(format!("Solver failed: {}", e)))?;

    // Binary variables might be slightly off from 1.0
    let selected: Vec<usize> = picks
        .iter()
        .enumerate()
        .filter(|(_, pick)| solution.value(**pick) > 0.5)
        .map(|(index, _)| index)
        .collect();

    tracing::debug!(
        candidates = candidates.len(),
        wanted,
        selected = selected.len(),
        "Optimal diversity selection solved"
    );

    Ok(selected)
}

fn sum_of(vars: &[Variable]) -> Expression {
    let mut expr = Expression::from(0);
    for &var in vars {
        expr = expr + var;
    }
    expr
}
