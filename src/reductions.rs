//! Reduction of graph 3-coloring to satisfiability.

use crate::formula::Formula;
use crate::semantics::{all_models, evaluate, Model};
use crate::util::{HashMap, Symbol};

/// A 3-coloring assigns each vertex one of the colors 1, 2 and 3.
pub type Coloring = HashMap<usize, usize>;

pub const COLORS: [usize; 3] = [1, 2, 3];

/// A graph over the vertices `1..=n_vertices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    pub n_vertices: usize,
    pub edges: Vec<(usize, usize)>,
}

impl Graph {
    pub fn new(n_vertices: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Self {
            n_vertices,
            edges: edges.into_iter().collect(),
        }
    }

    /// Every edge joins two distinct vertices of the graph.
    pub fn is_graph(&self) -> bool {
        let in_range = |v: usize| (1..=self.n_vertices).contains(&v);
        self.edges
            .iter()
            .all(|&(u, v)| in_range(u) && in_range(v) && u != v)
    }

    pub fn is_valid_3coloring(&self, coloring: &Coloring) -> bool {
        debug_assert!(self.is_graph());
        let colored = (1..=self.n_vertices)
            .all(|v| coloring.get(&v).is_some_and(|c| COLORS.contains(c)));
        colored && self.edges.iter().all(|(u, v)| coloring[u] != coloring[v])
    }
}

/// The variable stating that `vertex` has `color`.
fn color_variable(vertex: usize, color: usize) -> Symbol {
    Symbol::from(format!("x{vertex}_{color}"))
}

fn at_most_one_of(a: Symbol, b: Symbol) -> Formula {
    Formula::or(
        Formula::not(Formula::Var(a)),
        Formula::not(Formula::Var(b)),
    )
}

/// A formula that is satisfiable if and only if `graph` is 3-colorable.
pub fn graph3coloring_to_formula(graph: &Graph) -> Formula {
    debug_assert!(graph.is_graph());
    let mut clauses = vec![];
    for v in 1..=graph.n_vertices {
        let [first, rest @ ..] = COLORS.map(|c| Formula::Var(color_variable(v, c)));
        clauses.push(rest.into_iter().fold(first, Formula::or));
    }
    for v in 1..=graph.n_vertices {
        for (i, &c1) in COLORS.iter().enumerate() {
            for &c2 in &COLORS[i + 1..] {
                clauses.push(at_most_one_of(color_variable(v, c1), color_variable(v, c2)));
            }
        }
    }
    for &(u, v) in &graph.edges {
        for c in COLORS {
            clauses.push(at_most_one_of(color_variable(u, c), color_variable(v, c)));
        }
    }
    clauses
        .into_iter()
        .reduce(Formula::and)
        .unwrap_or(Formula::constant(true))
}

/// Reads a coloring off a model of [`graph3coloring_to_formula`].
///
/// # Panics
/// If `assignment` does not satisfy the formula of `graph`.
pub fn assignment_to_3coloring(graph: &Graph, assignment: &Model) -> Coloring {
    assert!(
        evaluate(&graph3coloring_to_formula(graph), assignment),
        "assignment does not satisfy the coloring formula"
    );
    let coloring: Coloring = (1..=graph.n_vertices)
        .filter_map(|v| {
            COLORS
                .into_iter()
                .find(|&c| assignment.get(&color_variable(v, c)) == Some(&true))
                .map(|c| (v, c))
        })
        .collect();
    debug_assert!(graph.is_valid_3coloring(&coloring));
    coloring
}

/// Finds a 3-coloring of `graph` by trying every assignment.
///
/// # Panics
/// If the graph has too many vertices to enumerate the assignments of its
/// formula.
pub fn tricolor_graph(graph: &Graph) -> Option<Coloring> {
    let formula = graph3coloring_to_formula(graph);
    let vars: Vec<Symbol> = formula.variables().into_iter().collect();
    log::debug!(
        "searching assignments to {} variables for a 3-coloring of {} vertices",
        vars.len(),
        graph.n_vertices
    );
    let coloring = all_models(&vars)
        .find(|model| evaluate(&formula, model))
        .map(|model| assignment_to_3coloring(graph, &model));
    coloring
}
