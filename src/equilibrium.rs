//! Traffic equilibria over networks with affine edge costs.
//!
//! A total volume of flow has to travel from a source to a destination. Two splits of that
//! volume across the simple paths of the network are computed:
//!
//! - the **Nash equilibrium**, approximated by a best-response dynamic: starting from a uniform
//!   split, a fraction of the slowest path's flow is repeatedly moved to the fastest path, until
//!   every path takes the same time, the flows stop changing, or the iteration cap is hit. This
//!   is a damped fixed-point iteration, not an exact solver: it can oscillate around the
//!   equilibrium and the cap is the only termination guarantee.
//! - the **social optimum**, allocated in closed form in inverse proportion to each path's cost
//!   at unit flow.
//!
//! Travel time of a path is always evaluated with that path's own flow on every edge it
//! crosses, and the total travel time of a split is `Σ flow(path) * time(path)`.
//!
//! ```
//! use equilibria::edge::{AffineCost, Edge};
//! use equilibria::equilibrium::EquilibriumSolver;
//! use equilibria::network::FlowNetwork;
//!
//! let mut network = FlowNetwork::new();
//! network.insert(Edge::new(0, 1), AffineCost::new(1.0, 0.0)).unwrap();
//!
//! let comparison = EquilibriumSolver::new(&network).compare(10.0, 0, 1).unwrap();
//!
//! assert_eq!(comparison.nash.total_time, 100.0);
//! assert_eq!(comparison.social.total_time, 100.0);
//! ```

use std::{fmt::Debug, hash::Hash};

use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    config::EquilibriumOptions,
    edge::{AffineCost, Edge},
    error::{Error, Result},
    network::FlowNetwork,
    path::{Path, SimplePaths},
};

/// The flow assigned to one path and the time it takes to travel it under that flow.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathFlow<T> {
    pub path: Path<T>,
    pub flow: f64,
    pub travel_time: f64,
}

/// A split of the total volume across paths, in path enumeration order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathFlows<T> {
    entries: Vec<PathFlow<T>>,
}

impl<T: PartialEq> PathFlows<T> {
    pub fn iter(&self) -> impl Iterator<Item = &PathFlow<T>> {
        self.entries.iter()
    }

    /// Returns the flow assigned to `path`, if it is one of the enumerated paths.
    pub fn get(&self, path: &Path<T>) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| &entry.path == path)
            .map(|entry| entry.flow)
    }

    /// Sum of the flows over every path, equal to the input volume up to rounding.
    pub fn total_flow(&self) -> f64 {
        self.entries.iter().map(|entry| entry.flow).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> IntoIterator for PathFlows<T> {
    type Item = PathFlow<T>;
    type IntoIter = std::vec::IntoIter<PathFlow<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The result of one solver run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Equilibrium<T> {
    pub flows: PathFlows<T>,
    /// `Σ flow(path) * travel_time(path)`.
    pub total_time: f64,
    /// Flow-shifting iterations run, zero for the closed-form social optimum.
    pub iterations: usize,
}

/// Both regimes side by side, as rendered by a bar comparison.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrafficComparison<T> {
    pub nash: Equilibrium<T>,
    pub social: Equilibrium<T>,
}

impl<T> TrafficComparison<T> {
    /// Ratio of the Nash total travel time to the social optimum's.
    pub fn price_of_anarchy(&self) -> f64 {
        self.nash.total_time / self.social.total_time
    }
}

/// Simple paths and the costs of the edges along each of them.
type CostedPaths<T> = (Vec<Path<T>>, Vec<Vec<AffineCost>>);

/// Computes path flows for a network it borrows immutably, so any number of solvers can share
/// one network.
#[derive(Clone, Debug)]
pub struct EquilibriumSolver<'a, T> {
    network: &'a FlowNetwork<T>,
    options: EquilibriumOptions,
}

impl<'a, T> EquilibriumSolver<'a, T>
where
    Edge<T>: Eq + Hash,
    T: Copy + Eq + Hash + Ord + Debug,
{
    pub fn new(network: &'a FlowNetwork<T>) -> Self {
        Self {
            network,
            options: EquilibriumOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EquilibriumOptions) -> Self {
        self.options = options;
        self
    }

    /// Lazily enumerates the simple paths from `source` to `destination`, see
    /// [`FlowNetwork::simple_paths`].
    pub fn simple_paths(&self, source: T, destination: T) -> Result<SimplePaths<T>> {
        self.network.simple_paths(source, destination)
    }

    /// Approximates the Nash (Wardrop) equilibrium split of `volume` by iterative flow
    /// shifting.
    ///
    /// Each iteration finds the slowest and the fastest path, ties going to the path enumerated
    /// first, and moves `min(shift_fraction * flow(slowest), volume)` from the former to the
    /// latter. It stops when both are the same path, when no flow changed, or after
    /// `max_iterations`.
    pub fn nash_equilibrium(
        &self,
        volume: f64,
        source: T,
        destination: T,
    ) -> Result<Equilibrium<T>> {
        self.options.validate()?;
        validate_volume(volume)?;

        let (paths, costs) = self.costed_paths(source, destination)?;

        debug!(paths = paths.len(), volume, "computing Nash equilibrium");

        let mut flows = vec![volume / paths.len() as f64; paths.len()];
        let mut iterations = 0;

        while iterations < self.options.max_iterations {
            iterations += 1;

            let times: Vec<f64> = costs
                .iter()
                .zip(&flows)
                .map(|(path_costs, &x)| travel_time(path_costs, x))
                .collect();
            let (slowest, fastest) = extremes(&times);

            if slowest == fastest {
                trace!(iteration = iterations, "all paths take the same time");
                break;
            }

            let adjustment = f64::min(self.options.shift_fraction * flows[slowest], volume);
            let previous = flows.clone();

            flows[slowest] -= adjustment;
            flows[fastest] += adjustment;

            trace!(iteration = iterations, slowest, fastest, adjustment, "shifted flow");

            if flows == previous {
                break;
            }
        }

        let equilibrium = assemble(paths, &costs, flows, iterations);

        debug!(
            iterations,
            total_time = equilibrium.total_time,
            "Nash equilibrium computed"
        );

        Ok(equilibrium)
    }

    /// Allocates `volume` across paths in inverse proportion to their cost at unit flow:
    /// `flow(p) = (1 / cost(p)) / Σ(1 / cost(p')) * volume`.
    ///
    /// Fails with [`Error::DivisionByZero`] if a path costs nothing at unit flow.
    pub fn social_optimum(&self, volume: f64, source: T, destination: T) -> Result<Equilibrium<T>> {
        validate_volume(volume)?;

        let (paths, costs) = self.costed_paths(source, destination)?;

        debug!(paths = paths.len(), volume, "computing social optimum");

        let unit_times: Vec<f64> = costs.iter().map(|c| travel_time(c, 1.0)).collect();

        if let Some(i) = unit_times.iter().position(|&t| t == 0.0) {
            return Err(Error::DivisionByZero {
                path: format!("{:?}", paths[i].vertices()),
            });
        }

        let total_inverse: f64 = unit_times.iter().map(|t| 1.0 / t).sum();
        if total_inverse == 0.0 || !total_inverse.is_finite() {
            return Err(Error::DivisionByZero {
                path: format!("{:?}", paths.iter().map(Path::vertices).collect::<Vec<_>>()),
            });
        }

        let flows = unit_times
            .iter()
            .map(|t| (1.0 / t) / total_inverse * volume)
            .collect();

        let optimum = assemble(paths, &costs, flows, 0);

        debug!(total_time = optimum.total_time, "social optimum computed");

        Ok(optimum)
    }

    /// Runs both solvers on the same inputs.
    pub fn compare(&self, volume: f64, source: T, destination: T) -> Result<TrafficComparison<T>> {
        Ok(TrafficComparison {
            nash: self.nash_equilibrium(volume, source, destination)?,
            social: self.social_optimum(volume, source, destination)?,
        })
    }

    /// Enumerates the paths and looks up the cost function of every edge they cross.
    fn costed_paths(&self, source: T, destination: T) -> Result<CostedPaths<T>> {
        let paths: Vec<Path<T>> = self.simple_paths(source, destination)?.collect();

        let costs = paths
            .iter()
            .map(|path| {
                path.edges()
                    .map(|edge| self.network.cost(&edge))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((paths, costs))
    }
}

//
// Helpers
//

fn validate_volume(volume: f64) -> Result<()> {
    if volume.is_finite() && volume > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidVolume(volume))
    }
}

fn travel_time(costs: &[AffineCost], x: f64) -> f64 {
    costs.iter().map(|cost| cost.eval(x)).sum()
}

/// Indices of the largest and the smallest time, the first one found winning ties.
fn extremes(times: &[f64]) -> (usize, usize) {
    let (mut slowest, mut fastest) = (0, 0);

    for (i, &time) in times.iter().enumerate().skip(1) {
        if time > times[slowest] {
            slowest = i;
        }
        if time < times[fastest] {
            fastest = i;
        }
    }

    (slowest, fastest)
}

fn assemble<T>(
    paths: Vec<Path<T>>,
    costs: &[Vec<AffineCost>],
    flows: Vec<f64>,
    iterations: usize,
) -> Equilibrium<T> {
    let entries: Vec<PathFlow<T>> = paths
        .into_iter()
        .zip(costs)
        .zip(flows)
        .map(|((path, path_costs), flow)| PathFlow {
            path,
            flow,
            travel_time: travel_time(path_costs, flow),
        })
        .collect();

    let total_time = entries
        .iter()
        .map(|entry| entry.flow * entry.travel_time)
        .sum();

    Equilibrium {
        flows: PathFlows { entries },
        total_time,
        iterations,
    }
}
