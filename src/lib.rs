//! Equilibria computes two kinds of equilibrium over small graphs: how selfish traffic settles
//! on a network with congestion-dependent edge costs, and which prices clear a market where
//! buyers compete for goods.
//!
//! # Traffic
//!
//! A [`FlowNetwork`](network::FlowNetwork) is built from directed [`Edge`](edge::Edge)s, each
//! carrying an [`AffineCost`](edge::AffineCost) `a * x + b` of the flow `x` crossing it. The
//! [`EquilibriumSolver`](equilibrium::EquilibriumSolver) splits a volume of flow across the simple
//! paths between two vertices, once as every driver choosing the fastest path for themselves
//! (the Nash equilibrium) and once as a planner would (the social optimum).
//!
//! ```rust
//! use equilibria::edge::{AffineCost, Edge};
//! use equilibria::equilibrium::EquilibriumSolver;
//! use equilibria::network::FlowNetwork;
//!
//! // Two routes from 0 to 3, each a congestible road followed by a fixed-time one.
//! let mut network = FlowNetwork::new();
//! network.insert(Edge::new(0, 1), AffineCost::new(1.0, 0.0)).unwrap();
//! network.insert(Edge::new(1, 3), AffineCost::new(0.0, 45.0)).unwrap();
//! network.insert(Edge::new(0, 2), AffineCost::new(0.0, 45.0)).unwrap();
//! network.insert(Edge::new(2, 3), AffineCost::new(1.0, 0.0)).unwrap();
//!
//! let solver = EquilibriumSolver::new(&network);
//! let nash = solver.nash_equilibrium(4000.0, 0, 3).unwrap();
//!
//! // Symmetric routes share the volume evenly.
//! for entry in nash.flows.iter() {
//!     assert_eq!(entry.flow, 2000.0);
//! }
//! ```
//!
//! [`FlowNetwork::partition`](network::FlowNetwork::partition) splits a network into
//! components by cutting the links with the highest edge betweenness.
//!
//! # Markets
//!
//! A [`Market`](market::Market) holds each buyer's valuation of each seller's good and the
//! opening prices. The [`MarketClearingMatcher`](market::MarketClearingMatcher) raises the price
//! of every contested good until each buyer prefers a different seller.
//!
//! ```rust
//! use equilibria::config::MatchingOptions;
//! use equilibria::market::{perfect_matching, Market};
//! use equilibria::preferred::PreferredSellerGraph;
//!
//! let market = Market::from_rows(
//!     &[vec![12, 4, 2], vec![8, 7, 6], vec![7, 5, 2]],
//!     vec![0, 0, 0],
//! )
//! .unwrap();
//!
//! let clearing = perfect_matching(&market, &MatchingOptions::default()).unwrap();
//! assert_eq!(clearing.assignment, vec![0, 2, 1]);
//! assert_eq!(clearing.prices, vec![5, 2, 0]);
//!
//! // Buyers are vertices 0..3, sellers 3..6.
//! let graph = PreferredSellerGraph::try_from(&clearing).unwrap();
//! assert_eq!(graph.edges()[0].label(), "Payoff: 7");
//! ```
//!
//! Front ends keep their current network, market and clearing in a [`Session`](session::Session)
//! and load them from the text formats in [`io`].

mod betweenness;
pub mod config;
pub mod edge;
pub mod equilibrium;
pub mod error;
pub mod io;
pub mod market;
pub mod network;
pub mod path;
pub mod preferred;
pub mod session;

pub use error::{Error, Result};
