//! The state a front end carries between actions.
//!
//! A [`Session`] holds the current network, market and last market clearing. Every operation
//! either succeeds and updates the session, or fails and leaves it exactly as it was.

use std::{
    fmt::{Debug, Display},
    hash::Hash,
    str::FromStr,
};

use tracing::debug;

use crate::{
    config::Config,
    equilibrium::{EquilibriumSolver, TrafficComparison},
    error::{Error, Result},
    io,
    market::{perfect_matching, Market, MarketClearing},
    network::{FlowNetwork, Partition},
    preferred::PreferredSellerGraph,
};

/// Current inputs and results, owned explicitly by the caller.
///
/// # Examples
///
/// ```
/// use equilibria::market::Market;
/// use equilibria::session::Session;
///
/// let mut session: Session<u32> = Session::default();
/// assert!(session.preferred_seller_graph().is_err());
///
/// session.set_market(Market::from_rows(&[vec![3, 1], vec![1, 3]], vec![0, 0]).unwrap());
/// session.clear_market().unwrap();
///
/// let graph = session.preferred_seller_graph().unwrap();
/// assert_eq!(graph.edges()[1].seller, 3);
/// ```
#[derive(Clone, Debug)]
pub struct Session<T> {
    config: Config,
    network: Option<FlowNetwork<T>>,
    market: Option<Market>,
    clearing: Option<MarketClearing>,
}

impl<T> Default for Session<T> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<T> Session<T> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            network: None,
            market: None,
            clearing: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn network(&self) -> Option<&FlowNetwork<T>> {
        self.network.as_ref()
    }

    pub fn market(&self) -> Option<&Market> {
        self.market.as_ref()
    }

    /// The result of the last successful [`clear_market`](Self::clear_market).
    pub fn clearing(&self) -> Option<&MarketClearing> {
        self.clearing.as_ref()
    }

    /// Replaces the current network.
    pub fn set_network(&mut self, network: FlowNetwork<T>) {
        self.network = Some(network);
    }

    /// Replaces the current market. The last clearing is kept until the new market clears.
    pub fn set_market(&mut self, market: Market) {
        self.market = Some(market);
    }

    /// Loads the current market from a market file.
    pub fn load_market_file(&mut self, path: impl AsRef<std::path::Path>) -> Result<&Market> {
        let market: &Market = self.market.insert(io::read_market_file(path)?);

        Ok(market)
    }

    /// Clears the current market with the session's matching options and keeps the result.
    pub fn clear_market(&mut self) -> Result<&MarketClearing> {
        let market = self.market.as_ref().ok_or(Error::NotLoaded("market"))?;
        let clearing = perfect_matching(market, &self.config.matching)?;

        debug!(rounds = clearing.rounds, "session market cleared");

        let clearing: &MarketClearing = self.clearing.insert(clearing);

        Ok(clearing)
    }

    /// Builds the preferred-seller graph of the last clearing.
    pub fn preferred_seller_graph(&self) -> Result<PreferredSellerGraph> {
        let clearing = self
            .clearing
            .as_ref()
            .ok_or(Error::NotLoaded("market clearing"))?;

        PreferredSellerGraph::try_from(clearing)
    }
}

impl<T> Session<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    /// Loads the current network from a weighted digraph file.
    pub fn load_network_file(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<&FlowNetwork<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let network: &FlowNetwork<T> = self.network.insert(io::read_flow_network_file(path)?);

        Ok(network)
    }

    /// Computes both the Nash equilibrium and the social optimum of routing `volume` across the
    /// current network.
    pub fn solve_traffic(
        &self,
        volume: f64,
        source: T,
        destination: T,
    ) -> Result<TrafficComparison<T>> {
        let network = self.network.as_ref().ok_or(Error::NotLoaded("network"))?;

        EquilibriumSolver::new(network)
            .with_options(self.config.equilibrium)
            .compare(volume, source, destination)
    }

    /// Splits the current network into `num_components` components in place, see
    /// [`FlowNetwork::partition`].
    pub fn partition_network(&mut self, num_components: usize) -> Result<Partition<T>> {
        let network = self.network.as_mut().ok_or(Error::NotLoaded("network"))?;
        let partition = network.partition(num_components)?;

        debug!(removed = partition.removed.len(), "session network partitioned");

        Ok(partition)
    }
}
