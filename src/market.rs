//! Market clearing by ascending prices.
//!
//! `n` buyers each want one of `n` goods, sold by `n` sellers. Every round, each buyer picks the
//! seller maximising its payoff `valuation - price`, ties going to the lowest seller index. Every
//! pair of buyers picking the same seller raises that seller's price by one step. The market is
//! cleared by the first round without any such conflict: the assignment is then a perfect
//! matching and every buyer holds a payoff-maximising good at the final prices.
//!
//! Prices only ever increase, yet some markets never clear this way: buyers with identical
//! valuation rows keep picking the same seller whatever the prices. Rounds are capped and
//! running out of them fails with [`Error::NonConvergence`].
//!
//! ```
//! use equilibria::config::MatchingOptions;
//! use equilibria::market::{perfect_matching, Market};
//!
//! let market = Market::from_rows(&[vec![5, 4], vec![5, 1]], vec![0, 0]).unwrap();
//! let clearing = perfect_matching(&market, &MatchingOptions::default()).unwrap();
//!
//! assert_eq!(clearing.assignment, vec![1, 0]);
//! assert_eq!(clearing.prices, vec![2, 0]);
//! assert_eq!(clearing.payoffs, vec![4, 3]);
//! ```

use itertools::Itertools;
use nalgebra::DMatrix;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    config::MatchingOptions,
    error::{Error, Result},
};

/// The inputs of a market: buyer valuations and the sellers' opening prices.
#[derive(Clone, Debug, PartialEq)]
pub struct Market {
    /// Row `i` holds buyer `i`'s valuation of each seller's good.
    valuations: DMatrix<i64>,
    prices: Vec<i64>,
}

impl Market {
    /// Creates a market from a square valuation matrix and one opening price per seller.
    pub fn new(valuations: DMatrix<i64>, prices: Vec<i64>) -> Result<Self> {
        let n = prices.len();

        if n == 0 {
            return Err(Error::dimension_mismatch("at least one seller", "none"));
        }

        if valuations.shape() != (n, n) {
            return Err(Error::dimension_mismatch(
                format!("{n}x{n} valuations"),
                format!("{}x{}", valuations.nrows(), valuations.ncols()),
            ));
        }

        Ok(Self { valuations, prices })
    }

    /// Creates a market from valuation rows, one per buyer.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::market::Market;
    ///
    /// assert!(Market::from_rows(&[vec![3, 1], vec![1, 3]], vec![0, 0]).is_ok());
    /// assert!(Market::from_rows(&[vec![3, 1], vec![1]], vec![0, 0]).is_err());
    /// ```
    pub fn from_rows(rows: &[Vec<i64>], prices: Vec<i64>) -> Result<Self> {
        let n = prices.len();

        if rows.len() != n {
            return Err(Error::dimension_mismatch(
                format!("{n} valuation rows"),
                rows.len(),
            ));
        }

        if let Some((i, row)) = rows.iter().find_position(|row| row.len() != n) {
            return Err(Error::dimension_mismatch(
                format!("{n} valuations for buyer {i}"),
                row.len(),
            ));
        }

        let flat: Vec<i64> = rows.concat();
        let valuations = DMatrix::from_row_slice(n, n, &flat);

        Self::new(valuations, prices)
    }

    /// Number of buyers, which is also the number of sellers.
    pub fn size(&self) -> usize {
        self.prices.len()
    }

    pub fn valuations(&self) -> &DMatrix<i64> {
        &self.valuations
    }

    /// Opening prices.
    pub fn prices(&self) -> &[i64] {
        &self.prices
    }
}

/// Whether the last round left any seller contested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MatchState {
    Unresolved,
    Resolved,
}

/// The outcome of a cleared market.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MarketClearing {
    /// `assignment[buyer]` is the seller the buyer is matched with.
    pub assignment: Vec<usize>,
    /// `valuation - price` of each buyer's assigned good.
    pub payoffs: Vec<i64>,
    /// Market-clearing prices.
    pub prices: Vec<i64>,
    pub rounds: usize,
}

impl MarketClearing {
    pub fn seller_of(&self, buyer: usize) -> Option<usize> {
        self.assignment.get(buyer).copied()
    }

    pub fn buyer_of(&self, seller: usize) -> Option<usize> {
        self.assignment.iter().position(|&s| s == seller)
    }

    /// Whether every seller is assigned to exactly one buyer.
    pub fn is_perfect(&self) -> bool {
        let n = self.assignment.len();
        let mut taken = vec![false; n];

        self.assignment
            .iter()
            .all(|&seller| seller < n && !std::mem::replace(&mut taken[seller], true))
    }
}

/// Runs the price-adjustment rounds one at a time.
///
/// The matcher owns its working prices, assignment and payoffs; the [`Market`] it reads from is
/// never modified.
#[derive(Clone, Debug)]
pub struct MarketClearingMatcher<'a> {
    market: &'a Market,
    options: MatchingOptions,
    prices: Vec<i64>,
    assignment: Vec<usize>,
    payoffs: Vec<i64>,
    rounds: usize,
    state: MatchState,
}

impl<'a> MarketClearingMatcher<'a> {
    pub fn new(market: &'a Market) -> Self {
        let n = market.size();

        Self {
            market,
            options: MatchingOptions::default(),
            prices: market.prices.clone(),
            assignment: vec![0; n],
            payoffs: vec![0; n],
            rounds: 0,
            state: MatchState::Unresolved,
        }
    }

    pub fn with_options(mut self, options: MatchingOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;

        Ok(self)
    }

    /// Runs one round: tentative best responses, conflict detection and price increases, then
    /// commits the tentative assignment and payoffs whatever the outcome.
    ///
    /// Payoffs are those the buyers saw when picking, before this round's price increases. Once
    /// resolved, further calls do nothing. Fails with [`Error::PriceOverflow`] if a price can't
    /// be raised, in which case the round isn't committed.
    pub fn step(&mut self) -> Result<MatchState> {
        if self.state == MatchState::Resolved {
            return Ok(self.state);
        }

        let n = self.market.size();
        let valuations = &self.market.valuations;
        let mut assignment = Vec::with_capacity(n);
        let mut payoffs = Vec::with_capacity(n);

        for buyer in 0..n {
            let payoff =
                |seller: usize| valuations[(buyer, seller)].saturating_sub(self.prices[seller]);

            // Strictly greater keeps the lowest index on ties.
            let mut best = (0, payoff(0));
            for seller in 1..n {
                let candidate = payoff(seller);
                if candidate > best.1 {
                    best = (seller, candidate);
                }
            }

            assignment.push(best.0);
            payoffs.push(best.1);
        }

        let mut prices = self.prices.clone();
        let mut conflicts = 0;
        for (i, k) in (0..n).tuple_combinations() {
            if assignment[i] == assignment[k] {
                let seller = assignment[i];
                prices[seller] = prices[seller]
                    .checked_add(self.options.price_step)
                    .ok_or(Error::PriceOverflow { seller })?;
                conflicts += 1;
            }
        }

        self.rounds += 1;
        self.prices = prices;
        self.assignment = assignment;
        self.payoffs = payoffs;
        self.state = if conflicts == 0 {
            MatchState::Resolved
        } else {
            MatchState::Unresolved
        };

        trace!(
            round = self.rounds,
            conflicts,
            prices = ?self.prices,
            "market round"
        );

        Ok(self.state)
    }

    /// Runs rounds until the market clears.
    ///
    /// Fails with [`Error::NonConvergence`] if `max_rounds` rounds pass without clearing.
    pub fn run(mut self) -> Result<MarketClearing> {
        debug!(size = self.market.size(), "clearing market");

        loop {
            if self.step()? == MatchState::Resolved {
                debug!(rounds = self.rounds, prices = ?self.prices, "market cleared");

                return Ok(self.into_clearing());
            }

            if self.rounds >= self.options.max_rounds {
                debug!(rounds = self.rounds, "market did not clear");

                return Err(Error::NonConvergence {
                    iterations: self.rounds,
                });
            }
        }
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Current prices, including the increases of the last round.
    pub fn prices(&self) -> &[i64] {
        &self.prices
    }

    /// Assignment committed by the last round, not necessarily a matching until resolved.
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    pub fn payoffs(&self) -> &[i64] {
        &self.payoffs
    }

    fn into_clearing(self) -> MarketClearing {
        MarketClearing {
            assignment: self.assignment,
            payoffs: self.payoffs,
            prices: self.prices,
            rounds: self.rounds,
        }
    }
}

/// Clears `market`, see [`MarketClearingMatcher`].
pub fn perfect_matching(market: &Market, options: &MatchingOptions) -> Result<MarketClearing> {
    MarketClearingMatcher::new(market)
        .with_options(*options)?
        .run()
}

#[cfg(test)]
mod tests {
    use nalgebra::dmatrix;

    use super::*;

    fn market(rows: &[Vec<i64>], prices: Vec<i64>) -> Market {
        Market::from_rows(rows, prices).unwrap()
    }

    fn clear(market: &Market) -> Result<MarketClearing> {
        perfect_matching(market, &MatchingOptions::default())
    }

    #[test]
    fn new() {
        let market = Market::new(dmatrix![3, 1; 1, 3], vec![0, 0]).unwrap();

        assert_eq!(market.size(), 2);
        assert_eq!(market.valuations()[(1, 1)], 3);
        assert_eq!(market.prices(), &[0, 0]);
    }

    #[test]
    fn dimension_mismatch() {
        assert!(matches!(
            Market::new(dmatrix![3, 1; 1, 3], vec![0]),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(matches!(
            Market::new(dmatrix![3, 1, 2; 1, 3, 2], vec![0, 0]),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(matches!(
            Market::from_rows(&[], vec![]),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(matches!(
            Market::from_rows(&[vec![1, 2]], vec![0, 0]),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn from_rows_is_row_major() {
        let market = market(&[vec![1, 2], vec![3, 4]], vec![0, 0]);

        assert_eq!(market.valuations(), &dmatrix![1, 2; 3, 4]);
    }

    #[test]
    fn distinct_favourites_clear_immediately() {
        let clearing = clear(&market(&[vec![3, 1], vec![1, 3]], vec![0, 0])).unwrap();

        assert_eq!(clearing.assignment, vec![0, 1]);
        assert_eq!(clearing.payoffs, vec![3, 3]);
        assert_eq!(clearing.prices, vec![0, 0]);
        assert_eq!(clearing.rounds, 1);
    }

    #[test]
    fn contested_seller_raises_its_price() {
        let clearing = clear(&market(&[vec![5, 4], vec![5, 1]], vec![0, 0])).unwrap();

        assert_eq!(clearing.assignment, vec![1, 0]);
        assert_eq!(clearing.payoffs, vec![4, 3]);
        assert_eq!(clearing.prices, vec![2, 0]);
        assert_eq!(clearing.rounds, 3);
    }

    #[test]
    fn three_buyers() {
        let market = market(
            &[vec![12, 4, 2], vec![8, 7, 6], vec![7, 5, 2]],
            vec![0, 0, 0],
        );
        let clearing = clear(&market).unwrap();

        assert_eq!(clearing.assignment, vec![0, 2, 1]);
        assert_eq!(clearing.payoffs, vec![7, 6, 3]);
        assert_eq!(clearing.prices, vec![5, 2, 0]);
        assert_eq!(clearing.rounds, 6);
        assert!(clearing.is_perfect());
    }

    #[test]
    fn every_pair_on_a_seller_counts() {
        let market = market(
            &[vec![12, 4, 2], vec![8, 7, 6], vec![7, 5, 2]],
            vec![0, 0, 0],
        );
        let mut matcher = MarketClearingMatcher::new(&market);

        // All three buyers want seller 0: three pairs.
        assert_eq!(matcher.step().unwrap(), MatchState::Unresolved);
        assert_eq!(matcher.assignment(), &[0, 0, 0]);
        assert_eq!(matcher.payoffs(), &[12, 8, 7]);
        assert_eq!(matcher.prices(), &[3, 0, 0]);
    }

    #[test]
    fn prices_never_decrease() {
        let market = market(
            &[vec![12, 4, 2], vec![8, 7, 6], vec![7, 5, 2]],
            vec![0, 0, 0],
        );
        let mut matcher = MarketClearingMatcher::new(&market);
        let mut history = vec![matcher.prices().to_vec()];

        while matcher.step().unwrap() == MatchState::Unresolved {
            history.push(matcher.prices().to_vec());
        }
        history.push(matcher.prices().to_vec());

        assert_eq!(
            history,
            vec![
                vec![0, 0, 0],
                vec![3, 0, 0],
                vec![3, 1, 0],
                vec![4, 1, 0],
                vec![4, 2, 0],
                vec![5, 2, 0],
                vec![5, 2, 0],
            ]
        );
        for (before, after) in history.iter().tuple_windows() {
            assert!(before.iter().zip(after).all(|(b, a)| b <= a));
        }
    }

    #[test]
    fn cleared_buyers_hold_a_best_good() {
        let market = market(
            &[vec![12, 4, 2], vec![8, 7, 6], vec![7, 5, 2]],
            vec![0, 0, 0],
        );
        let clearing = clear(&market).unwrap();

        for buyer in 0..market.size() {
            let best = (0..market.size())
                .map(|seller| market.valuations()[(buyer, seller)] - clearing.prices[seller])
                .max()
                .unwrap();

            assert_eq!(clearing.payoffs[buyer], best);
        }
    }

    #[test]
    fn opening_prices_are_respected() {
        let clearing = clear(&market(&[vec![3, 1], vec![1, 3]], vec![5, 0])).unwrap();

        assert_eq!(clearing.assignment, vec![0, 1]);
        assert_eq!(clearing.payoffs, vec![-2, 0]);
        assert_eq!(clearing.prices, vec![5, 3]);
        assert_eq!(clearing.rounds, 4);
    }

    #[test]
    fn price_step() {
        let market = market(&[vec![5, 4], vec![5, 1]], vec![0, 0]);
        let clearing = perfect_matching(
            &market,
            &MatchingOptions {
                price_step: 2,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(clearing.assignment, vec![1, 0]);
        assert_eq!(clearing.prices, vec![2, 0]);
        assert_eq!(clearing.rounds, 2);
    }

    #[test]
    fn identical_buyers_hit_the_round_cap() {
        let market = market(&[vec![3, 3], vec![3, 3]], vec![0, 0]);
        let mut matcher = MarketClearingMatcher::new(&market);

        // Both pick seller 0 on the tie, which gets more expensive.
        assert_eq!(matcher.step().unwrap(), MatchState::Unresolved);
        assert_eq!(matcher.assignment(), &[0, 0]);
        assert_eq!(matcher.prices(), &[1, 0]);

        let options = MatchingOptions {
            max_rounds: 50,
            ..Default::default()
        };
        let result = MarketClearingMatcher::new(&market)
            .with_options(options)
            .unwrap()
            .run();

        assert!(matches!(result, Err(Error::NonConvergence { iterations: 50 })));
    }

    #[test]
    fn resolved_matcher_is_idle() {
        let market = market(&[vec![3, 1], vec![1, 3]], vec![0, 0]);
        let mut matcher = MarketClearingMatcher::new(&market);

        assert_eq!(matcher.state(), MatchState::Unresolved);
        assert_eq!(matcher.step().unwrap(), MatchState::Resolved);
        assert_eq!(matcher.step().unwrap(), MatchState::Resolved);
        assert_eq!(matcher.rounds(), 1);
    }

    #[test]
    fn price_overflow() {
        let market = market(&[vec![0, 0], vec![0, 0]], vec![i64::MAX - 1, i64::MAX - 1]);
        let mut matcher = MarketClearingMatcher::new(&market);

        assert_eq!(matcher.step().unwrap(), MatchState::Unresolved);
        assert_eq!(matcher.step().unwrap(), MatchState::Unresolved);
        assert_eq!(matcher.prices(), &[i64::MAX, i64::MAX]);

        assert!(matches!(
            matcher.step(),
            Err(Error::PriceOverflow { seller: 0 })
        ));
        // The failed round isn't committed.
        assert_eq!(matcher.rounds(), 2);
        assert_eq!(matcher.prices(), &[i64::MAX, i64::MAX]);
        assert_eq!(matcher.assignment(), &[1, 1]);

        assert!(matches!(
            clear(&market),
            Err(Error::PriceOverflow { seller: 0 })
        ));
    }

    #[test]
    fn extreme_prices_without_conflict() {
        let clearing = clear(&market(
            &[vec![3, 1], vec![1, 3]],
            vec![i64::MAX - 1, i64::MAX - 1],
        ))
        .unwrap();

        assert_eq!(clearing.assignment, vec![0, 1]);
        assert_eq!(clearing.payoffs, vec![4 - i64::MAX, 4 - i64::MAX]);
        assert_eq!(clearing.prices, vec![i64::MAX - 1, i64::MAX - 1]);
    }

    #[test]
    fn single_buyer() {
        let clearing = clear(&market(&[vec![4]], vec![1])).unwrap();

        assert_eq!(clearing.assignment, vec![0]);
        assert_eq!(clearing.payoffs, vec![3]);
        assert_eq!(clearing.rounds, 1);
    }

    #[test]
    fn invalid_options() {
        let market = market(&[vec![4]], vec![1]);
        let options = MatchingOptions {
            price_step: 0,
            ..Default::default()
        };

        assert!(matches!(
            perfect_matching(&market, &options),
            Err(Error::InvalidOption(_))
        ));
    }

    #[test]
    fn lookups() {
        let clearing = clear(&market(&[vec![5, 4], vec![5, 1]], vec![0, 0])).unwrap();

        assert_eq!(clearing.seller_of(0), Some(1));
        assert_eq!(clearing.buyer_of(1), Some(0));
        assert_eq!(clearing.seller_of(2), None);
        assert_eq!(clearing.buyer_of(2), None);
    }

    #[test]
    fn is_perfect() {
        let clearing = MarketClearing {
            assignment: vec![1, 1],
            payoffs: vec![0, 0],
            prices: vec![0, 0],
            rounds: 1,
        };

        assert!(!clearing.is_perfect());
    }
}
