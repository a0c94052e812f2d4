//! The preferred-seller graph of a cleared market.
//!
//! Buyers are vertices `0..n` and sellers are vertices `n..2n`. Each seller carries its clearing
//! price and each buyer has a single edge to the seller it was matched with, annotated with the
//! buyer's payoff.

use serde::Serialize;

use crate::{
    error::{Error, Result},
    market::MarketClearing,
};

/// A seller vertex and its clearing price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SellerNode {
    pub vertex: usize,
    pub price: i64,
}

/// A buyer to seller edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PreferredEdge {
    pub buyer: usize,
    /// Seller vertex, offset by the number of buyers.
    pub seller: usize,
    pub payoff: i64,
}

impl PreferredEdge {
    /// Text label for rendering the edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::preferred::PreferredEdge;
    ///
    /// let edge = PreferredEdge { buyer: 0, seller: 3, payoff: 4 };
    /// assert_eq!(edge.label(), "Payoff: 4");
    /// ```
    pub fn label(&self) -> String {
        format!("Payoff: {}", self.payoff)
    }
}

/// A bipartite directed graph from buyers to their assigned sellers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PreferredSellerGraph {
    buyers: usize,
    sellers: Vec<SellerNode>,
    edges: Vec<PreferredEdge>,
}

impl PreferredSellerGraph {
    /// Builds the graph of `n` buyers and sellers from an assignment, the buyers' payoffs and the
    /// sellers' prices.
    pub fn new(n: usize, assignment: &[usize], payoffs: &[i64], prices: &[i64]) -> Result<Self> {
        for (name, len) in [
            ("assignment", assignment.len()),
            ("payoffs", payoffs.len()),
            ("prices", prices.len()),
        ] {
            if len != n {
                return Err(Error::dimension_mismatch(format!("{n} {name}"), len));
            }
        }

        let sellers: Vec<SellerNode> = prices
            .iter()
            .enumerate()
            .map(|(j, &price)| SellerNode { vertex: n + j, price })
            .collect();

        let edges: Vec<PreferredEdge> = assignment
            .iter()
            .zip(payoffs)
            .enumerate()
            .map(|(buyer, (&seller, &payoff))| {
                if seller >= n {
                    return Err(Error::dimension_mismatch(
                        format!("a seller below {n} for buyer {buyer}"),
                        seller,
                    ));
                }

                Ok(PreferredEdge {
                    buyer,
                    seller: n + seller,
                    payoff,
                })
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            buyers: n,
            sellers,
            edges,
        })
    }

    pub fn buyer_count(&self) -> usize {
        self.buyers
    }

    /// Buyer vertices.
    pub fn buyers(&self) -> std::ops::Range<usize> {
        0..self.buyers
    }

    pub fn sellers(&self) -> &[SellerNode] {
        &self.sellers
    }

    pub fn edges(&self) -> &[PreferredEdge] {
        &self.edges
    }

    /// Returns the edge leaving `buyer`.
    pub fn edge_from(&self, buyer: usize) -> Option<&PreferredEdge> {
        self.edges.get(buyer)
    }

    /// Returns whether `vertex` is a buyer, as opposed to a seller.
    pub fn is_buyer(&self, vertex: usize) -> bool {
        vertex < self.buyers
    }
}

impl TryFrom<&MarketClearing> for PreferredSellerGraph {
    type Error = Error;

    fn try_from(clearing: &MarketClearing) -> Result<Self> {
        Self::new(
            clearing.assignment.len(),
            &clearing.assignment,
            &clearing.payoffs,
            &clearing.prices,
        )
    }
}
