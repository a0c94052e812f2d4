//! Plain-text formats for markets and flow networks.
//!
//! A market file starts with a header holding the market size and the comma-separated opening
//! prices, followed by one line of comma-separated valuations per buyer:
//!
//! ```text
//! 3 0,0,0
//! 12,4,2
//! 8,7,6
//! 7,5,2
//! ```
//!
//! A flow network file holds one directed edge per line, `source target a b`, for an edge cost
//! of `a * x + b`:
//!
//! ```text
//! 0 1 1 0
//! 1 3 0 45
//! ```

use std::{
    fmt::{Debug, Display},
    fs::File,
    hash::Hash,
    io::{BufRead, BufReader, Write},
    str::FromStr,
};

use tracing::{debug, warn};

use crate::{
    edge::{AffineCost, Edge},
    error::{Error, Result},
    market::Market,
    network::FlowNetwork,
};

/// Reads a market from its text form.
///
/// # Examples
///
/// ```
/// use equilibria::io::read_market;
///
/// let market = read_market("2 0,0\n3,1\n1,3\n".as_bytes()).unwrap();
///
/// assert_eq!(market.size(), 2);
/// assert_eq!(market.valuations()[(0, 0)], 3);
/// ```
pub fn read_market(reader: impl BufRead) -> Result<Market> {
    let mut lines = numbered_lines(reader);

    let (number, header) = lines.next().transpose()?.ok_or(Error::Parse {
        line: 1,
        message: "missing header".to_owned(),
    })?;

    let mut fields = header.split_whitespace();
    let n: usize = match fields.next() {
        Some(field) => parse(number, field)?,
        None => return Err(parse_error(number, "missing market size")),
    };
    let prices = match fields.next() {
        Some(field) => parse_list(number, field)?,
        None => return Err(parse_error(number, "missing prices")),
    };
    if let Some(extra) = fields.next() {
        return Err(parse_error(number, format!("unexpected field {extra:?}")));
    }

    if prices.len() != n {
        return Err(Error::dimension_mismatch(
            format!("{n} prices"),
            prices.len(),
        ));
    }

    let rows = lines
        .map(|line| line.and_then(|(number, line)| parse_list(number, &line)))
        .collect::<Result<Vec<_>>>()?;

    debug!(size = n, "read market");

    Market::from_rows(&rows, prices)
}

/// Reads a market from a file, see [`read_market`].
pub fn read_market_file(path: impl AsRef<std::path::Path>) -> Result<Market> {
    read_market(BufReader::new(File::open(path)?))
}

/// Reads a flow network from its text form.
///
/// Lines that don't hold exactly four fields are skipped with a warning; fields that don't parse
/// fail the whole read.
///
/// # Examples
///
/// ```
/// use equilibria::edge::{AffineCost, Edge};
/// use equilibria::io::read_flow_network;
/// use equilibria::network::FlowNetwork;
///
/// let network: FlowNetwork<u32> = read_flow_network("0 1 1 0\n1 2 0 45\n".as_bytes()).unwrap();
///
/// assert_eq!(network.edge_count(), 2);
/// assert_eq!(network.cost(&Edge::new(1, 2)).unwrap(), AffineCost::new(0.0, 45.0));
/// ```
pub fn read_flow_network<T>(reader: impl BufRead) -> Result<FlowNetwork<T>>
where
    T: FromStr + Copy + Eq + Hash + Ord + Debug,
    T::Err: Display,
{
    let mut network = FlowNetwork::new();

    for line in numbered_lines(reader) {
        let (number, line) = line?;

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [source, target, a, b] = fields[..] else {
            warn!(line = number, content = %line, "invalid line format, skipped");
            continue;
        };

        let edge = Edge::new(parse(number, source)?, parse(number, target)?);
        let cost = AffineCost::new(parse(number, a)?, parse(number, b)?);

        if !network.insert(edge, cost)? {
            debug!(line = number, %edge, "edge redefined");
        }
    }

    Ok(network)
}

/// Reads a flow network from a file, see [`read_flow_network`].
pub fn read_flow_network_file<T>(path: impl AsRef<std::path::Path>) -> Result<FlowNetwork<T>>
where
    T: FromStr + Copy + Eq + Hash + Ord + Debug,
    T::Err: Display,
{
    read_flow_network(BufReader::new(File::open(path)?))
}

/// Writes a flow network in its text form, edges in ascending order.
pub fn write_flow_network<T>(network: &FlowNetwork<T>, mut writer: impl Write) -> Result<()>
where
    T: Display + Copy + Eq + Hash + Ord + Debug,
{
    for (edge, cost) in network.edges() {
        writeln!(writer, "{} {} {} {}", edge.source(), edge.target(), cost.a, cost.b)?;
    }

    writer.flush()?;

    Ok(())
}

/// Writes a flow network to a file, see [`write_flow_network`].
pub fn write_flow_network_file<T>(
    network: &FlowNetwork<T>,
    path: impl AsRef<std::path::Path>,
) -> Result<()>
where
    T: Display + Copy + Eq + Hash + Ord + Debug,
{
    write_flow_network(network, File::create(path)?)
}

//
// Helpers
//

/// Non-blank lines with their 1-based line numbers.
fn numbered_lines(reader: impl BufRead) -> impl Iterator<Item = Result<(usize, String)>> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|line| (i + 1, line)).map_err(Error::from))
        .filter(|line| !matches!(line, Ok((_, content)) if content.trim().is_empty()))
}

fn parse<F>(line: usize, field: &str) -> Result<F>
where
    F: FromStr,
    F::Err: Display,
{
    field
        .trim()
        .parse()
        .map_err(|e| parse_error(line, format!("invalid value {field:?}: {e}")))
}

fn parse_list<F>(line: usize, list: &str) -> Result<Vec<F>>
where
    F: FromStr,
    F::Err: Display,
{
    list.split(',').map(|field| parse(line, field)).collect()
}

fn parse_error(line: usize, message: impl ToString) -> Error {
    Error::Parse {
        line,
        message: message.to_string(),
    }
}
