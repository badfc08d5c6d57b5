//! Line-oriented REPL over one [`Session`].
//!
//! Each input line is one user action. The session and its cache live for
//! the whole loop, so repeated searches from the same spot are answered
//! without another request.

use anyhow::{anyhow, bail, Context};
use cafefinder_core::{AddressLookup, Coordinate, LocationProvider, PoiSource, Radius};
use cafefinder_search::Session;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
commands:
  find <address>      geocode an address and search around it
  near <lat> <lon>    search around a coordinate
  locate              search around the device location
  radius <meters>     set the search radius for later searches
  select <n>          focus result number n
  clear               clear results
  help                show this help
  quit                exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Find(String),
    Near(Coordinate),
    Locate,
    Radius(Radius),
    Select(usize),
    Clear,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns an error for unknown commands or malformed arguments.
pub fn parse_command(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        // Blank addresses are passed through; the session rejects them with a status.
        "find" => Command::Find(rest.to_owned()),
        "near" => Command::Near(parse_coordinate(rest)?),
        "locate" => Command::Locate,
        "radius" => Command::Radius(
            rest.parse::<Radius>()
                .with_context(|| format!("invalid radius '{rest}'"))?,
        ),
        "select" => {
            let index: usize = rest
                .parse()
                .with_context(|| format!("invalid result number '{rest}'"))?;
            if index == 0 {
                bail!("result numbers start at 1");
            }
            Command::Select(index)
        }
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

/// Accepts `lat,lon` or `lat lon`.
fn parse_coordinate(input: &str) -> anyhow::Result<Coordinate> {
    if input.contains(',') {
        return input
            .parse()
            .with_context(|| format!("invalid coordinate '{input}'"));
    }
    let mut parts = input.split_whitespace();
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(anyhow!("expected 'near <lat> <lon>'"));
    };
    let lat: f64 = lat.parse().with_context(|| format!("invalid latitude '{lat}'"))?;
    let lon: f64 = lon.parse().with_context(|| format!("invalid longitude '{lon}'"))?;
    Ok(Coordinate::new(lat, lon)?)
}

/// Reads commands from `input` until `quit` or end of input.
///
/// Bad input is reported on stderr and the loop continues.
///
/// # Errors
///
/// Returns an error only if reading from `input` fails.
pub async fn run<R, S, L, P>(
    input: R,
    session: &Session<S, L>,
    location: &P,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    S: PoiSource,
    L: AddressLookup,
    P: LocationProvider,
{
    eprintln!("{HELP}");
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e:#}");
                continue;
            }
        };

        let outcome = match command {
            Command::Find(address) => session.find_address(&address).await,
            Command::Near(center) => session.search_at(center).await,
            Command::Locate => session.locate(location).await,
            Command::Radius(radius) => {
                session.set_radius(radius);
                eprintln!("radius set to {radius} m");
                continue;
            }
            Command::Select(index) => {
                let displayed = session.displayed();
                match displayed.as_slice().get(index - 1) {
                    Some(place) => {
                        session.select(place.id);
                    }
                    None => eprintln!("no result #{index} ({} shown)", displayed.len()),
                }
                continue;
            }
            Command::Clear => {
                session.clear();
                continue;
            }
            Command::Help => {
                eprintln!("{HELP}");
                continue;
            }
            Command::Quit => break,
        };
        tracing::debug!(?outcome, "command finished");
    }
    Ok(())
}
