//! Execution of parsed commands against a network.

use std::io::Write;

use anyhow::{Context, Result};
use subway_core::{LineId, LineStations, SectionRequest, StationId, Subway};

use crate::cli::{Command, LineAction, SectionAction, StationAction};

/// Whether a command changed the network and needs to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

pub fn execute(subway: &Subway, command: Command, out: &mut impl Write) -> Result<Outcome> {
    match command {
        Command::Station { action } => station(subway, action, out),
        Command::Line { action } => line(subway, action, out),
        Command::Section { action } => section(subway, action, out),
        Command::Show { line: Some(id) } => {
            let line = LineStations {
                line: subway.line(LineId(id))?,
                stations: subway.ordered_stations(LineId(id))?,
            };
            print_line(&line, subway.total_distance(LineId(id))?, out)?;
            Ok(Outcome::Unchanged)
        }
        Command::Show { line: None } => {
            for line in subway.network_overview()? {
                let total = subway.total_distance(line.line.id)?;
                print_line(&line, total, out)?;
            }
            Ok(Outcome::Unchanged)
        }
    }
}

fn station(subway: &Subway, action: StationAction, out: &mut impl Write) -> Result<Outcome> {
    match action {
        StationAction::Add { name } => {
            let station = subway.create_station(&name)?;
            writeln!(out, "station {} {}", station.id, station.name)?;
        }
        StationAction::List => {
            for station in subway.stations() {
                writeln!(out, "{}\t{}", station.id, station.name)?;
            }
            return Ok(Outcome::Unchanged);
        }
        StationAction::Rename { id, name } => subway.rename_station(StationId(id), &name)?,
        StationAction::Remove { id } => subway.delete_station(StationId(id))?,
    }
    Ok(Outcome::Changed)
}

fn line(subway: &Subway, action: LineAction, out: &mut impl Write) -> Result<Outcome> {
    match action {
        LineAction::Add { name, color } => {
            let line = subway.create_line(&name, &color)?;
            writeln!(out, "line {} {} ({})", line.id, line.name, line.color)?;
        }
        LineAction::List => {
            for line in subway.lines() {
                writeln!(out, "{}\t{}\t{}", line.id, line.name, line.color)?;
            }
            return Ok(Outcome::Unchanged);
        }
        LineAction::Update { id, name, color } => subway.update_line(LineId(id), &name, &color)?,
        LineAction::Remove { id } => subway.delete_line(LineId(id))?,
    }
    Ok(Outcome::Changed)
}

fn section(subway: &Subway, action: SectionAction, out: &mut impl Write) -> Result<Outcome> {
    let line = match action {
        SectionAction::Add {
            line,
            up,
            down,
            distance,
        } => {
            subway.insert_section(LineId(line), StationId(up), StationId(down), distance)?;
            line
        }
        SectionAction::Place {
            line,
            station,
            base,
            distance,
            direction,
        } => {
            let request = SectionRequest {
                line: LineId(line),
                station: StationId(station),
                base: StationId(base),
                direction: direction.parse()?,
                distance,
            };
            subway.place_section(&request)?;
            line
        }
        SectionAction::Remove { line, station } => {
            subway
                .remove_station(LineId(line), StationId(station))
                .with_context(|| format!("failed to remove station {station} from line {line}"))?;
            line
        }
    };
    let stations = subway.ordered_stations(LineId(line))?;
    let names: Vec<&str> = stations.iter().map(|s| s.name.as_str()).collect();
    writeln!(out, "{}", names.join(" - "))?;
    Ok(Outcome::Changed)
}

fn print_line(line: &LineStations, total: u64, out: &mut impl Write) -> Result<()> {
    let names: Vec<&str> = line.stations.iter().map(|s| s.name.as_str()).collect();
    writeln!(
        out,
        "{} [{}] {}km: {}",
        line.line.name,
        line.line.color,
        total,
        names.join(" - ")
    )?;
    Ok(())
}
