//! Boundary between the optimizer and whatever supplies demands and
//! consumes results.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::RunConfig;
use crate::error::{HostError, Result};
use crate::render;
use crate::solver::Solver;
use crate::types::{Demand, ParentRoll, RollPlan, Solution};

pub trait Host {
    fn read_demands(&mut self) -> std::result::Result<Vec<Demand>, HostError>;

    fn write_result(&mut self, solution: &Solution) -> std::result::Result<(), HostError>;
}

/// Reads demands from `host`, solves, hands the result back and, when
/// configured, persists the roll plans.
pub async fn run<H: Host>(host: &mut H, parent: ParentRoll, config: &RunConfig) -> Result<Solution> {
    let raw = host.read_demands()?;
    info!(demands = raw.len(), parent = parent.width, "read demands");

    let solver = Solver::new(parent, raw, config.clone());
    let solution = solver.solve().await?;

    host.write_result(&solution)?;
    if config.emit_output {
        persist_rolls(&config.output_path, &solution.rolls)?;
        info!(path = %config.output_path.display(), "wrote roll plans");
    }
    Ok(solution)
}

/// Writes the plans as a JSON array of `{pieces, waste}` objects.
pub fn persist_rolls(path: &Path, rolls: &[RollPlan]) -> std::result::Result<(), HostError> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rolls)?;
    writer.flush()?;
    Ok(())
}

/// Parses a cut given as `width:qty`, e.g. `30.5:4`.
pub fn parse_cut(s: &str) -> std::result::Result<Demand, HostError> {
    let (width, qty) = s
        .split_once(':')
        .ok_or_else(|| HostError::Parse(format!("invalid cut '{}', expected width:qty", s)))?;
    let width = parse_width(width)?;
    let qty = qty
        .trim()
        .parse::<u32>()
        .map_err(|_| HostError::Parse(format!("invalid quantity in '{}'", s)))?;
    Ok(Demand::new(width, qty))
}

pub fn parse_width(s: &str) -> std::result::Result<f64, HostError> {
    let width = s
        .trim()
        .parse::<f64>()
        .map_err(|_| HostError::Parse(format!("invalid width '{}'", s)))?;
    if !width.is_finite() || width <= 0.0 {
        return Err(HostError::Parse(format!("width must be positive in '{}'", s)));
    }
    Ok(width)
}

/// Prints one line per roll followed by a summary.
pub fn print_solution<W: Write>(
    out: &mut W,
    solution: &Solution,
    layout: bool,
) -> std::result::Result<(), HostError> {
    for (i, roll) in solution.rolls.iter().enumerate() {
        let pieces: Vec<String> = roll.pieces.iter().map(|p| p.to_string()).collect();
        writeln!(
            out,
            "Roll {}: [{}], Waste: {:.2}",
            i + 1,
            pieces.join(", "),
            roll.waste
        )?;
        if layout {
            writeln!(out, "{}", render::render_roll(solution.parent.width, roll))?;
        }
    }
    writeln!(
        out,
        "Summary: {} roll{} used, {:.1}% waste ({})",
        solution.rolls_used(),
        if solution.rolls_used() == 1 { "" } else { "s" },
        solution.total_waste_percent(),
        solution.source,
    )?;
    Ok(())
}

/// Demands given as `width:qty` strings, results printed to `out`.
pub struct ArgsHost<W: Write> {
    cuts: Vec<String>,
    out: W,
    layout: bool,
}

impl<W: Write> ArgsHost<W> {
    pub fn new(cuts: Vec<String>, out: W, layout: bool) -> Self {
        Self { cuts, out, layout }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Host for ArgsHost<W> {
    fn read_demands(&mut self) -> std::result::Result<Vec<Demand>, HostError> {
        self.cuts.iter().map(|c| parse_cut(c)).collect()
    }

    fn write_result(&mut self, solution: &Solution) -> std::result::Result<(), HostError> {
        print_solution(&mut self.out, solution, self.layout)
    }
}

/// Demands read from a JSON array of `{width, qty}` objects.
pub struct JsonFileHost<W: Write> {
    path: PathBuf,
    out: W,
    layout: bool,
}

impl<W: Write> JsonFileHost<W> {
    pub fn new(path: impl Into<PathBuf>, out: W, layout: bool) -> Self {
        Self {
            path: path.into(),
            out,
            layout,
        }
    }
}

impl<W: Write> Host for JsonFileHost<W> {
    fn read_demands(&mut self) -> std::result::Result<Vec<Demand>, HostError> {
        let file = std::fs::File::open(&self.path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    fn write_result(&mut self, solution: &Solution) -> std::result::Result<(), HostError> {
        print_solution(&mut self.out, solution, self.layout)
    }
}
