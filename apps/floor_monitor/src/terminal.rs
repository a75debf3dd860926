use std::io::{self, Write};

use anyhow::Context;
use floor_render::{CellMark, ChartPoint, DisplayMode, FloorRenderer, FloorScene, SlotIcon};

const VEHICLE: &str = "@";
const DESTINATION: &str = "!";
const MAX_LABEL_WIDTH: usize = 8;

/// Draws each scene as a block of text, row 1 at the top.
pub struct TerminalRenderer<W> {
    out: W,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, scene: &FloorScene) -> io::Result<()> {
        let width = cell_width(scene);
        let mut canvas = vec![vec![" ".to_string(); scene.cols]; scene.rows];

        for cell in &scene.cells {
            let text = match (&cell.label, scene.display_mode) {
                (Some(label), mode) if mode != DisplayMode::None => label.clone(),
                _ => mark_glyph(cell.mark),
            };
            put(&mut canvas, scene.rows, cell.point, text);
        }
        for flag in &scene.destinations {
            put(&mut canvas, scene.rows, flag.point, DESTINATION.to_string());
        }
        for vehicle in &scene.vehicles {
            put(&mut canvas, scene.rows, vehicle.point, VEHICLE.to_string());
        }

        writeln!(
            self.out,
            "-- {} / labels: {:?} --",
            scene.projection, scene.display_mode
        )?;
        for line in canvas {
            let row: Vec<String> = line
                .iter()
                .map(|text| {
                    let clipped: String = text.chars().take(width).collect();
                    format!("{clipped:<width$}")
                })
                .collect();
            writeln!(self.out, "{}", row.join(" ").trim_end())?;
        }
        writeln!(
            self.out,
            "slots: total {} used {} free {} locked {}",
            scene.stats.total,
            scene.stats.used,
            scene.stats.free,
            scene.stats.locked()
        )?;
        for vehicle in &scene.vehicles {
            writeln!(
                self.out,
                "vehicle {} [{}] {}",
                vehicle.id,
                vehicle.color_hex,
                vehicle.tooltip.replace('\n', ", ")
            )?;
        }
        for flag in &scene.destinations {
            writeln!(self.out, "{} -> {}", flag.label, flag.slot)?;
        }
        self.out.flush()
    }
}

impl<W: Write + Send> FloorRenderer for TerminalRenderer<W> {
    fn render(&mut self, scene: &FloorScene) -> anyhow::Result<()> {
        self.draw(scene).context("failed to write floor to terminal")
    }
}

fn cell_width(scene: &FloorScene) -> usize {
    if scene.display_mode == DisplayMode::None {
        return 1;
    }
    scene
        .cells
        .iter()
        .filter_map(|cell| cell.label.as_ref())
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(1)
        .min(MAX_LABEL_WIDTH)
}

fn mark_glyph(mark: CellMark) -> String {
    match mark {
        CellMark::Icon(icon) => match icon {
            SlotIcon::Vacant => ".",
            SlotIcon::Occupied => "#",
            SlotIcon::Passage => "=",
            SlotIcon::Locked => "x",
            SlotIcon::Charger => "C",
            SlotIcon::Loading => "P",
        }
        .to_string(),
        CellMark::Heat(class) => class.to_string(),
    }
}

/// Points outside the canvas, e.g. vehicles reported off the grid, are dropped.
fn put(canvas: &mut [Vec<String>], rows: usize, point: ChartPoint, text: String) {
    if point.x < 0 || point.y < 0 || point.y as usize >= rows {
        return;
    }
    let row = rows - 1 - point.y as usize;
    if let Some(cell) = canvas[row].get_mut(point.x as usize) {
        *cell = text;
    }
}
