//! Character-grid rendering of a world, plus a headless progress logger.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use seedworld_core::prelude::*;
use tracing::{info, warn};

/// Columns taken by the stats panel left of the grid, separator included
pub const STATS_WIDTH: u16 = 16;

/// Build one frame: a stats panel followed by the grid, one string per grid row.
/// Food is drawn first so a person is never hidden.
pub fn compose_frame(world: &World) -> Vec<String> {
    let rows = world.rows() as usize;
    let cols = world.cols() as usize;

    let mut grid = vec![vec![' '; cols]; rows];
    for (cell, glyph) in world.food().chain(world.persons()) {
        grid[cell.y as usize][cell.x as usize] = glyph;
    }

    let panel = stats_panel(world);
    let inner = usize::from(STATS_WIDTH) - 1;

    grid.into_iter()
        .enumerate()
        .map(|(row, cells)| {
            let label = panel.get(row).map(String::as_str).unwrap_or("");
            let mut line: String = format!("{:<inner$.inner$}|", label);
            line.extend(cells);
            line
        })
        .collect()
}

fn stats_panel(world: &World) -> Vec<String> {
    let stats = world.stats();
    vec![
        "population".to_string(),
        world.population().to_string(),
        String::new(),
        "age".to_string(),
        world.age().to_string(),
        String::new(),
        "world".to_string(),
        world.id().to_string(),
        String::new(),
        "food".to_string(),
        world.food_count().to_string(),
        String::new(),
        "births".to_string(),
        stats.births.to_string(),
        String::new(),
        "deaths".to_string(),
        stats.deaths().to_string(),
    ]
}

/// Redraws the whole terminal after every tick
pub struct GridRenderer<W: Write> {
    out: W,
    failed: bool,
}

impl<W: Write> GridRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    fn draw(&mut self, world: &World) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        for (row, line) in compose_frame(world).iter().enumerate() {
            // Trailing blanks are skipped so the bottom-right corner is never written
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(self.out, MoveTo(0, row), Print(line.trim_end()))?;
        }
        self.out.flush()
    }
}

impl<W: Write> WorldObserver for GridRenderer<W> {
    fn on_world_update(&mut self, world: &World) {
        match self.draw(world) {
            Ok(()) => self.failed = false,
            Err(err) if !self.failed => {
                warn!(error = %err, "failed to draw frame");
                self.failed = true;
            }
            Err(_) => {}
        }
    }
}

/// Headless stand-in for the renderer: logs a status line every `interval` ticks
pub struct ProgressLog {
    interval: u64,
}

impl ProgressLog {
    pub fn every(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl WorldObserver for ProgressLog {
    fn on_world_update(&mut self, world: &World) {
        if world.age() % self.interval == 0 || world.population() == 0 {
            info!(
                world = %world.id(),
                tick = world.age(),
                population = world.population(),
                food = world.food_count(),
                "progress"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_config() -> SimConfig {
        SimConfig {
            initial_population: 0,
            initial_food: 0,
            food_chance: 0.0,
            fertility: 0.0,
            rng_seed: Some(5),
            ..SimConfig::default()
        }
    }

    #[test]
    fn frame_places_glyphs_after_panel() {
        let mut world = World::seeded(3, 4, still_config()).expect("valid world");
        world.spawn_person_at(Cell::new(0, 0)).expect("free");
        world.spawn_food_at(Cell::new(2, 1)).expect("free");

        let frame = compose_frame(&world);

        assert_eq!(frame.len(), 3);
        let width = usize::from(STATS_WIDTH);
        assert_eq!(frame[0].chars().count(), width + 4);
        assert_eq!(&frame[0][..width], "population     |");
        assert_eq!(&frame[0][width..], "O   ");
        assert_eq!(&frame[1][..width], "1              |");
        assert_eq!(&frame[1][width..], "  . ");
        assert_eq!(&frame[2][width..], "    ");
    }

    #[test]
    fn renderer_writes_frame() {
        let mut world = World::seeded(2, 3, still_config()).expect("valid world");
        world.spawn_person_at(Cell::new(1, 0)).expect("free");

        let mut renderer = GridRenderer::new(Vec::new());
        renderer.on_world_update(&world);

        let output = String::from_utf8(renderer.out).expect("utf8");
        assert!(output.contains("population     | O"));
    }
}
