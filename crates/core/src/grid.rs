//! Classified cell grid plus the rooms placed on it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CellType, Direction, Pos, Room};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<CellType>,
    rooms: Vec<Room>,
}

impl CellGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![CellType::Empty; width * height], rooms: Vec::new() }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn cells(&self) -> &[CellType] {
        &self.cells
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// True when `pos` is at least `border` cells away from every grid edge.
    pub fn in_interior(&self, pos: Pos, border: usize) -> bool {
        let border = border as i32;
        pos.x >= border
            && pos.y >= border
            && pos.x < self.width as i32 - border
            && pos.y < self.height as i32 - border
    }

    pub fn index_of(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y as usize) * self.width + (pos.x as usize))
    }

    pub fn pos_of(&self, index: usize) -> Pos {
        Pos { y: (index / self.width) as i32, x: (index % self.width) as i32 }
    }

    /// Out-of-bounds reads are `Empty`.
    pub fn get(&self, pos: Pos) -> CellType {
        self.index_of(pos).map_or(CellType::Empty, |index| self.cells[index])
    }

    pub(crate) fn set(&mut self, pos: Pos, cell: CellType) {
        if let Some(index) = self.index_of(pos) {
            self.cells[index] = cell;
        }
    }

    pub(crate) fn push_room(&mut self, room: Room) -> usize {
        self.rooms.push(room);
        self.rooms.len() - 1
    }

    /// Stamps `Floor` over the room with `FloorCenter` at its center.
    pub(crate) fn stamp_room(&mut self, room: Room) {
        let center = room.center();
        for pos in room.cells() {
            self.set(pos, if pos == center { CellType::FloorCenter } else { CellType::Floor });
        }
    }

    /// In-bounds 4-neighbours.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |direction| pos.offset(direction))
            .filter(|next| self.in_bounds(*next))
    }

    pub fn neighbor_cells(&self, pos: Pos) -> impl Iterator<Item = CellType> + '_ {
        self.neighbors(pos).map(|next| self.get(next))
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.cells.len()).map(|index| self.pos_of(index))
    }

    pub fn count(&self, cell: CellType) -> usize {
        self.cells.iter().filter(|&&candidate| candidate == cell).count()
    }

    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width) {
            out.extend(row.iter().map(|cell| cell.glyph()));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for CellGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_ascii())
    }
}
