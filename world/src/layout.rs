//! Procedural layout of the single-room arena.

use lockdown_core::{CellCoord, CellRect, Direction, DoorOrientation, GridSize, Tile, TileKind};
use rand::Rng;
use thiserror::Error;

/// Smallest room side that still leaves a one-tile interior inside the border.
pub const MIN_ROOM_SIDE: u32 = 3;

/// Reasons a layout request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The room is too small to hold a border and an interior.
    #[error("room side must be at least {minimum} tiles (received {side})")]
    RoomTooSmall {
        /// Requested room side.
        side: u32,
        /// Smallest accepted side.
        minimum: u32,
    },
    /// The grid cannot contain the room.
    #[error("a {columns}x{rows} grid cannot hold a room with side {side}")]
    GridTooSmall {
        /// Requested grid columns.
        columns: u32,
        /// Requested grid rows.
        rows: u32,
        /// Requested room side.
        side: u32,
    },
}

/// Dense tile grid. Every cell is defined and the dimensions never change.
#[derive(Clone, Debug)]
pub struct Grid {
    size: GridSize,
    tiles: Vec<Tile>,
}

impl Grid {
    fn filled(size: GridSize, kind: TileKind) -> Self {
        let mut tiles = Vec::with_capacity(size.columns() as usize * size.rows() as usize);
        for row in 0..size.rows() {
            for column in 0..size.columns() {
                tiles.push(Tile::new(CellCoord::new(column, row), kind));
            }
        }
        Self { size, tiles }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the tile at the signed coordinate, or `None` outside the grid.
    #[must_use]
    pub fn tile_at(&self, x: i64, y: i64) -> Option<&Tile> {
        let column = u32::try_from(x).ok()?;
        let row = u32::try_from(y).ok()?;
        self.tile(CellCoord::new(column, row))
    }

    /// Returns the tile at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<&Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index))
    }

    /// Iterator over every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Reports whether entities may stand on `cell`.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.tile(cell).is_some_and(|tile| tile.kind().is_passable())
    }

    fn set(&mut self, cell: CellCoord, kind: TileKind) {
        if let Some(index) = self.index(cell) {
            self.tiles[index] = Tile::new(cell, kind);
        }
    }

    /// Replaces a door tile with floor. Returns `false` when `cell` holds no door.
    pub(crate) fn open_door(&mut self, cell: CellCoord) -> bool {
        match self.tile(cell).map(Tile::kind) {
            Some(TileKind::Door { .. }) => {
                self.set(cell, TileKind::Floor);
                true
            }
            _ => false,
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.size.columns() && cell.row() < self.size.rows() {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size.columns()).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Generated arena: grid, rooms, player start and initial enemy placements.
#[derive(Clone, Debug)]
pub struct Layout {
    grid: Grid,
    rooms: Vec<CellRect>,
    start: CellCoord,
    initial_enemies: Vec<CellCoord>,
}

impl Layout {
    /// Tile grid of the arena.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Rooms carved into the grid. Currently always a single central room.
    #[must_use]
    pub fn rooms(&self) -> &[CellRect] {
        &self.rooms
    }

    /// Tile at the centre of the room where the player starts.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Tiles chosen for the enemies present when the encounter begins.
    #[must_use]
    pub fn initial_enemies(&self) -> &[CellCoord] {
        &self.initial_enemies
    }

    /// Reports whether the signed coordinate lies within any room grown by one
    /// tile on every side.
    #[must_use]
    pub fn within_room(&self, x: i64, y: i64) -> bool {
        self.rooms
            .iter()
            .any(|room| room.contains_with_margin(x, y, 1))
    }
}

/// Builds the arena: a walled grid with one centred square room, a door in the
/// middle of each room edge and one corridor floor tile inside every door.
pub fn generate<R>(
    size: GridSize,
    room_side: u32,
    initial_enemies: u32,
    rng: &mut R,
) -> Result<Layout, LayoutError>
where
    R: Rng + ?Sized,
{
    if room_side < MIN_ROOM_SIDE {
        return Err(LayoutError::RoomTooSmall {
            side: room_side,
            minimum: MIN_ROOM_SIDE,
        });
    }
    if size.columns() < room_side || size.rows() < room_side {
        return Err(LayoutError::GridTooSmall {
            columns: size.columns(),
            rows: size.rows(),
            side: room_side,
        });
    }

    let origin = CellCoord::new(
        size.columns() / 2 - room_side / 2,
        size.rows() / 2 - room_side / 2,
    );
    let room = CellRect::from_origin_and_size(origin, GridSize::new(room_side, room_side));

    let mut grid = Grid::filled(size, TileKind::Wall);
    for row in origin.row() + 1..origin.row() + room_side - 1 {
        for column in origin.column() + 1..origin.column() + room_side - 1 {
            grid.set(CellCoord::new(column, row), TileKind::Floor);
        }
    }

    for (side, door, corridor) in door_placements(room) {
        grid.set(
            door,
            TileKind::Door {
                orientation: DoorOrientation::for_side(side),
            },
        );
        grid.set(corridor, TileKind::Floor);
    }

    let start = room.center();
    let initial_enemies = (0..initial_enemies)
        .map(|_| initial_enemy_cell(room, rng))
        .collect();

    Ok(Layout {
        grid,
        rooms: vec![room],
        start,
        initial_enemies,
    })
}

/// Door cell and the corridor cell just inside it for each wall of `room`.
fn door_placements(room: CellRect) -> [(Direction, CellCoord, CellCoord); 4] {
    let origin = room.origin();
    let side = room.size().columns();
    let mid = side / 2;
    let last = side - 1;
    let at = |column: u32, row: u32| CellCoord::new(origin.column() + column, origin.row() + row);

    [
        (Direction::North, at(mid, 0), at(mid, 1)),
        (Direction::East, at(last, mid), at(last - 1, mid)),
        (Direction::South, at(mid, last), at(mid, last - 1)),
        (Direction::West, at(0, mid), at(1, mid)),
    ]
}

fn initial_enemy_cell<R>(room: CellRect, rng: &mut R) -> CellCoord
where
    R: Rng + ?Sized,
{
    let side = room.size().columns();
    if side < 5 {
        return room.center();
    }

    let span = side - 4;
    let origin = room.origin();
    CellCoord::new(
        origin.column() + 2 + rng.gen_range(0..span),
        origin.row() + 2 + rng.gen_range(0..span),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn layout(columns: u32, rows: u32, side: u32) -> Layout {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        generate(GridSize::new(columns, rows), side, 1, &mut rng).expect("valid layout")
    }

    #[test]
    fn default_arena_matches_reference_coordinates() {
        let layout = layout(81, 81, 15);
        let room = layout.rooms()[0];
        assert_eq!(room.origin(), CellCoord::new(33, 33));
        assert_eq!(layout.start(), CellCoord::new(40, 40));

        let doors: Vec<_> = layout
            .grid()
            .tiles()
            .filter(|tile| matches!(tile.kind(), TileKind::Door { .. }))
            .map(|tile| (tile.cell(), tile.kind()))
            .collect();
        assert_eq!(
            doors,
            vec![
                (
                    CellCoord::new(40, 33),
                    TileKind::Door {
                        orientation: DoorOrientation::Horizontal
                    }
                ),
                (
                    CellCoord::new(33, 40),
                    TileKind::Door {
                        orientation: DoorOrientation::Vertical
                    }
                ),
                (
                    CellCoord::new(47, 40),
                    TileKind::Door {
                        orientation: DoorOrientation::Vertical
                    }
                ),
                (
                    CellCoord::new(40, 47),
                    TileKind::Door {
                        orientation: DoorOrientation::Horizontal
                    }
                ),
            ]
        );
    }

    #[test]
    fn border_stays_wall_and_interior_is_floor() {
        let layout = layout(20, 20, 7);
        let grid = layout.grid();
        let origin = layout.rooms()[0].origin();

        let corner = grid.tile(origin).expect("corner");
        assert_eq!(corner.kind(), TileKind::Wall);
        let inside = grid
            .tile(CellCoord::new(origin.column() + 1, origin.row() + 1))
            .expect("interior");
        assert_eq!(inside.kind(), TileKind::Floor);
        assert_eq!(grid.tile_at(0, 0).map(Tile::kind), Some(TileKind::Wall));
    }

    #[test]
    fn tile_lookup_misses_outside_grid() {
        let layout = layout(16, 16, 15);
        let grid = layout.grid();
        assert!(grid.tile_at(-1, 0).is_none());
        assert!(grid.tile_at(0, -1).is_none());
        assert!(grid.tile_at(16, 0).is_none());
        assert!(grid.tile_at(0, 16).is_none());
        assert!(grid.tile_at(15, 15).is_some());
    }

    #[test]
    fn within_room_includes_one_tile_margin() {
        let layout = layout(81, 81, 15);
        assert!(layout.within_room(32, 32));
        assert!(layout.within_room(48, 48));
        assert!(!layout.within_room(49, 40));
        assert!(!layout.within_room(31, 40));
        assert!(!layout.within_room(-5, -5));
    }

    #[test]
    fn rejects_grid_smaller_than_room() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let error = generate(GridSize::new(14, 40), 15, 1, &mut rng).expect_err("too small");
        assert_eq!(
            error,
            LayoutError::GridTooSmall {
                columns: 14,
                rows: 40,
                side: 15
            }
        );
    }

    #[test]
    fn rejects_degenerate_room() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let error = generate(GridSize::new(10, 10), 2, 1, &mut rng).expect_err("too small");
        assert_eq!(
            error,
            LayoutError::RoomTooSmall {
                side: 2,
                minimum: MIN_ROOM_SIDE
            }
        );
    }

    #[test]
    fn initial_enemies_land_on_interior_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let layout = generate(GridSize::new(81, 81), 15, 16, &mut rng).expect("layout");
        let room = layout.rooms()[0];
        for cell in layout.initial_enemies() {
            assert!(layout.grid().is_passable(*cell));
            assert!(cell.column() >= room.origin().column() + 2);
            assert!(cell.column() < room.origin().column() + 13);
            assert!(cell.row() >= room.origin().row() + 2);
            assert!(cell.row() < room.origin().row() + 13);
        }
    }

    #[test]
    fn opening_a_door_turns_it_into_floor_once() {
        let mut layout = layout(81, 81, 15);
        let door = CellCoord::new(40, 33);
        assert!(!layout.grid().is_passable(door));
        assert!(layout.grid_mut().open_door(door));
        assert!(layout.grid().is_passable(door));
        assert!(!layout.grid_mut().open_door(door));
    }
}
