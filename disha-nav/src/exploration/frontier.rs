//! Frontier detection and goal-directed ordering.
//!
//! A frontier is a discovered free cell with at least one unknown
//! 4-neighbour. Candidates are ranked by straight-line distance from the
//! cell to the goal, nearest first.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use disha_map::{DiscoveredMap, GridCoord, GridFrame, Position};

/// A frontier cell annotated with its distance to the goal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frontier {
    pub cell: GridCoord,
    pub distance_to_goal: f32,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; row-major order breaks ties
        other
            .distance_to_goal
            .total_cmp(&self.distance_to_goal)
            .then_with(|| other.cell.y.cmp(&self.cell.y))
            .then_with(|| other.cell.x.cmp(&self.cell.x))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Every frontier cell of `map`, in row-major order.
pub fn frontier_cells(map: &DiscoveredMap) -> Vec<GridCoord> {
    map.iter()
        .filter(|&(cell, _)| map.is_free(cell) && map.has_unknown_neighbor(cell))
        .map(|(cell, _)| cell)
        .collect()
}

/// Min-priority queue of frontiers keyed on distance to the goal.
#[derive(Clone, Debug, Default)]
pub struct FrontierQueue {
    heap: BinaryHeap<Frontier>,
}

impl FrontierQueue {
    /// Rank `cells` by distance from their arena position to `goal`.
    pub fn new(
        cells: impl IntoIterator<Item = GridCoord>,
        goal: Position,
        frame: &GridFrame,
    ) -> Self {
        let heap = cells
            .into_iter()
            .map(|cell| Frontier {
                cell,
                distance_to_goal: frame.to_position(cell).distance(&goal),
            })
            .collect();
        Self { heap }
    }

    /// Remove and return the frontier nearest the goal.
    pub fn pop(&mut self) -> Option<Frontier> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disha_map::CellState;

    #[test]
    fn test_unknown_map_has_no_frontiers() {
        assert!(frontier_cells(&DiscoveredMap::unknown()).is_empty());
    }

    #[test]
    fn test_free_cell_next_to_unknown_is_frontier() {
        let mut map = DiscoveredMap::unknown();
        map.set(GridCoord::new(10, 10), CellState::Free);
        assert_eq!(frontier_cells(&map), vec![GridCoord::new(10, 10)]);
    }

    #[test]
    fn test_enclosed_free_cell_is_not_frontier() {
        let mut map = DiscoveredMap::unknown();
        for y in 9..=11 {
            for x in 9..=11 {
                map.set(GridCoord::new(x, y), CellState::Free);
            }
        }
        let cells = frontier_cells(&map);
        assert_eq!(cells.len(), 8);
        assert!(!cells.contains(&GridCoord::new(10, 10)));
    }

    #[test]
    fn test_fully_known_map_has_no_frontiers() {
        let map = DiscoveredMap::from_occupancy(&disha_map::OccupancyGrid::free());
        assert!(frontier_cells(&map).is_empty());
    }

    #[test]
    fn test_queue_pops_nearest_to_goal() {
        let cells = [
            GridCoord::new(1, 95),
            GridCoord::new(15, 95),
            GridCoord::new(5, 91),
        ];
        let mut queue = FrontierQueue::new(cells, Position::new(20.0, 95.0), &GridFrame::default());
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop().unwrap().cell, GridCoord::new(15, 95));
        assert_eq!(queue.pop().unwrap().cell, GridCoord::new(5, 91));
        assert_eq!(queue.pop().unwrap().cell, GridCoord::new(1, 95));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_break_row_major() {
        let cells = [GridCoord::new(12, 10), GridCoord::new(10, 12), GridCoord::new(8, 10)];
        let mut queue = FrontierQueue::new(cells, Position::new(10.0, 10.0), &GridFrame::default());
        assert_eq!(queue.pop().unwrap().cell, GridCoord::new(8, 10));
        assert_eq!(queue.pop().unwrap().cell, GridCoord::new(12, 10));
        assert_eq!(queue.pop().unwrap().cell, GridCoord::new(10, 12));
    }
}
