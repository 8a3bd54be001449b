use crate::foundation::core::GoalBox;

/// One of the three columns a goal mouth is split into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionSpan {
    /// First column (inclusive).
    pub x_start: u32,
    /// Last column (exclusive).
    pub x_end: u32,
}

/// A goal box split into left, center and right thirds.
///
/// The thirds share `floor(width / 3)`; any remainder goes to the right region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoalRegions {
    /// The box that was partitioned.
    pub goal: GoalBox,
    /// Width shared by the left and center regions.
    pub region_width: u32,
}

impl GoalRegions {
    /// Partition `goal` into thirds.
    pub fn split(goal: GoalBox) -> Self {
        Self {
            goal,
            region_width: goal.width() / 3,
        }
    }

    /// The two internal separator columns, left to right.
    pub fn boundaries(&self) -> [u32; 2] {
        [
            self.goal.x1 + self.region_width,
            self.goal.x1 + 2 * self.region_width,
        ]
    }

    /// Left, center and right spans.
    pub fn spans(&self) -> [RegionSpan; 3] {
        let [b1, b2] = self.boundaries();
        [
            RegionSpan {
                x_start: self.goal.x1,
                x_end: b1,
            },
            RegionSpan {
                x_start: b1,
                x_end: b2,
            },
            RegionSpan {
                x_start: b2,
                x_end: self.goal.x2,
            },
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/guide/partition.rs"]
mod tests;
