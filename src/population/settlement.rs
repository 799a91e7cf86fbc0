use serde::Serialize;

use crate::grid::CellPos;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suburb {
    center: CellPos,
    member_cells: Vec<CellPos>,
    population: u64,
}

impl Suburb {
    pub fn new(center: CellPos, population: u64) -> Self {
        Self {
            center,
            member_cells: Vec::new(),
            population,
        }
    }

    pub fn center(&self) -> CellPos {
        self.center
    }

    /// Cells beyond the center that belong to the suburb. The diffusion
    /// generator never fills this; population sits on the center cell.
    pub fn member_cells(&self) -> &[CellPos] {
        &self.member_cells
    }

    pub fn population(&self) -> u64 {
        self.population
    }
}

/// Why a city stopped growing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CityFinish {
    BudgetSpent,
    SuburbLimit,
    /// The search range passed the grid or every cell is claimed
    GridExhausted,
    /// A ring used up its sampling attempts without placing a suburb
    RingStarved,
    /// The decayed share floored to zero people
    ZeroAllocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct City {
    suburbs: Vec<Suburb>,
    total_population: u64,
    finish: Option<CityFinish>,
}

impl City {
    /// Starts a city from its center suburb. `total_population` is the budget
    /// drawn when the city was seeded.
    pub fn new(center: Suburb, total_population: u64) -> Self {
        Self {
            suburbs: vec![center],
            total_population,
            finish: None,
        }
    }

    pub fn push_suburb(&mut self, suburb: Suburb) {
        self.suburbs.push(suburb);
    }

    /// A city that ran out of grid before placing anything beyond its center
    /// keeps its whole budget there.
    pub(crate) fn finish(&mut self, reason: CityFinish) {
        if reason == CityFinish::GridExhausted && self.suburbs.len() == 1 {
            self.suburbs[0].population = self.total_population;
        }
        self.finish = Some(reason);
    }

    pub fn center(&self) -> CellPos {
        self.suburbs[0].center
    }

    pub fn center_suburb(&self) -> &Suburb {
        &self.suburbs[0]
    }

    /// All suburbs, center first
    pub fn suburbs(&self) -> &[Suburb] {
        &self.suburbs
    }

    pub fn total_population(&self) -> u64 {
        self.total_population
    }

    pub fn allocated_population(&self) -> u64 {
        self.suburbs.iter().map(Suburb::population).sum()
    }

    /// `None` for cities assembled by hand
    pub fn finish_reason(&self) -> Option<CityFinish> {
        self.finish
    }
}
