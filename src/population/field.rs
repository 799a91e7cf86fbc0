use std::collections::BTreeSet;

use crate::error::GenError;
use crate::grid::{CellPos, Grid};

use super::settlement::{City, Suburb};

/// Population of every grid cell together with the settlements that produced
/// it. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationField {
    rows: u32,
    cols: u32,
    populations: Vec<u64>,
    cities: Vec<City>,
    city_centers: BTreeSet<CellPos>,
    suburb_centers: BTreeSet<CellPos>,
}

impl PopulationField {
    /// Writes each suburb's population onto its center cell. Every other cell
    /// stays at zero.
    pub fn from_cities(grid: &Grid, cities: Vec<City>) -> Result<Self, GenError> {
        let mut populations = vec![0; grid.cell_count()];
        let mut city_centers = BTreeSet::new();
        let mut suburb_centers = BTreeSet::new();

        for city in &cities {
            city_centers.insert(city.center());
            for suburb in city.suburbs() {
                let center = suburb.center();
                let index = grid.index_of(center).ok_or_else(|| {
                    GenError::invalid(format!("suburb center {center:?} lies outside the grid"))
                })?;
                if !suburb_centers.insert(center) {
                    return Err(GenError::invalid(format!(
                        "cell {center:?} is the center of more than one suburb"
                    )));
                }
                populations[index] = suburb.population();
            }
        }

        Ok(Self {
            rows: grid.rows(),
            cols: grid.cols(),
            populations,
            cities,
            city_centers,
            suburb_centers,
        })
    }

    /// `None` for positions outside the grid
    pub fn population(&self, pos: CellPos) -> Option<u64> {
        if pos.row < self.rows && pos.col < self.cols {
            Some(self.populations[pos.row as usize * self.cols as usize + pos.col as usize])
        } else {
            None
        }
    }

    pub fn total_population(&self) -> u64 {
        self.populations.iter().sum()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn suburbs(&self) -> impl Iterator<Item = &Suburb> + '_ {
        self.cities.iter().flat_map(City::suburbs)
    }

    pub fn suburb_count(&self) -> usize {
        self.suburb_centers.len()
    }

    pub fn city_centers(&self) -> &BTreeSet<CellPos> {
        &self.city_centers
    }

    /// Centers of every suburb, city centers included
    pub fn suburb_centers(&self) -> &BTreeSet<CellPos> {
        &self.suburb_centers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populations_land_on_centers() {
        let grid = Grid::new(3.0, 3.0, 1.0).unwrap();
        let mut city = City::new(Suburb::new(CellPos::new(1, 1), 700), 1_000);
        city.push_suburb(Suburb::new(CellPos::new(0, 2), 200));

        let field = PopulationField::from_cities(&grid, vec![city]).unwrap();

        assert_eq!(field.population(CellPos::new(1, 1)), Some(700));
        assert_eq!(field.population(CellPos::new(0, 2)), Some(200));
        assert_eq!(field.population(CellPos::new(2, 2)), Some(0));
        assert_eq!(field.population(CellPos::new(3, 0)), None);
        assert_eq!(field.total_population(), 900);
        assert_eq!(field.suburb_count(), 2);
        assert!(field.city_centers().contains(&CellPos::new(1, 1)));
    }

    #[test]
    fn test_rejects_shared_or_outside_centers() {
        let grid = Grid::new(2.0, 2.0, 1.0).unwrap();
        let a = City::new(Suburb::new(CellPos::new(0, 0), 10), 10);
        let b = City::new(Suburb::new(CellPos::new(0, 0), 10), 10);
        assert!(PopulationField::from_cities(&grid, vec![a, b]).is_err());

        let outside = City::new(Suburb::new(CellPos::new(2, 0), 10), 10);
        assert!(PopulationField::from_cities(&grid, vec![outside]).is_err());
    }
}
