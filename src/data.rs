use crate::error::{Error, Result};
use rust_decimal::Decimal;
use std::{io, str::FromStr};

pub const RECIPE: &str = "Recipe";
pub const INGREDIENT: &str = "Ingredient";
pub const INGREDIENT_RATE: &str = "Ingredient Rate";

/// One row of the edge list: `recipe` consumes `rate` of `ingredient` per unit produced.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord {
    pub recipe: String,
    pub ingredient: String,
    pub rate: Decimal,
    /// Any other columns, in header order.
    pub attributes: Vec<(String, String)>,
}

pub fn read_edges<R: io::Read>(reader: R) -> Result<Vec<EdgeRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(Error::MissingColumn(name))
    };
    let recipe = column(RECIPE)?;
    let ingredient = column(INGREDIENT)?;
    let rate = column(INGREDIENT_RATE)?;

    let mut edges = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let value = &record[rate];
        edges.push(EdgeRecord {
            recipe: record[recipe].to_owned(),
            ingredient: record[ingredient].to_owned(),
            rate: parse_rate(value).ok_or_else(|| Error::InvalidRate {
                line,
                value: value.to_owned(),
            })?,
            attributes: headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(i, _)| ![recipe, ingredient, rate].contains(i))
                .map(|(_, (h, v))| (h.to_owned(), v.to_owned()))
                .collect(),
        });
    }
    Ok(edges)
}

fn parse_rate(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}
