//! The car record aggregated throughout the walkthrough scenarios

use std::fmt;

use serde::{Deserialize, Serialize};

/// An immutable car listing.
///
/// Equality is field equality; there is no identity beyond the values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    /// Listing identifier
    id: i32,

    /// Model name
    model: String,

    /// Paint color
    color: String,

    /// Model year
    year: i32,

    /// Asking price
    price: f64,
}

impl Car {
    /// Create a new car record
    pub fn new(
        id: i32,
        model: impl Into<String>,
        color: impl Into<String>,
        year: i32,
        price: f64,
    ) -> Self {
        Self {
            id,
            model: model.into(),
            color: color.into(),
            year,
            price,
        }
    }

    /// Listing identifier
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Paint color
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Model year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Asking price
    pub fn price(&self) -> f64 {
        self.price
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Car {{ id: {}, model: {}, color: {}, year: {}, price: {:.2} }}",
            self.id, self.model, self.color, self.year, self.price
        )
    }
}
