//! Stock levels shared by the badge in the product list and the dashboard alert.

#[cfg(test)]
#[path = "stock_test.rs"]
mod stock_test;

/// Products with this many units or fewer count as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

#[must_use]
pub fn is_low_stock(stock: i32) -> bool {
    stock <= LOW_STOCK_THRESHOLD
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockLevel {
    /// Zero units on hand.
    Out,
    Low,
    Healthy,
}

impl StockLevel {
    #[must_use]
    pub fn of(stock: i32) -> Self {
        if stock <= 0 {
            Self::Out
        } else if is_low_stock(stock) {
            Self::Low
        } else {
            Self::Healthy
        }
    }

    /// Badge variant name used by the console stylesheet.
    #[must_use]
    pub fn badge_variant(self) -> &'static str {
        match self {
            Self::Out => "destructive",
            Self::Low => "warning",
            Self::Healthy => "success",
        }
    }
}
