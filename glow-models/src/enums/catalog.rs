use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sort orders accepted by the product listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    /// Store order
    #[default]
    Newest,
    #[serde(alias = "price-asc")]
    PriceAsc,
    #[serde(alias = "price-desc")]
    PriceDesc,
    Name,
}

/// Stock buckets used by listing filters and inventory stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[serde(alias = "in_stock")]
    In,
    Low,
    #[serde(alias = "out_of_stock")]
    Out,
}

impl FromStr for ProductSort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "price_asc" | "price-asc" => Ok(Self::PriceAsc),
            "price_desc" | "price-desc" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            _ => Err(()),
        }
    }
}

impl FromStr for StockStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" | "in_stock" => Ok(Self::In),
            "low" => Ok(Self::Low),
            "out" | "out_of_stock" => Ok(Self::Out),
            _ => Err(()),
        }
    }
}

impl StockStatus {
    /// Classify a stock level against the low stock threshold
    pub fn of(stock: i32, low_threshold: i32) -> Self {
        if stock <= 0 {
            Self::Out
        } else if stock <= low_threshold {
            Self::Low
        } else {
            Self::In
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_boundaries() {
        assert_eq!(StockStatus::of(0, 5), StockStatus::Out);
        assert_eq!(StockStatus::of(1, 5), StockStatus::Low);
        assert_eq!(StockStatus::of(5, 5), StockStatus::Low);
        assert_eq!(StockStatus::of(6, 5), StockStatus::In);
    }

    #[test]
    fn test_sort_aliases() {
        let sort: ProductSort = serde_json::from_str("\"price-asc\"").unwrap();
        assert_eq!(sort, ProductSort::PriceAsc);
        let sort: ProductSort = serde_json::from_str("\"price_desc\"").unwrap();
        assert_eq!(sort, ProductSort::PriceDesc);
        assert!(serde_json::from_str::<ProductSort>("\"random\"").is_err());
    }

    #[test]
    fn test_parse_from_query_values() {
        assert_eq!("price-desc".parse(), Ok(ProductSort::PriceDesc));
        assert_eq!("name".parse(), Ok(ProductSort::Name));
        assert!("cheapest".parse::<ProductSort>().is_err());
        assert_eq!("out_of_stock".parse(), Ok(StockStatus::Out));
        assert_eq!("low".parse(), Ok(StockStatus::Low));
        assert!("plenty".parse::<StockStatus>().is_err());
    }
}
