//! Active stock / ETF split of the listing-status dump.

use crate::domain::{AssetType, ListingRecord, ListingStatusRow};

/// Active listings of one asset class, projected to `symbol` / `name`, in row order.
pub fn filter_active(rows: &[ListingStatusRow], asset: AssetType) -> Vec<ListingRecord> {
    rows.iter()
        .filter(|r| r.is_active() && r.is_asset(asset))
        .map(ListingStatusRow::to_record)
        .collect()
}

/// Both record sets the `all` command writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSplit {
    pub stocks: Vec<ListingRecord>,
    pub etfs: Vec<ListingRecord>,
}

pub fn split_active(rows: &[ListingStatusRow]) -> BulkSplit {
    BulkSplit {
        stocks: filter_active(rows, AssetType::Stock),
        etfs: filter_active(rows, AssetType::Etf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(symbol: &str, status: &str, asset_type: &str) -> ListingStatusRow {
        ListingStatusRow {
            symbol: symbol.into(),
            name: Some(format!("{symbol} Corp")),
            exchange: Some("NYSE".into()),
            asset_type: asset_type.into(),
            ipo_date: None,
            delisting_date: None,
            status: status.into(),
        }
    }

    #[test]
    fn splits_active_stocks_and_etfs() {
        let rows = vec![
            row("AAA", "Active", "Stock"),
            row("BBB", "Delisted", "Stock"),
            row("CCC", "Active", "ETF"),
        ];
        let split = split_active(&rows);
        assert_eq!(
            split.stocks,
            vec![ListingRecord::named("AAA", Some("AAA Corp".into()))]
        );
        assert_eq!(
            split.etfs,
            vec![ListingRecord::named("CCC", Some("CCC Corp".into()))]
        );
    }

    #[test]
    fn preserves_row_order_and_duplicates() {
        let rows = vec![
            row("ZZZ", "Active", "Stock"),
            row("AAA", "Active", "Stock"),
            row("ZZZ", "Active", "Stock"),
        ];
        let symbols: Vec<String> = filter_active(&rows, AssetType::Stock)
            .into_iter()
            .map(|r| r.symbol)
            .collect();
        assert_eq!(symbols, vec!["ZZZ", "AAA", "ZZZ"]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let rows = vec![row("AAA", "active", "Stock"), row("BBB", "Active", "etf")];
        let split = split_active(&rows);
        assert!(split.stocks.is_empty());
        assert!(split.etfs.is_empty());
    }
}
