//! Listing records and the rows of the Alpha Vantage listing-status dump.

use serde::{Deserialize, Serialize};

/// One output record: a ticker and, when enrichment resolved it, a display name.
///
/// Field order is the serialized key order and must stay alphabetical
/// (`name` before `symbol`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub symbol: String,
}

impl ListingRecord {
    /// Ticker-only record.
    pub fn ticker(symbol: impl Into<String>) -> Self {
        Self {
            name: None,
            symbol: symbol.into(),
        }
    }

    /// Record with a name as reported upstream (possibly absent).
    pub fn named(symbol: impl Into<String>, name: Option<String>) -> Self {
        Self {
            name,
            symbol: symbol.into(),
        }
    }
}

/// Asset classes the bulk filter splits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Stock,
    Etf,
}

impl AssetType {
    /// Value of the `assetType` column for this class.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "Stock",
            AssetType::Etf => "ETF",
        }
    }
}

/// One row of the `LISTING_STATUS` CSV.
///
/// Columns: symbol, name, exchange, assetType, ipoDate, delistingDate, status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingStatusRow {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    pub asset_type: String,
    #[serde(default)]
    pub ipo_date: Option<String>,
    #[serde(default)]
    pub delisting_date: Option<String>,
    pub status: String,
}

impl ListingStatusRow {
    pub fn is_active(&self) -> bool {
        self.status == "Active"
    }

    pub fn is_asset(&self, asset: AssetType) -> bool {
        self.asset_type == asset.as_str()
    }

    /// Project onto the `symbol` / `name` output record.
    pub fn to_record(&self) -> ListingRecord {
        ListingRecord::named(self.symbol.clone(), self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_only_record_serializes_symbol_alone() {
        let json = serde_json::to_string(&ListingRecord::ticker("MSFT")).unwrap();
        assert_eq!(json, r#"{"symbol":"MSFT"}"#);
    }

    #[test]
    fn named_record_serializes_name_first() {
        let rec = ListingRecord::named("AAPL", Some("Apple Inc.".into()));
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"name":"Apple Inc.","symbol":"AAPL"}"#);
    }

    #[test]
    fn record_without_name_deserializes() {
        let rec: ListingRecord = serde_json::from_str(r#"{"symbol":"IBM"}"#).unwrap();
        assert_eq!(rec, ListingRecord::ticker("IBM"));
    }

    #[test]
    fn status_row_parses_listing_csv() {
        let data = "symbol,name,exchange,assetType,ipoDate,delistingDate,status\n\
                    A,Agilent Technologies Inc,NYSE,Stock,1999-11-18,null,Active\n\
                    AAA,,NYSE ARCA,ETF,2020-09-09,null,Active\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<ListingStatusRow> = rdr.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "A");
        assert_eq!(rows[0].name.as_deref(), Some("Agilent Technologies Inc"));
        assert!(rows[0].is_active());
        assert!(rows[0].is_asset(AssetType::Stock));
        assert_eq!(rows[1].name, None);
        assert!(rows[1].is_asset(AssetType::Etf));
    }
}
