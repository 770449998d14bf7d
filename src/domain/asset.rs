/// One parsed market snapshot entry for a single asset.
///
/// Records are immutable once constructed; every fetch cycle produces a fresh
/// batch that replaces the previous one wholesale. Ranked views share records
/// through `Arc` rather than copying them.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub name: String,
    /// Source-provided rank, kept as an opaque ordering label.
    pub rank: i64,
    pub symbol: String,
    pub price: f64,
    /// 24h trading volume in source currency units.
    pub volume: i64,
    /// Truncated at the decimal point, never rounded.
    pub market_cap: i64,
    /// Fraction, e.g. 0.0123 for a 1.23% move.
    pub hour_change: f64,
    pub day_change: f64,
    /// volume / market_cap, computed at extraction time.
    pub volume_to_cap_ratio: f64,
}
