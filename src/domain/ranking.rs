use std::cmp::Ordering;
use std::sync::Arc;

use crate::domain::asset::AssetRecord;

/// Result-set sizes the UI layer may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewLimit {
    #[default]
    Twenty,
    Thirty,
    Fifty,
}

impl ViewLimit {
    pub fn as_len(&self) -> usize {
        match self {
            ViewLimit::Twenty => 20,
            ViewLimit::Thirty => 30,
            ViewLimit::Fifty => 50,
        }
    }
}

impl TryFrom<usize> for ViewLimit {
    type Error = anyhow::Error;

    fn try_from(len: usize) -> Result<Self, Self::Error> {
        match len {
            20 => Ok(ViewLimit::Twenty),
            30 => Ok(ViewLimit::Thirty),
            50 => Ok(ViewLimit::Fifty),
            other => anyhow::bail!("unsupported result-set size: {} (use 20, 30 or 50)", other),
        }
    }
}

/// Which ranked view the caller wants to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankCriterion {
    #[default]
    HourAscending,
    HourDescending,
    DayAscending,
    DayDescending,
}

/// Four size-bounded orderings over one snapshot batch.
///
/// Views share the batch's records through `Arc`; recomputing for a new limit
/// or criterion re-sorts the batch rather than mutating any view in place.
#[derive(Debug, Clone, Default)]
pub struct RankedViews {
    pub hour_asc: Vec<Arc<AssetRecord>>,
    pub hour_desc: Vec<Arc<AssetRecord>>,
    pub day_asc: Vec<Arc<AssetRecord>>,
    pub day_desc: Vec<Arc<AssetRecord>>,
}

impl RankedViews {
    pub fn select(&self, criterion: RankCriterion) -> &[Arc<AssetRecord>] {
        match criterion {
            RankCriterion::HourAscending => &self.hour_asc,
            RankCriterion::HourDescending => &self.hour_desc,
            RankCriterion::DayAscending => &self.day_asc,
            RankCriterion::DayDescending => &self.day_desc,
        }
    }
}

/// Rank a batch into its four views, each truncated to `limit` entries.
///
/// Sorts are stable: records with equal change values keep their input order
/// in every view. Invalid limits are rejected upstream by [`ViewLimit`].
pub fn rank(records: &[Arc<AssetRecord>], limit: usize) -> RankedViews {
    RankedViews {
        hour_asc: sorted_view(records, limit, |r| r.hour_change, false),
        hour_desc: sorted_view(records, limit, |r| r.hour_change, true),
        day_asc: sorted_view(records, limit, |r| r.day_change, false),
        day_desc: sorted_view(records, limit, |r| r.day_change, true),
    }
}

fn sorted_view(
    records: &[Arc<AssetRecord>],
    limit: usize,
    key: impl Fn(&AssetRecord) -> f64,
    descending: bool,
) -> Vec<Arc<AssetRecord>> {
    let mut view: Vec<Arc<AssetRecord>> = records.to_vec();
    view.sort_by(|a, b| {
        let ordering = key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal);
        if descending { ordering.reverse() } else { ordering }
    });
    view.truncate(limit.min(records.len()));
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::test_support::record;

    #[test]
    fn test_view_limit_boundary() {
        assert_eq!(ViewLimit::try_from(30).unwrap(), ViewLimit::Thirty);
        assert!(ViewLimit::try_from(25).is_err());
        assert_eq!(ViewLimit::default().as_len(), 20);
    }

    #[test]
    fn test_rank_orders_each_view() {
        let records = vec![
            record("AAA", 0.02, -0.01),
            record("BBB", -0.05, 0.03),
            record("CCC", 0.10, 0.00),
        ];

        let views = rank(&records, 20);

        let hour_asc: Vec<&str> = views.hour_asc.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(hour_asc, vec!["BBB", "AAA", "CCC"]);

        let hour_desc: Vec<&str> = views.hour_desc.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(hour_desc, vec!["CCC", "AAA", "BBB"]);

        let day_asc: Vec<&str> = views.day_asc.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(day_asc, vec!["AAA", "CCC", "BBB"]);

        let day_desc: Vec<&str> = views.day_desc.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(day_desc, vec!["BBB", "CCC", "AAA"]);
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let records: Vec<_> = (0..40)
            .map(|i| record(&format!("SYM{i}"), i as f64 / 100.0, 0.0))
            .collect();

        let views = rank(&records, 20);
        assert_eq!(views.hour_asc.len(), 20);
        assert_eq!(views.hour_desc.len(), 20);

        // Smaller batches are not padded.
        let views = rank(&records[..5], 20);
        assert_eq!(views.day_desc.len(), 5);
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let records = vec![
            record("FIRST", 0.01, 0.01),
            record("SECOND", 0.01, 0.01),
            record("THIRD", 0.01, 0.01),
        ];

        let views = rank(&records, 20);
        for view in [
            &views.hour_asc,
            &views.hour_desc,
            &views.day_asc,
            &views.day_desc,
        ] {
            let symbols: Vec<&str> = view.iter().map(|r| r.symbol.as_str()).collect();
            assert_eq!(symbols, vec!["FIRST", "SECOND", "THIRD"]);
        }
    }

    #[test]
    fn test_select_maps_criterion_to_view() {
        let records = vec![record("AAA", 0.02, -0.01), record("BBB", -0.05, 0.03)];
        let views = rank(&records, 20);

        assert_eq!(views.select(RankCriterion::HourAscending)[0].symbol, "BBB");
        assert_eq!(views.select(RankCriterion::DayDescending)[0].symbol, "BBB");
        assert_eq!(views.select(RankCriterion::HourDescending)[0].symbol, "AAA");
    }
}
