//! Statistics over matches partitioned into query groups.
//!
//! "Global" statistics pool every group into one ranked list before scoring.
//! "Mean" statistics score each group on its own and take the unweighted
//! mean, which is 0 when there are no groups.

use super::metrics::{global_average_precision, global_ndcg, CurveOptions};
use crate::matching::Match;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Sorts matches by decreasing hypothesis score, false negatives last.
///
/// The sort is stable, so equal scores (and the false negatives) keep their
/// relative order.
pub fn sort_matches_by_score<L>(matches: &mut [Match<L>]) {
    matches.sort_by(|a, b| match (a.hypothesis(), b.hypothesis()) {
        (Some(ha), Some(hb)) => hb.score.total_cmp(&ha.score),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn ordered<L: Clone>(matches: &[Match<L>], sort: bool) -> Cow<'_, [Match<L>]> {
    if sort {
        let mut owned = matches.to_vec();
        sort_matches_by_score(&mut owned);
        Cow::Owned(owned)
    } else {
        Cow::Borrowed(matches)
    }
}

fn pooled<L: Clone>(groups: &[Vec<Match<L>>], sort: bool) -> Vec<Match<L>> {
    let mut all: Vec<Match<L>> = groups.iter().flatten().cloned().collect();
    if sort {
        sort_matches_by_score(&mut all);
    }
    all
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

/// Average Precision of all groups pooled into a single ranked list.
pub fn grouped_global_average_precision<L: Clone>(
    groups: &[Vec<Match<L>>],
    options: &CurveOptions,
    sort: bool,
) -> f64 {
    global_average_precision(&pooled(groups, sort), options)
}

/// Unweighted mean of the per-group Average Precision.
pub fn mean_average_precision<L: Clone>(
    groups: &[Vec<Match<L>>],
    options: &CurveOptions,
    sort: bool,
) -> f64 {
    mean(
        groups
            .iter()
            .map(|group| global_average_precision(&ordered(group, sort), options)),
    )
}

/// NDCG of all groups pooled into a single ranked list.
pub fn grouped_global_ndcg<L: Clone>(groups: &[Vec<Match<L>>], collapse: bool, sort: bool) -> f64 {
    global_ndcg(&pooled(groups, sort), collapse)
}

/// Unweighted mean of the per-group NDCG.
pub fn mean_ndcg<L: Clone>(groups: &[Vec<Match<L>>], collapse: bool, sort: bool) -> f64 {
    mean(
        groups
            .iter()
            .map(|group| global_ndcg(&ordered(group, sort), collapse)),
    )
}

/// Partitions matches by query group.
///
/// A query missing from `query_to_group` forms its own group. Groups appear
/// in the order their first match appears, and matches keep their order
/// inside each group.
pub fn group_matches_by_query_group<L: Clone>(
    matches: &[Match<L>],
    query_to_group: &HashMap<String, String>,
) -> Vec<Vec<Match<L>>> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<Match<L>>> = Vec::new();

    for m in matches {
        let query = m.query();
        let group = query_to_group.get(query).map_or(query, String::as_str);
        let next = groups.len();
        let pos = *positions.entry(group).or_insert(next);
        if pos == groups.len() {
            groups.push(Vec::new());
        }
        groups[pos].push(m.clone());
    }

    groups
}
