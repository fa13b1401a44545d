use std::collections::HashMap;

use crate::{
    models::{
        FavoriteTag, Genre, GenreGroup, GenreStat, LadderOrder, RatingBucket, RatingSummary,
        ReadingSession, ReadingTime,
    },
    services::taxonomy::Taxonomy,
};

/// Rating ladder is 0.5..=5.0 in half steps, i.e. ten buckets
const LADDER_LEN: usize = 10;

/// Maps a rating onto its ladder bucket (1..=10 half steps)
///
/// Rounds to the nearest 0.5 and clamps onto the ladder so every finite
/// rating lands in exactly one bucket. Non-finite ratings are treated as missing.
fn half_steps(rating: f64) -> Option<usize> {
    if !rating.is_finite() {
        return None;
    }
    Some((rating * 2.0).round().clamp(1.0, LADDER_LEN as f64) as usize)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn bucket_counts(ratings: impl IntoIterator<Item = Option<f64>>) -> [u32; LADDER_LEN] {
    let mut counts = [0u32; LADDER_LEN];
    for steps in ratings.into_iter().flatten().filter_map(half_steps) {
        counts[steps - 1] += 1;
    }
    counts
}

/// Counts ratings per 0.5 step, listing all ten buckets
///
/// Missing ratings are skipped, so the counts add up to the number of
/// present ratings.
pub fn rating_distribution(
    ratings: impl IntoIterator<Item = Option<f64>>,
    order: LadderOrder,
) -> Vec<RatingBucket> {
    let counts = bucket_counts(ratings);
    let buckets = counts.iter().enumerate().map(|(i, count)| RatingBucket {
        rating: (i + 1) as f64 / 2.0,
        count: *count,
    });

    match order {
        LadderOrder::Ascending => buckets.collect(),
        LadderOrder::Descending => buckets.rev().collect(),
    }
}

/// Running rating sum and count for one genre
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: u32,
}

impl Accumulator {
    fn add(&mut self, rating: f64) {
        self.sum += rating;
        self.count += 1;
    }

    fn merge(&mut self, other: &Accumulator) {
        self.sum += other.sum;
        self.count += other.count;
    }

    fn to_stat(self, name: &str) -> GenreStat {
        if self.count == 0 {
            return GenreStat::empty(name);
        }
        let average_5 = round2(self.sum / self.count as f64);
        GenreStat {
            name: name.to_string(),
            review_count: self.count,
            average_5,
            average_100: (average_5 * 20.0).round() as u32,
        }
    }
}

fn accumulate(records: &[(Option<Genre>, f64)], tier: &[Genre]) -> HashMap<Genre, Accumulator> {
    let mut acc: HashMap<Genre, Accumulator> = HashMap::new();
    for (genre, rating) in records {
        let Some(genre) = genre else { continue };
        if !rating.is_finite() || !tier.contains(genre) {
            continue;
        }
        acc.entry(*genre).or_default().add(*rating);
    }
    acc
}

/// Sorts by average then review count, both descending; ties keep input order
fn sort_stats(stats: &mut [GenreStat]) {
    stats.sort_by(|a, b| {
        b.average_5
            .total_cmp(&a.average_5)
            .then_with(|| b.review_count.cmp(&a.review_count))
    });
}

/// Builds one statistics entry per genre of `tier`, best first
///
/// Genres nobody rated still appear with zero counts, so the response shape
/// never depends on the data. Records whose genre is missing or outside the
/// tier are ignored.
pub fn aggregate(records: &[(Option<Genre>, f64)], tier: &[Genre]) -> Vec<GenreStat> {
    let acc = accumulate(records, tier);
    let mut stats: Vec<GenreStat> = tier
        .iter()
        .map(|genre| acc.get(genre).copied().unwrap_or_default().to_stat(genre.label()))
        .collect();
    sort_stats(&mut stats);
    stats
}

/// Like [`aggregate`], with one extra entry per display group
///
/// A group's entry pools the sums and counts of its members. Group entries
/// are sorted into the same list as the individual genres.
pub fn aggregate_with_groups(
    records: &[(Option<Genre>, f64)],
    tier: &[Genre],
    groups: &[GenreGroup],
) -> Vec<GenreStat> {
    let acc = accumulate(records, tier);

    let individual = tier
        .iter()
        .map(|genre| acc.get(genre).copied().unwrap_or_default().to_stat(genre.label()));

    let grouped = groups.iter().map(|group| {
        let mut pooled = Accumulator::default();
        for member in &group.members {
            if let Some(member_acc) = acc.get(member) {
                pooled.merge(member_acc);
            }
        }
        pooled.to_stat(&group.name)
    });

    let mut stats: Vec<GenreStat> = individual.chain(grouped).collect();
    sort_stats(&mut stats);
    stats
}

/// Overall rating summary of a user
///
/// The average uses the raw ratings; the most frequent rating uses the
/// ladder buckets, with ties going to the lower rating.
pub fn rating_summary(ratings: &[Option<f64>], total_comments: u32) -> RatingSummary {
    let present: Vec<f64> = ratings
        .iter()
        .flatten()
        .copied()
        .filter(|r| r.is_finite())
        .collect();

    if present.is_empty() {
        return RatingSummary {
            average_5: 0.0,
            average_100: 0,
            total_reviews: 0,
            most_frequent_rating: None,
            total_comments,
        };
    }

    let average_5 = round2(present.iter().sum::<f64>() / present.len() as f64);
    let counts = bucket_counts(present.iter().map(|r| Some(*r)));

    let mut most_frequent: Option<(usize, u32)> = None;
    for (i, count) in counts.iter().enumerate() {
        if *count > 0 && most_frequent.map_or(true, |(_, best)| *count > best) {
            most_frequent = Some((i, *count));
        }
    }

    RatingSummary {
        average_5,
        average_100: (average_5 * 20.0).round() as u32,
        total_reviews: present.len() as u32,
        most_frequent_rating: most_frequent.map(|(i, _)| (i + 1) as f64 / 2.0),
        total_comments,
    }
}

/// Total reading time over all sessions
///
/// A session's recorded `total_seconds` wins; otherwise the span between
/// its timestamps counts when positive.
pub fn reading_time(sessions: &[ReadingSession]) -> ReadingTime {
    let total_seconds: i64 = sessions
        .iter()
        .map(|session| match (session.total_seconds, session.start_time, session.end_time) {
            (Some(total), _, _) => total,
            (None, Some(start), Some(end)) => (end - start).num_seconds().max(0),
            _ => 0,
        })
        .sum();

    ReadingTime {
        total_seconds,
        human: humanize_seconds(total_seconds),
    }
}

fn humanize_seconds(total: i64) -> String {
    if total <= 0 {
        return "0시간".to_string();
    }
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    match (hours, minutes) {
        (0, m) => format!("총 {}분 감상하였습니다.", m),
        (h, 0) => format!("총 {}시간 감상하였습니다.", h),
        (h, m) => format!("총 {}시간 {}분 감상하였습니다.", h, m),
    }
}

/// Counts the category leaves of rated books, most frequent first
pub fn favorite_tags<'a>(
    taxonomy: &Taxonomy,
    categories: impl IntoIterator<Item = &'a str>,
) -> Vec<FavoriteTag> {
    let mut tags: Vec<FavoriteTag> = Vec::new();
    for tag in categories.into_iter().filter_map(|c| taxonomy.leaf_tag(c)) {
        match tags.iter_mut().find(|t| t.tag == tag) {
            Some(existing) => existing.count += 1,
            None => tags.push(FavoriteTag { tag, count: 1 }),
        }
    }
    tags.sort_by(|a, b| b.count.cmp(&a.count));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn assert_sorted(stats: &[GenreStat]) {
        for pair in stats.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.average_5 > b.average_5
                    || (a.average_5 == b.average_5 && a.review_count >= b.review_count),
                "{:?} sorted before {:?}",
                a,
                b
            );
        }
    }

    #[test]
    fn test_distribution_has_ten_buckets_ascending() {
        let buckets = rating_distribution(Vec::<Option<f64>>::new(), LadderOrder::Ascending);
        assert_eq!(buckets.len(), 10);
        assert_eq!(buckets[0].rating, 0.5);
        assert_eq!(buckets[9].rating, 5.0);
        assert!(buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_distribution_descending_is_reverse_of_ascending() {
        let ratings = vec![Some(4.5), Some(1.0), Some(4.5), None];
        let asc = rating_distribution(ratings.clone(), LadderOrder::Ascending);
        let desc = rating_distribution(ratings, LadderOrder::Descending);

        assert_eq!(desc[0].rating, 5.0);
        assert_eq!(desc[9].rating, 0.5);
        let reversed: Vec<RatingBucket> = asc.into_iter().rev().collect();
        assert_eq!(desc, reversed);
    }

    #[test]
    fn test_distribution_rounds_to_half_steps() {
        let ratings = vec![Some(3.3), Some(3.2), Some(3.74), Some(3.76)];
        let buckets = rating_distribution(ratings, LadderOrder::Ascending);
        let count_at = |r: f64| buckets.iter().find(|b| b.rating == r).unwrap().count;

        assert_eq!(count_at(3.0), 1); // 3.2
        assert_eq!(count_at(3.5), 2); // 3.3, 3.74
        assert_eq!(count_at(4.0), 1); // 3.76
    }

    #[test]
    fn test_distribution_counts_sum_to_present_ratings() {
        let ratings = vec![
            Some(0.5),
            Some(5.0),
            None,
            Some(2.5),
            Some(0.1),
            Some(7.0),
            None,
            Some(f64::NAN),
        ];
        let buckets = rating_distribution(ratings, LadderOrder::Ascending);
        let total: u32 = buckets.iter().map(|b| b.count).sum();
        // Out-of-range values clamp onto the ladder; NaN counts as missing
        assert_eq!(total, 5);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[9].count, 2);
    }

    #[test]
    fn test_aggregate_zero_fills_empty_input() {
        let stats = aggregate(&[], &Genre::TOP_LEVEL);
        assert_eq!(stats.len(), Genre::TOP_LEVEL.len());
        assert!(stats.iter().all(|s| s.review_count == 0 && s.average_100 == 0));
        // Stable sort keeps enumeration order when everything ties
        let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["소설", "시", "에세이", "만화", "웹툰"]);
    }

    #[test]
    fn test_aggregate_sorts_by_average_then_count() {
        let records = vec![
            (Some(Genre::Novel), 4.0),
            (Some(Genre::Novel), 5.0),
            (Some(Genre::Poetry), 4.5),
            (Some(Genre::Essay), 5.0),
            (Some(Genre::Essay), 4.5),
            (Some(Genre::Comics), 3.0),
            (None, 5.0),
            (Some(Genre::Mystery), 5.0),
        ];
        let stats = aggregate(&records, &Genre::TOP_LEVEL);

        let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["에세이", "소설", "시", "만화", "웹툰"]);
        assert_eq!(stats[0].review_count, 2);
        assert_eq!(stats[0].average_5, 4.75);
        assert_eq!(stats[0].average_100, 95);
        // 소설 and 시 share a 4.5 average; the larger review count wins
        assert_eq!(stats[1].review_count, 2);
        assert_eq!(stats[2].review_count, 1);
        assert_sorted(&stats);
    }

    #[test]
    fn test_aggregate_rounds_average() {
        let records = vec![
            (Some(Genre::Fantasy), 4.0),
            (Some(Genre::Fantasy), 4.5),
            (Some(Genre::Fantasy), 4.5),
        ];
        let stats = aggregate(&records, &Genre::SUB_LEVEL);
        let fantasy = stats.iter().find(|s| s.name == "판타지").unwrap();

        assert_eq!(fantasy.average_5, 4.33);
        assert_eq!(fantasy.average_100, 87);
        assert_eq!(fantasy.average_100, (fantasy.average_5 * 20.0).round() as u32);
    }

    #[test]
    fn test_aggregate_with_groups_pools_members() {
        let records = vec![
            (Some(Genre::Economics), 3.0),
            (Some(Genre::Management), 5.0),
            (Some(Genre::Management), 4.0),
            (Some(Genre::Travel), 4.0),
        ];
        let groups = vec![GenreGroup::new(
            "경제/경영",
            vec![Genre::Economics, Genre::Management],
        )];
        let stats = aggregate_with_groups(&records, &Genre::SUB_LEVEL, &groups);

        assert_eq!(stats.len(), Genre::SUB_LEVEL.len() + 1);
        let group = stats.iter().find(|s| s.name == "경제/경영").unwrap();
        assert_eq!(group.review_count, 3);
        assert_eq!(group.average_5, 4.0);
        assert_eq!(group.average_100, 80);

        // Same average as 여행 but more reviews, so the group ranks above it
        let names: Vec<&str> = stats.iter().take(4).map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["경영", "경제/경영", "여행", "경제"]);
        assert_sorted(&stats);
    }

    #[test]
    fn test_aggregate_with_groups_zero_fills_groups() {
        let groups = vec![GenreGroup::new(
            "경제/경영",
            vec![Genre::Economics, Genre::Management],
        )];
        let stats = aggregate_with_groups(&[], &Genre::SUB_LEVEL, &groups);
        let last = stats.last().unwrap();
        assert_eq!(last.name, "경제/경영");
        assert_eq!(last.review_count, 0);
    }

    #[test]
    fn test_rating_summary() {
        let summary = rating_summary(&[Some(4.0), Some(4.0), Some(3.5), Some(3.5), None], 7);
        assert_eq!(summary.average_5, 3.75);
        assert_eq!(summary.average_100, 75);
        assert_eq!(summary.total_reviews, 4);
        // Tie between 3.5 and 4.0 goes to the lower rating
        assert_eq!(summary.most_frequent_rating, Some(3.5));
        assert_eq!(summary.total_comments, 7);
    }

    #[test]
    fn test_rating_summary_without_ratings() {
        let summary = rating_summary(&[None, None], 0);
        assert_eq!(summary.average_5, 0.0);
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.most_frequent_rating, None);
    }

    #[test]
    fn test_reading_time_prefers_recorded_total() {
        let start = Utc.with_ymd_and_hms(2025, 11, 1, 20, 0, 0).unwrap();
        let sessions = vec![
            ReadingSession {
                start_time: Some(start),
                end_time: Some(start + Duration::hours(5)),
                total_seconds: Some(1800),
            },
            ReadingSession {
                start_time: Some(start),
                end_time: Some(start + Duration::minutes(90)),
                total_seconds: None,
            },
            ReadingSession {
                start_time: Some(start),
                end_time: Some(start - Duration::minutes(10)),
                total_seconds: None,
            },
            ReadingSession {
                start_time: None,
                end_time: None,
                total_seconds: None,
            },
        ];
        let time = reading_time(&sessions);
        assert_eq!(time.total_seconds, 1800 + 5400);
        assert_eq!(time.human, "총 2시간 감상하였습니다.");
    }

    #[test]
    fn test_humanize_seconds() {
        assert_eq!(humanize_seconds(0), "0시간");
        assert_eq!(humanize_seconds(59), "총 0분 감상하였습니다.");
        assert_eq!(humanize_seconds(125 * 60), "총 2시간 5분 감상하였습니다.");
        assert_eq!(humanize_seconds(3600), "총 1시간 감상하였습니다.");
    }

    #[test]
    fn test_favorite_tags_counts_leaves() {
        let taxonomy = Taxonomy::builtin();
        let tags = favorite_tags(
            &taxonomy,
            [
                "국내도서>소설>영미소설",
                "국내도서>에세이",
                "외국도서>영미소설 (2 권)",
                "  ",
            ],
        );
        assert_eq!(
            tags,
            vec![
                FavoriteTag {
                    tag: "영미소설".to_string(),
                    count: 2
                },
                FavoriteTag {
                    tag: "에세이".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_favorite_tag_keeps_slashes_in_the_leaf() {
        let tags = favorite_tags(&Taxonomy::builtin(), ["국내도서>소설>추리/미스터리"]);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].tag, "추리/미스터리");
    }
}
