use crate::domain::model::{Article, BinStats, TrafficLight};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

/// Draw up to `per_bin` articles from each traffic-light bin.
///
/// Bins are visited green, yellow, red and the result keeps that order, each bin's
/// members in draw order. A short bin contributes what it has; nothing is borrowed
/// from neighbouring bins and unclassified articles never appear. With a seed every
/// bin gets its own generator derived from it, so a bin's draw depends only on the
/// seed and that bin's contents.
pub fn sample_by_light(articles: &[Article], per_bin: usize, seed: Option<u64>) -> Vec<Article> {
    let mut sampled = Vec::with_capacity(per_bin.saturating_mul(TrafficLight::ALL.len()));

    for (bin_index, light) in TrafficLight::ALL.into_iter().enumerate() {
        let bin: Vec<&Article> = articles
            .iter()
            .filter(|a| a.traffic_light_status == Some(light))
            .collect();

        let amount = per_bin.min(bin.len());
        if amount == 0 {
            continue;
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(bin_index as u64)),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let picks = index::sample(&mut rng, bin.len(), amount);
        tracing::debug!(bin = %light, available = bin.len(), drawn = amount, "Sampled bin");
        sampled.extend(picks.into_iter().map(|i| bin[i].clone()));
    }

    sampled
}

pub fn bin_stats(articles: &[Article]) -> BinStats {
    articles
        .iter()
        .fold(BinStats::default(), |mut stats, article| {
            match article.traffic_light_status {
                Some(TrafficLight::Green) => stats.green += 1,
                Some(TrafficLight::Yellow) => stats.yellow += 1,
                Some(TrafficLight::Red) => stats.red += 1,
                None => {}
            }
            stats
        })
}
