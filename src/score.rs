use crate::models::{Band, LeaderboardEntry, Period};

const LEADERBOARD_SIZE: usize = 10;

pub fn classify(total_kg: f64) -> Band {
    if total_kg < 100.0 {
        Band::Excellent
    } else if total_kg < 200.0 {
        Band::Good
    } else if total_kg < 300.0 {
        Band::Average
    } else {
        Band::High
    }
}

pub fn share_message(period: Period, total_kg: f64, band: Band) -> String {
    format!(
        "My Green Score for {period}: {} (Green Score: {}) - Total CO2: {total_kg:.2} kg",
        band.label(),
        band.grade()
    )
}

pub fn rank_leaderboard(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| a.total_emission.total_cmp(&b.total_emission));
    entries.truncate(LEADERBOARD_SIZE);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(classify(0.0), Band::Excellent);
        assert_eq!(classify(99.99), Band::Excellent);
        assert_eq!(classify(100.0), Band::Good);
        assert_eq!(classify(199.99), Band::Good);
        assert_eq!(classify(200.0), Band::Average);
        assert_eq!(classify(299.99), Band::Average);
        assert_eq!(classify(300.0), Band::High);
        assert_eq!(classify(f64::MAX), Band::High);
    }

    #[test]
    fn share_message_mentions_period_and_total() {
        let period = Period::parse_month("2024-03").unwrap();
        let message = share_message(period, 13.0, classify(13.0));
        assert_eq!(
            message,
            "My Green Score for 2024-03: Excellent (Green Score: A+) - Total CO2: 13.00 kg"
        );
    }

    #[test]
    fn leaderboard_is_ascending_and_capped() {
        let entries = (0..12)
            .rev()
            .map(|i| LeaderboardEntry {
                name: format!("User {i}"),
                username: format!("user{i}"),
                total_emission: f64::from(i) * 10.0,
            })
            .collect();
        let ranked = rank_leaderboard(entries);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].username, "user0");
        assert_eq!(ranked[9].username, "user9");
    }
}
