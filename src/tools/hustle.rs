use rmcp::model::{CallToolResult, ErrorData};
use rmcp::schemars;
use serde::Deserialize;
use serde_json::Value;

use super::players::PlayerSeasonParams;
use super::text_result;
use crate::access::{ResultSet, at, display, text, text_or};
use crate::client::NbaClient;
use crate::convert::{format_stat, numeric};
use crate::error::domain_error;
use crate::models::{self, HUSTLE_STATS, HustleStat};
use crate::season;

const TOP_N: usize = 10;

#[derive(Deserialize, schemars::JsonSchema)]
pub struct HustleLeadersParams {
    #[serde(default)]
    #[schemars(
        description = "Hustle stat to rank by: deflections, charges, screen_assists, loose_balls, box_outs. Defaults to deflections."
    )]
    pub stat_category: Option<String>,

    #[serde(default)]
    #[schemars(
        description = "Season in format YYYY-YY (e.g., '2024-25'). Defaults to current season."
    )]
    pub season: Option<String>,
}

fn hustle_query(season: &str) -> [(&'static str, &str); 3] {
    [
        ("Season", season),
        ("SeasonType", "Regular Season"),
        ("PerMode", "Totals"),
    ]
}

pub async fn player_hustle(
    client: &NbaClient,
    params: PlayerSeasonParams,
) -> Result<CallToolResult, ErrorData> {
    let (player_id, season) = match params.validate() {
        Ok(v) => v,
        Err(msg) => return Ok(domain_error(msg)),
    };
    let Ok(data) = client
        .stats("leaguehustlestatsplayer", &hustle_query(&season))
        .await
    else {
        return Ok(domain_error("Error fetching hustle stats. Please try again."));
    };
    Ok(text_result(render_player_hustle(&data, player_id, &season)))
}

pub async fn league_leaders(
    client: &NbaClient,
    params: HustleLeadersParams,
) -> Result<CallToolResult, ErrorData> {
    let key = params
        .stat_category
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or("deflections")
        .to_lowercase();
    let Some(stat) = models::hustle_stat(&key) else {
        let keys: Vec<&str> = HUSTLE_STATS.iter().map(|s| s.key).collect();
        return Ok(domain_error(format!(
            "Invalid stat category. Choose from: {}",
            keys.join(", ")
        )));
    };
    let season = match season::resolve(params.season.as_deref()) {
        Ok(s) => s,
        Err(msg) => return Ok(domain_error(msg)),
    };

    let Ok(data) = client
        .stats("leaguehustlestatsplayer", &hustle_query(&season))
        .await
    else {
        return Ok(domain_error("Error fetching hustle stats. Please try again."));
    };
    Ok(text_result(render_hustle_leaders(&data, stat, &season)))
}

pub async fn defense(
    client: &NbaClient,
    params: PlayerSeasonParams,
) -> Result<CallToolResult, ErrorData> {
    let (player_id, season) = match params.validate() {
        Ok(v) => v,
        Err(msg) => return Ok(domain_error(msg)),
    };
    let request = [
        ("Season", season.as_str()),
        ("SeasonType", "Regular Season"),
        ("PerMode", "Totals"),
        ("DefenseCategory", "Overall"),
    ];
    let Ok(data) = client.stats("leaguedashptdefend", &request).await else {
        return Ok(domain_error("Error fetching defense stats. Please try again."));
    };
    Ok(text_result(render_defense(&data, player_id, &season)))
}

/// Row whose first column is the player id, compared as text.
fn find_player<'v>(data: &'v Value, player_id: &str) -> Option<&'v Value> {
    ResultSet::at(data, 0)
        .rows()
        .iter()
        .find(|row| at!(row, 0).is_some_and(|id| display(id) == player_id))
}

pub fn render_player_hustle(data: &Value, player_id: &str, season: &str) -> String {
    let Some(row) = find_player(data, player_id) else {
        return format!("No hustle stats found for player ID {player_id} in season {season}.");
    };
    let count = |i: usize| text_or(at!(row, i), "0");
    format!(
        "Hustle Statistics - {} ({}) [{season}]:\n\n\
         Games Played: {}\n\n\
         Contest & Defense:\n\
         \x20 Total Contested Shots: {}\n\
         \x20 Contested 2PT Shots: {}\n\
         \x20 Contested 3PT Shots: {}\n\
         \x20 Deflections: {}\n\
         \x20 Charges Drawn: {}\n\n\
         Screen Assists:\n\
         \x20 Screen Assists: {}\n\
         \x20 Points from Screen Assists: {}\n\n\
         Loose Balls:\n\
         \x20 Offensive Loose Balls: {}\n\
         \x20 Defensive Loose Balls: {}\n\
         \x20 Total Loose Balls Recovered: {}\n\n\
         Box Outs:\n\
         \x20 Offensive Box Outs: {}\n\
         \x20 Defensive Box Outs: {}\n\
         \x20 Total Box Outs: {}\n",
        text_or(at!(row, 1), "Player"),
        text(at!(row, 3)),
        count(5),
        count(7),
        count(8),
        count(9),
        count(10),
        count(11),
        count(12),
        count(13),
        count(14),
        count(15),
        count(16),
        count(19),
        count(20),
        count(23),
    )
}

pub fn render_hustle_leaders(data: &Value, stat: &HustleStat, season: &str) -> String {
    let value = |row: &Value| at!(row, stat.column).and_then(numeric).unwrap_or(0.0);
    let mut rows: Vec<&Value> = ResultSet::at(data, 0).rows().iter().collect();
    // stable, so ties keep API order
    rows.sort_by(|a, b| value(b).total_cmp(&value(a)));

    let mut out = format!("League Leaders - {} ({season}):\n\n", stat.label);
    for (rank, row) in rows.iter().take(TOP_N).enumerate() {
        out.push_str(&format!(
            "{}. {} ({}): {}\n",
            rank + 1,
            text_or(at!(row, 1), "Unknown"),
            text(at!(row, 3)),
            text_or(at!(row, stat.column), "0"),
        ));
    }
    out
}

pub fn render_defense(data: &Value, player_id: &str, season: &str) -> String {
    let Some(row) = find_player(data, player_id) else {
        return format!("No defense stats found for player ID {player_id} in season {season}.");
    };
    let diff = at!(row, 13);
    let mut out = format!(
        "Defensive Impact - {} ({}) [{season}]:\n\n\
         Position: {}\n\
         Games: {}\n\n\
         When Defended By This Player:\n\
         \x20 Opponent FGM: {}\n\
         \x20 Opponent FGA: {}\n\
         \x20 Opponent FG%: {}\n\n\
         Comparison:\n\
         \x20 Opponent Normal FG%: {}\n\
         \x20 Difference: {}\n",
        text_or(at!(row, 1), "Player"),
        text(at!(row, 3)),
        text(at!(row, 4)),
        text_or(at!(row, 6), "0"),
        text_or(at!(row, 9), "0"),
        text_or(at!(row, 10), "0"),
        format_stat(at!(row, 11), true),
        format_stat(at!(row, 12), true),
        format_stat(diff, true),
    );

    let delta = diff.and_then(numeric).unwrap_or(0.0) * 100.0;
    if delta < 0.0 {
        out.push_str(&format!(
            "\n✓ This player holds opponents to {:.1}% below their normal shooting.",
            delta.abs()
        ));
    } else {
        out.push_str(&format!(
            "\n⚠ Opponents shoot {delta:.1}% better against this player."
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hustle_row(id: i64, name: &str, team: &str, deflections: i64) -> Value {
        let mut row = vec![json!(0); 24];
        row[0] = json!(id);
        row[1] = json!(name);
        row[3] = json!(team);
        row[5] = json!(70);
        row[10] = json!(deflections);
        row[16] = json!(40);
        Value::Array(row)
    }

    fn hustle_data() -> Value {
        json!({"resultSets": [{"rowSet": [
            hustle_row(1, "Alpha", "AAA", 150),
            hustle_row(2, "Bravo", "BBB", 210),
            hustle_row(3, "Charlie", "CCC", 150),
            hustle_row(4, "Delta", "DDD", 90)
        ]}]})
    }

    #[test]
    fn player_hustle_finds_row_by_id() {
        let out = render_player_hustle(&hustle_data(), "2", "2024-25");
        assert!(out.starts_with("Hustle Statistics - Bravo (BBB) [2024-25]:\n\nGames Played: 70\n"));
        assert!(out.contains("  Deflections: 210\n"));
        assert!(out.contains("  Total Loose Balls Recovered: 40\n"));
    }

    #[test]
    fn player_hustle_unknown_player() {
        assert_eq!(
            render_player_hustle(&hustle_data(), "99", "2024-25"),
            "No hustle stats found for player ID 99 in season 2024-25."
        );
    }

    #[test]
    fn leaders_sorted_descending_with_stable_ties() {
        let stat = models::hustle_stat("deflections").unwrap();
        let out = render_hustle_leaders(&hustle_data(), stat, "2024-25");
        assert_eq!(
            out,
            "League Leaders - Deflections (2024-25):\n\n\
             1. Bravo (BBB): 210\n\
             2. Alpha (AAA): 150\n\
             3. Charlie (CCC): 150\n\
             4. Delta (DDD): 90\n"
        );
    }

    #[test]
    fn leaders_capped_at_ten() {
        let rows: Vec<Value> = (0..15).map(|i| hustle_row(i, "P", "T", i)).collect();
        let data = json!({"resultSets": [{"rowSet": rows}]});
        let stat = models::hustle_stat("deflections").unwrap();
        let out = render_hustle_leaders(&data, stat, "2024-25");
        assert_eq!(out.lines().filter(|l| l.contains(". P (T)")).count(), 10);
        assert!(out.contains("1. P (T): 14\n"));
    }

    fn defense_data(diff: f64) -> Value {
        let mut row = vec![json!(0); 14];
        row[0] = json!(203999);
        row[1] = json!("Nikola Jokic");
        row[3] = json!("DEN");
        row[4] = json!("C");
        row[6] = json!(79);
        row[11] = json!(0.45);
        row[12] = json!(0.48);
        row[13] = json!(diff);
        json!({"resultSets": [{"rowSet": [row]}]})
    }

    #[test]
    fn defense_reports_lower_opponent_shooting() {
        let out = render_defense(&defense_data(-0.03), "203999", "2024-25");
        assert!(out.starts_with("Defensive Impact - Nikola Jokic (DEN) [2024-25]:\n\nPosition: C\nGames: 79\n"));
        assert!(out.contains("  Opponent FG%: 45.0%\n"));
        assert!(out.contains("  Opponent Normal FG%: 48.0%\n"));
        assert!(out.ends_with("✓ This player holds opponents to 3.0% below their normal shooting."));
    }

    #[test]
    fn defense_reports_higher_opponent_shooting() {
        let out = render_defense(&defense_data(0.021), "203999", "2024-25");
        assert!(out.ends_with("⚠ Opponents shoot 2.1% better against this player."));
        assert_eq!(
            render_defense(&defense_data(0.0), "1", "2024-25"),
            "No defense stats found for player ID 1 in season 2024-25."
        );
    }
}
