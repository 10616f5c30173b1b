use rmcp::model::{CallToolResult, ErrorData};
use serde_json::{Value, json};

use super::scoreboard::GameParams;
use super::text_result;
use crate::access::{ResultSet, access, at, items, text, text_or};
use crate::client::NbaClient;
use crate::convert::{format_stat, numeric};
use crate::error::domain_error;

pub async fn run(client: &NbaClient, params: GameParams) -> Result<CallToolResult, ErrorData> {
    let game_id = params.game_id.trim();
    if game_id.is_empty() {
        return Ok(domain_error("game_id must be non-empty"));
    }

    let live_path = format!("boxscore/boxscore_{}.json", urlencoding::encode(game_id));
    if let Ok(live) = client.live(&live_path).await
        && let Some(game) = at!(&live, "game")
    {
        return Ok(text_result(render_live(game, game_id)));
    }

    tracing::info!(game_id, "live box score unavailable, using stats API");
    let query = [
        ("GameID", game_id),
        ("StartPeriod", "0"),
        ("EndPeriod", "10"),
        ("RangeType", "0"),
        ("StartRange", "0"),
        ("EndRange", "0"),
    ];
    let Ok(data) = client.stats("boxscoretraditionalv2", &query).await else {
        return Ok(domain_error(
            "Error fetching box score. The game stats are not available yet.",
        ));
    };
    Ok(text_result(render_traditional(&data, game_id)))
}

fn live_team_stats(team: &Value, stats: &Value) -> String {
    let mut out = format!(
        "\n{}:\n  FG: {}/{}",
        text(at!(team, "teamName")),
        text(at!(stats, "fieldGoalsMade")),
        text(at!(stats, "fieldGoalsAttempted")),
    );
    if let Some(pct) = at!(stats, "fieldGoalsPercentage") {
        out.push_str(&format!(" ({})", format_stat(Some(pct), true)));
    }
    out.push_str(&format!(
        "\n  3P: {}/{}\n  FT: {}/{}\n  Rebounds: {} (OFF: {}, DEF: {})\n  Assists: {}\n  Steals: {}\n  Blocks: {}\n  Turnovers: {}\n",
        text(at!(stats, "threePointersMade")),
        text(at!(stats, "threePointersAttempted")),
        text(at!(stats, "freeThrowsMade")),
        text(at!(stats, "freeThrowsAttempted")),
        text(at!(stats, "reboundsTotal")),
        text(at!(stats, "reboundsOffensive")),
        text(at!(stats, "reboundsDefensive")),
        text(at!(stats, "assists")),
        text(at!(stats, "steals")),
        text(at!(stats, "blocks")),
        text(at!(stats, "turnovers")),
    ));
    out
}

fn live_player_table(team: &Value) -> String {
    let players = items(at!(team, "players"));
    if players.is_empty() {
        return String::new();
    }

    let mut out = format!("\n{}:\n", text(at!(team, "teamName")));
    out.push_str(&format!(
        "{:<25} {:<6} {:<5} {:<5} {:<5} {:<10} {:<10}\n",
        "Player", "MIN", "PTS", "REB", "AST", "FG", "3P"
    ));
    out.push_str(&"-".repeat(75));
    out.push('\n');

    for player in players {
        let Some(stats) = at!(player, "statistics") else {
            continue;
        };
        let minutes = text_or(at!(stats, "minutes"), "0:00");
        if minutes == "0:00" {
            continue;
        }
        let stat = |key: &str| text_or(at!(stats, key), "0");
        let fg = format!("{}/{}", stat("fieldGoalsMade"), stat("fieldGoalsAttempted"));
        let fg3 = format!("{}/{}", stat("threePointersMade"), stat("threePointersAttempted"));
        out.push_str(&format!(
            "{:<25} {:<6} {:<5} {:<5} {:<5} {:<10} {:<10}\n",
            text_or(at!(player, "name"), "Unknown"),
            minutes,
            stat("points"),
            stat("reboundsTotal"),
            stat("assists"),
            fg,
            fg3,
        ));
    }
    out
}

/// Box score from the live CDN feed (`game` object).
pub fn render_live(game: &Value, game_id: &str) -> String {
    let empty = json!({});
    let home = access(game, &["homeTeam".into()], &empty);
    let away = access(game, &["awayTeam".into()], &empty);

    let mut out = format!("Box Score for Game {game_id}:\n");
    out.push_str(&format!(
        "{} @ {}\n",
        text(at!(away, "teamName")),
        text(at!(home, "teamName"))
    ));
    out.push_str(&format!(
        "Final Score: {} - {}\n\n",
        text(at!(away, "score")),
        text(at!(home, "score"))
    ));

    out.push_str("TEAM STATS:\n");
    for team in [away, home] {
        if let Some(stats) = at!(team, "statistics") {
            out.push_str(&live_team_stats(team, stats));
        }
    }

    out.push('\n');
    out.push_str(&"=".repeat(70));
    out.push_str("\nPLAYER STATS:\n\n");
    for team in [away, home] {
        out.push_str(&live_player_table(team));
    }
    out
}

// boxscoretraditionalv2 column offsets
const TEAM_ABBR: usize = 1;
const PLAYER_NAME: usize = 5;
const PLAYER_MIN: usize = 8;

fn played(minutes: Option<&Value>) -> bool {
    match minutes {
        None => false,
        Some(Value::String(s)) => s.as_str() != "0",
        Some(v) => numeric(v) != Some(0.0),
    }
}

/// Box score from the stats API: result set 0 holds players, 1 holds teams.
pub fn render_traditional(data: &Value, game_id: &str) -> String {
    let players = ResultSet::at(data, 0);
    let teams = ResultSet::at(data, 1);
    if players.rows().is_empty() {
        return format!(
            "Box score not available for game {game_id}. Try again in a few minutes as stats are still being processed."
        );
    }

    let zero = json!(0);
    let mut out = format!("Box Score for Game {game_id}:\n\n");
    if !teams.rows().is_empty() {
        out.push_str("TEAM STATS:\n");
        for team in teams.rows() {
            let col = |i: usize| text_or(at!(team, i), "0");
            out.push_str(&format!(
                "\n{}: {} PTS\n  FG: {}/{} ({})\n  3P: {}/{}\n  FT: {}/{}\n  REB: {} | AST: {} | STL: {} | BLK: {} | TOV: {}\n",
                text(at!(team, TEAM_ABBR)),
                col(24),
                col(6),
                col(7),
                format_stat(Some(at!(team, 8).unwrap_or(&zero)), true),
                col(9),
                col(10),
                col(13),
                col(14),
                col(18),
                col(19),
                col(21),
                col(22),
                col(23),
            ));
        }
    }

    out.push('\n');
    out.push_str(&"=".repeat(60));
    out.push_str("\nPLAYER STATS:\n\n");

    let mut by_team: Vec<(String, Vec<&Value>)> = Vec::new();
    for row in players.rows() {
        let abbr = text(at!(row, TEAM_ABBR));
        match by_team.iter_mut().find(|(team, _)| *team == abbr) {
            Some((_, rows)) => rows.push(row),
            None => by_team.push((abbr, vec![row])),
        }
    }

    for (abbr, rows) in &by_team {
        out.push_str(&format!("\n{abbr}:\n"));
        out.push_str(&format!(
            "{:<20} {:<6} {:<5} {:<5} {:<5} {:<8} {:<8}\n",
            "Player", "MIN", "PTS", "REB", "AST", "FG", "3P"
        ));
        out.push_str(&"-".repeat(70));
        out.push('\n');

        for row in rows {
            let minutes = at!(row, PLAYER_MIN);
            if !played(minutes) {
                continue;
            }
            let col = |i: usize| text_or(at!(row, i), "0");
            out.push_str(&format!(
                "{:<20} {:<6} {:<5} {:<5} {:<5} {:<8} {:<8}\n",
                text(at!(row, PLAYER_NAME)),
                text(minutes),
                col(26),
                col(20),
                col(21),
                format!("{}/{}", col(9), col(10)),
                format!("{}/{}", col(12), col(13)),
            ));
        }
    }
    out
}
