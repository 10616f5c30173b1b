use chrono::{Local, NaiveDate};
use rmcp::model::{CallToolResult, ErrorData};
use rmcp::schemars;
use serde::Deserialize;
use serde_json::{Value, json};

use super::text_result;
use crate::access::{access, at, display, items, text, text_or};
use crate::client::NbaClient;
use crate::error::domain_error;

const TODAYS_SCOREBOARD: &str = "scoreboard/todaysScoreboard_00.json";

#[derive(Deserialize, schemars::JsonSchema)]
pub struct ScoreboardByDateParams {
    #[schemars(description = "Date in format YYYYMMDD (e.g., '20241103')")]
    pub date: String,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub struct GameParams {
    #[schemars(
        description = "NBA game ID (e.g., '0022400123'). Use get_todays_scoreboard to find game IDs."
    )]
    pub game_id: String,
}

pub async fn today(client: &NbaClient) -> Result<CallToolResult, ErrorData> {
    let Ok(data) = client.live(TODAYS_SCOREBOARD).await else {
        return Ok(domain_error("Error fetching today's scoreboard. Please try again."));
    };
    let today = Local::now().format("%Y-%m-%d").to_string();
    Ok(text_result(render_today(&data, &today)))
}

pub async fn by_date(
    client: &NbaClient,
    params: ScoreboardByDateParams,
) -> Result<CallToolResult, ErrorData> {
    let Ok(date) = NaiveDate::parse_from_str(params.date.trim(), "%Y%m%d") else {
        return Ok(domain_error("Invalid date format. Use YYYYMMDD (e.g., '20241103')"));
    };
    let formatted = date.format("%Y-%m-%d").to_string();
    let path = format!("scoreboard/scoreboard_{}.json", date.format("%Y%m%d"));

    let Ok(data) = client.live(&path).await else {
        return Ok(domain_error(format!(
            "No data available for {formatted}. The game data might not be available yet or the date might be incorrect."
        )));
    };
    Ok(text_result(render_by_date(&data, &formatted)))
}

pub async fn game_details(
    client: &NbaClient,
    params: GameParams,
) -> Result<CallToolResult, ErrorData> {
    let game_id = params.game_id.trim();
    if game_id.is_empty() {
        return Ok(domain_error("game_id must be non-empty"));
    }
    let data = client.live(TODAYS_SCOREBOARD).await.ok();
    Ok(text_result(render_game_details(data.as_ref(), game_id)))
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(list) => list.is_empty(),
        _ => false,
    }
}

pub fn render_today(data: &Value, today: &str) -> String {
    let Some(scoreboard) = at!(data, "scoreboard").filter(|s| !is_empty_container(s)) else {
        return "No scoreboard data available.".into();
    };
    let games = items(at!(scoreboard, "games"));
    let game_date = text_or(at!(scoreboard, "gameDate"), today);
    if games.is_empty() {
        return format!("No games scheduled for {game_date}.");
    }

    let empty = json!({});
    let zero = json!(0);
    let mut out = format!("NBA Games for {game_date}:\n\n");
    for game in games {
        let home = access(game, &["homeTeam".into()], &empty);
        let away = access(game, &["awayTeam".into()], &empty);
        let home_name = text_or(at!(home, "teamName"), "Home Team");
        let away_name = text_or(at!(away, "teamName"), "Away Team");
        let home_score = display(access(home, &["score".into()], &zero));
        let away_score = display(access(away, &["score".into()], &zero));

        out.push_str(&format!("Game ID: {}\n", text(at!(game, "gameId"))));
        out.push_str(&format!("{away_name} ({away_score}) @ {home_name} ({home_score})\n"));
        out.push_str(&format!(
            "Status: {}\n",
            text_or(at!(game, "gameStatusText"), "Unknown")
        ));

        let period = at!(game, "period").and_then(Value::as_i64).unwrap_or(0);
        if period > 0 {
            out.push_str(&format!("Period: Q{period}\n"));
        }

        if let Some(leaders) = at!(game, "gameLeaders") {
            for (side, team_name) in [("homeLeaders", &home_name), ("awayLeaders", &away_name)] {
                if let Some(name) = at!(leaders, side, "name") {
                    out.push_str(&format!(
                        "  {team_name} Leader: {} ({} PTS)\n",
                        display(name),
                        text(at!(leaders, side, "points")),
                    ));
                }
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_by_date(data: &Value, date: &str) -> String {
    let games = items(at!(data, "scoreboard", "games"));
    if games.is_empty() {
        return format!("No games found for {date}.");
    }

    let mut out = format!("NBA Games for {date}:\n\n");
    for game in games {
        out.push_str(&format!(
            "Game ID: {}\n{} ({}) @ {} ({})\nStatus: {}\n\n",
            text(at!(game, "gameId")),
            text(at!(game, "awayTeam", "teamName")),
            text(at!(game, "awayTeam", "score")),
            text(at!(game, "homeTeam", "teamName")),
            text(at!(game, "homeTeam", "score")),
            text(at!(game, "gameStatusText")),
        ));
    }
    out
}

fn team_shooting(team: &Value, stats: &Value) -> String {
    format!(
        "{}:\n  FG: {}/{}\n  3P: {}/{}\n  FT: {}/{}\n  Rebounds: {}\n  Assists: {}\n",
        text(at!(team, "teamName")),
        text(at!(stats, "fieldGoalsMade")),
        text(at!(stats, "fieldGoalsAttempted")),
        text(at!(stats, "threePointersMade")),
        text(at!(stats, "threePointersAttempted")),
        text(at!(stats, "freeThrowsMade")),
        text(at!(stats, "freeThrowsAttempted")),
        text(at!(stats, "reboundsTotal")),
        text(at!(stats, "assists")),
    )
}

pub fn render_game_details(data: Option<&Value>, game_id: &str) -> String {
    let game = data.and_then(|d| {
        items(at!(d, "scoreboard", "games"))
            .iter()
            .find(|g| at!(g, "gameId").is_some_and(|id| display(id) == game_id))
    });
    let Some(game) = game else {
        return format!(
            "Game {game_id} not found in today's games. Try using get_scoreboard_by_date first to find the correct game ID."
        );
    };

    let empty = json!({});
    let home = access(game, &["homeTeam".into()], &empty);
    let away = access(game, &["awayTeam".into()], &empty);

    let mut out = format!("Game Details for {game_id}:\n\n");
    out.push_str(&format!(
        "{} @ {}\n",
        text(at!(away, "teamName")),
        text(at!(home, "teamName"))
    ));
    out.push_str(&format!(
        "Score: {} - {}\n",
        text(at!(away, "score")),
        text(at!(home, "score"))
    ));
    out.push_str(&format!("Status: {}\n", text(at!(game, "gameStatusText"))));
    out.push_str(&format!("Period: Q{}\n\n", text_or(at!(game, "period"), "0")));

    if let (Some(away_stats), Some(home_stats)) =
        (at!(away, "statistics"), at!(home, "statistics"))
    {
        out.push_str("Team Statistics:\n");
        out.push_str(&team_shooting(away, away_stats));
        out.push('\n');
        out.push_str(&team_shooting(home, home_stats));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scoreboard() -> Value {
        json!({
            "scoreboard": {
                "gameDate": "2025-11-03",
                "games": [{
                    "gameId": "0022500001",
                    "gameStatusText": "Final",
                    "period": 4,
                    "homeTeam": {
                        "teamName": "Lakers",
                        "teamCity": "Los Angeles",
                        "score": 110,
                        "statistics": {
                            "fieldGoalsMade": 40, "fieldGoalsAttempted": 85,
                            "threePointersMade": 12, "threePointersAttempted": 30,
                            "freeThrowsMade": 18, "freeThrowsAttempted": 22,
                            "reboundsTotal": 45, "assists": 27
                        }
                    },
                    "awayTeam": {
                        "teamName": "Warriors",
                        "teamCity": "Golden State",
                        "score": 105,
                        "statistics": {
                            "fieldGoalsMade": 38, "fieldGoalsAttempted": 90,
                            "threePointersMade": 15, "threePointersAttempted": 40,
                            "freeThrowsMade": 14, "freeThrowsAttempted": 16,
                            "reboundsTotal": 40, "assists": 30
                        }
                    },
                    "gameLeaders": {
                        "homeLeaders": {"name": "LeBron James", "points": 31},
                        "awayLeaders": {"name": "Stephen Curry", "points": 29}
                    }
                }]
            }
        })
    }

    #[test]
    fn today_lists_games_with_leaders() {
        let out = render_today(&sample_scoreboard(), "2025-11-04");
        assert!(out.starts_with("NBA Games for 2025-11-03:\n\n"));
        assert!(out.contains("Game ID: 0022500001\n"));
        assert!(out.contains("Warriors (105) @ Lakers (110)\n"));
        assert!(out.contains("Status: Final\n"));
        assert!(out.contains("Period: Q4\n"));
        assert!(out.contains("  Lakers Leader: LeBron James (31 PTS)\n"));
        assert!(out.contains("  Warriors Leader: Stephen Curry (29 PTS)\n"));
    }

    #[test]
    fn today_defaults_missing_fields() {
        let data = json!({"scoreboard": {"games": [{"period": 0, "homeTeam": {"score": 0}}]}});
        let out = render_today(&data, "2025-11-04");
        assert!(out.starts_with("NBA Games for 2025-11-04:"));
        assert!(out.contains("Away Team (0) @ Home Team (0)"));
        assert!(out.contains("Status: Unknown"));
        assert!(!out.contains("Period:"));
    }

    #[test]
    fn today_without_games_or_scoreboard() {
        let none = json!({"scoreboard": {"gameDate": "2025-07-01", "games": []}});
        assert_eq!(render_today(&none, "x"), "No games scheduled for 2025-07-01.");
        assert_eq!(render_today(&json!({}), "x"), "No scoreboard data available.");
        assert_eq!(
            render_today(&json!({"scoreboard": {}}), "x"),
            "No scoreboard data available."
        );
    }

    #[test]
    fn by_date_renders_each_game() {
        let out = render_by_date(&sample_scoreboard(), "2025-11-03");
        assert_eq!(
            out,
            "NBA Games for 2025-11-03:\n\nGame ID: 0022500001\nWarriors (105) @ Lakers (110)\nStatus: Final\n\n"
        );
        assert_eq!(render_by_date(&json!({}), "2025-11-03"), "No games found for 2025-11-03.");
    }

    #[test]
    fn game_details_shows_team_statistics() {
        let data = sample_scoreboard();
        let out = render_game_details(Some(&data), "0022500001");
        assert!(out.starts_with("Game Details for 0022500001:\n\nWarriors @ Lakers\nScore: 105 - 110\n"));
        assert!(out.contains("Period: Q4\n\nTeam Statistics:\nWarriors:\n  FG: 38/90\n"));
        assert!(out.contains("  Assists: 30\n\nLakers:\n  FG: 40/85\n  3P: 12/30\n  FT: 18/22\n"));
    }

    #[test]
    fn game_details_not_found() {
        let data = sample_scoreboard();
        let out = render_game_details(Some(&data), "0000000000");
        assert!(out.starts_with("Game 0000000000 not found in today's games."));
        assert!(render_game_details(None, "1").starts_with("Game 1 not found"));
    }
}
