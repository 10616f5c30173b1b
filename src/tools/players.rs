use rmcp::model::{CallToolResult, ErrorData};
use rmcp::schemars;
use serde::Deserialize;
use serde_json::Value;

use super::text_result;
use crate::access::{ResultSet, at, display, text};
use crate::client::NbaClient;
use crate::convert::{format_number, format_percent, format_stat, numeric};
use crate::error::domain_error;
use crate::season;

const MAX_SEARCH_RESULTS: usize = 20;

#[derive(Deserialize, schemars::JsonSchema)]
pub struct SearchPlayersParams {
    #[schemars(
        description = "Player name or partial name to search for (e.g., 'LeBron', 'Curry')"
    )]
    pub query: String,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub struct PlayerParams {
    #[schemars(description = "NBA player ID")]
    pub player_id: String,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub struct PlayerSeasonParams {
    #[schemars(description = "NBA player ID")]
    pub player_id: String,

    #[serde(default)]
    #[schemars(
        description = "Season in format YYYY-YY (e.g., '2024-25'). Defaults to current season."
    )]
    pub season: Option<String>,
}

impl PlayerSeasonParams {
    /// Trimmed player id and resolved season, or a message for the caller.
    pub fn validate(&self) -> Result<(&str, String), String> {
        let player_id = self.player_id.trim();
        if player_id.is_empty() {
            return Err("player_id must be non-empty".into());
        }
        Ok((player_id, season::resolve(self.season.as_deref())?))
    }
}

pub async fn search(
    client: &NbaClient,
    params: SearchPlayersParams,
) -> Result<CallToolResult, ErrorData> {
    let query = params.query.trim();
    if query.is_empty() {
        return Ok(domain_error("query must be non-empty"));
    }

    let season = season::current_season();
    let request = [
        ("LeagueID", "00"),
        ("Season", season.as_str()),
        ("IsOnlyCurrentSeason", "0"),
    ];
    let Ok(data) = client.stats("commonallplayers", &request).await else {
        return Ok(domain_error("Error fetching player data. Please try again."));
    };
    Ok(text_result(render_search(&data, query)))
}

pub async fn info(client: &NbaClient, params: PlayerParams) -> Result<CallToolResult, ErrorData> {
    let player_id = params.player_id.trim();
    if player_id.is_empty() {
        return Ok(domain_error("player_id must be non-empty"));
    }
    let Ok(data) = client
        .stats("commonplayerinfo", &[("PlayerID", player_id)])
        .await
    else {
        return Ok(domain_error("Error fetching player info. Please try again."));
    };
    Ok(text_result(render_info(&data)))
}

pub async fn season_stats(
    client: &NbaClient,
    params: PlayerSeasonParams,
) -> Result<CallToolResult, ErrorData> {
    let (player_id, season) = match params.validate() {
        Ok(v) => v,
        Err(msg) => return Ok(domain_error(msg)),
    };
    let request = [
        ("PlayerID", player_id),
        ("Season", season.as_str()),
        ("SeasonType", "Regular Season"),
    ];
    let Ok(data) = client
        .stats("playerdashboardbyyearoveryear", &request)
        .await
    else {
        return Ok(domain_error("Error fetching player stats. Please try again."));
    };
    Ok(text_result(render_season_stats(&data, &season)))
}

pub async fn career_stats(
    client: &NbaClient,
    params: PlayerParams,
) -> Result<CallToolResult, ErrorData> {
    let player_id = params.player_id.trim();
    if player_id.is_empty() {
        return Ok(domain_error("player_id must be non-empty"));
    }
    let request = [("PlayerID", player_id), ("PerMode", "Totals")];
    let Ok(data) = client.stats("playercareerstats", &request).await else {
        return Ok(domain_error("Error fetching career stats. Please try again."));
    };
    Ok(text_result(render_career_stats(&data)))
}

pub fn render_search(data: &Value, query: &str) -> String {
    let set = ResultSet::at(data, 0);
    if set.rows().is_empty() {
        return "No players found.".into();
    }
    let id_col = set.column_or("PERSON_ID", 0);
    let name_col = set.column_or("DISPLAY_FIRST_LAST", 2);
    let status_col = set.column_or("ROSTERSTATUS", 3);

    let needle = query.to_lowercase();
    let matches: Vec<&Value> = set
        .rows()
        .iter()
        .filter(|row| at!(row, name_col).is_some_and(|n| display(n).to_lowercase().contains(&needle)))
        .collect();

    if matches.is_empty() {
        return format!("No players found matching '{query}'.");
    }

    let mut out = format!("Found {} player(s):\n\n", matches.len());
    for row in matches.iter().take(MAX_SEARCH_RESULTS) {
        // rows without a roster status column count as active
        let active = at!(row, status_col).is_none_or(|s| numeric(s) == Some(1.0));
        out.push_str(&format!(
            "ID: {} | Name: {} | Status: {}\n",
            text(at!(row, id_col)),
            text(at!(row, name_col)),
            if active { "Active" } else { "Inactive" },
        ));
    }
    if matches.len() > MAX_SEARCH_RESULTS {
        out.push_str(&format!(
            "\n... and {} more. Try a more specific search.",
            matches.len() - MAX_SEARCH_RESULTS
        ));
    }
    out
}

fn non_empty(value: &&Value) -> bool {
    value.as_array().is_none_or(|a| !a.is_empty())
}

pub fn render_info(data: &Value) -> String {
    let Some(row) = at!(data, "resultSets", 0, "rowSet", 0).filter(non_empty) else {
        return "Player not found.".into();
    };
    let field = |i: usize| text(at!(row, i));
    format!(
        "Player Information:\n\n\
         Name: {}\n\
         Jersey: #{}\n\
         Position: {}\n\
         Height: {}\n\
         Weight: {} lbs\n\
         Birth Date: {}\n\
         Country: {}\n\
         School: {}\n\
         Draft Year: {}\n\
         Draft Round: {}\n\
         Draft Number: {}\n\
         Team: {}\n",
        field(3),
        field(13),
        field(14),
        field(10),
        field(11),
        field(6),
        field(8),
        field(7),
        field(27),
        field(28),
        field(29),
        field(18),
    )
}

pub fn render_season_stats(data: &Value, season: &str) -> String {
    let Some(row) = at!(data, "resultSets", 0, "rowSet", 0).filter(non_empty) else {
        return format!("No stats found for season {season}.");
    };
    let avg = |i: usize| format_stat(at!(row, i), false);
    let pct = |i: usize| format_stat(at!(row, i), true);
    format!(
        "Season Stats ({season}):\n\n\
         Games Played: {}\n\
         Minutes Per Game: {}\n\
         Points Per Game: {}\n\
         Rebounds Per Game: {}\n\
         Assists Per Game: {}\n\
         Steals Per Game: {}\n\
         Blocks Per Game: {}\n\
         FG%: {}\n\
         3P%: {}\n\
         FT%: {}\n",
        text(at!(row, 3)),
        avg(8),
        avg(26),
        avg(18),
        avg(19),
        avg(21),
        avg(22),
        pct(9),
        pct(12),
        pct(15),
    )
}

// playercareerstats SeasonTotalsRegularSeason offsets
const GP: usize = 6;
const MIN: usize = 8;
const FGM: usize = 9;
const FGA: usize = 10;
const FG3M: usize = 12;
const FG3A: usize = 13;
const FTM: usize = 15;
const FTA: usize = 16;
const REB: usize = 20;
const AST: usize = 21;
const STL: usize = 22;
const BLK: usize = 23;
const PTS: usize = 26;

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

pub fn render_career_stats(data: &Value) -> String {
    let set = ResultSet::at(data, 0);
    if set.rows().is_empty() {
        return "No career stats found for this player.".into();
    }
    let rows: Vec<&Value> = set
        .rows()
        .iter()
        .filter(|row| row.as_array().is_some_and(|cols| cols.len() > PTS))
        .collect();

    let total = |col: usize| -> f64 {
        rows.iter()
            .map(|row| at!(row, col).and_then(numeric).unwrap_or(0.0))
            .sum()
    };
    let games = total(GP);
    let points = total(PTS);
    let rebounds = total(REB);
    let assists = total(AST);
    let whole = |n: f64| format_number(n as i64);

    format!(
        "Career Statistics (Regular Season):\n\n\
         Total Points: {}\n\
         Games Played: {}\n\
         Total Rebounds: {}\n\
         Total Assists: {}\n\
         Total Steals: {}\n\
         Total Blocks: {}\n\
         Total Minutes: {}\n\n\
         Career Averages:\n\
         Points Per Game: {:.1}\n\
         Rebounds Per Game: {:.1}\n\
         Assists Per Game: {:.1}\n\n\
         Shooting Percentages:\n\
         FG%: {}\n\
         3P%: {}\n\
         FT%: {}\n",
        whole(points),
        whole(games),
        whole(rebounds),
        whole(assists),
        whole(total(STL)),
        whole(total(BLK)),
        whole(total(MIN)),
        ratio(points, games),
        ratio(rebounds, games),
        ratio(assists, games),
        format_percent(ratio(total(FGM), total(FGA))),
        format_percent(ratio(total(FG3M), total(FG3A))),
        format_percent(ratio(total(FTM), total(FTA))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn all_players() -> Value {
        json!({"resultSets": [{
            "headers": ["PERSON_ID", "DISPLAY_LAST_COMMA_FIRST", "DISPLAY_FIRST_LAST", "ROSTERSTATUS"],
            "rowSet": [
                [2544, "James, LeBron", "LeBron James", 1],
                [201939, "Curry, Stephen", "Stephen Curry", 1],
                [977, "Bryant, Kobe", "Kobe Bryant", 0],
                [1628398, "Curry, Seth", "Seth Curry", 0]
            ]
        }]})
    }

    #[test]
    fn search_is_case_insensitive() {
        let out = render_search(&all_players(), "CURRY");
        assert!(out.starts_with("Found 2 player(s):\n\n"));
        assert!(out.contains("ID: 201939 | Name: Stephen Curry | Status: Active\n"));
        assert!(out.contains("ID: 1628398 | Name: Seth Curry | Status: Inactive\n"));
    }

    #[test]
    fn search_without_match() {
        assert_eq!(
            render_search(&all_players(), "Jordan"),
            "No players found matching 'Jordan'."
        );
        assert_eq!(render_search(&json!({}), "x"), "No players found.");
    }

    #[test]
    fn search_caps_results() {
        let rows: Vec<Value> = (0..25)
            .map(|i| json!([i, "Smith, X", format!("Player Smith {i}"), 1]))
            .collect();
        let data = json!({"resultSets": [{"rowSet": rows}]});
        let out = render_search(&data, "smith");
        assert!(out.starts_with("Found 25 player(s):"));
        assert_eq!(out.matches("ID: ").count(), 20);
        assert!(out.ends_with("... and 5 more. Try a more specific search."));
    }

    #[test]
    fn info_renders_bio() {
        let mut row = vec![Value::Null; 30];
        row[3] = json!("LeBron James");
        row[6] = json!("1984-12-30T00:00:00");
        row[10] = json!("6-9");
        row[11] = json!("250");
        row[13] = json!("23");
        row[14] = json!("Forward");
        row[18] = json!("Lakers");
        row[27] = json!("2003");
        let data = json!({"resultSets": [{"rowSet": [row]}]});

        let out = render_info(&data);
        assert!(out.contains("Name: LeBron James\n"));
        assert!(out.contains("Jersey: #23\n"));
        assert!(out.contains("Weight: 250 lbs\n"));
        assert!(out.contains("School: N/A\n"));
        assert!(out.contains("Team: Lakers\n"));
        assert_eq!(render_info(&json!({"resultSets": [{"rowSet": []}]})), "Player not found.");
    }

    #[test]
    fn season_stats_formats_averages_and_percentages() {
        let mut row = vec![json!(0); 27];
        row[3] = json!(71);
        row[8] = json!(35.3);
        row[9] = json!(0.54);
        row[26] = json!(25.7);
        let data = json!({"resultSets": [{"rowSet": [row]}]});

        let out = render_season_stats(&data, "2023-24");
        assert!(out.starts_with("Season Stats (2023-24):\n\n"));
        assert!(out.contains("Games Played: 71\n"));
        assert!(out.contains("Minutes Per Game: 35.3\n"));
        assert!(out.contains("Points Per Game: 25.7\n"));
        assert!(out.contains("FG%: 54.0%\n"));
        assert_eq!(
            render_season_stats(&json!({}), "2023-24"),
            "No stats found for season 2023-24."
        );
    }

    #[test]
    fn career_stats_sum_seasons() {
        let season = |gp: i64, pts: i64, fgm: i64, fga: i64| {
            let mut row = vec![json!(0); 27];
            row[GP] = json!(gp);
            row[PTS] = json!(pts);
            row[FGM] = json!(fgm);
            row[FGA] = json!(fga);
            row[REB] = json!(gp * 5);
            Value::Array(row)
        };
        let data = json!({"resultSets": [{"rowSet": [
            season(80, 2000, 800, 1600),
            season(70, 1500, 600, 1400),
            [1, 2, 3]
        ]}]});

        let out = render_career_stats(&data);
        assert!(out.contains("Total Points: 3,500\n"));
        assert!(out.contains("Games Played: 150\n"));
        assert!(out.contains("Total Rebounds: 750\n"));
        assert!(out.contains("Points Per Game: 23.3\n"));
        assert!(out.contains("Rebounds Per Game: 5.0\n"));
        assert!(out.contains("FG%: 46.7%\n"));
        assert!(out.contains("3P%: 0.0%\n"));
    }

    #[test]
    fn career_stats_without_rows() {
        assert_eq!(
            render_career_stats(&json!({"resultSets": [{"rowSet": []}]})),
            "No career stats found for this player."
        );
    }

    #[test]
    fn season_params_validation() {
        let params = PlayerSeasonParams {
            player_id: " 2544 ".into(),
            season: Some("2023-24".into()),
        };
        assert_eq!(params.validate().unwrap(), ("2544", "2023-24".to_owned()));

        let bad = PlayerSeasonParams {
            player_id: "2544".into(),
            season: Some("23-24".into()),
        };
        assert!(bad.validate().is_err());
    }
}
