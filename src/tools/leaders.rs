use rmcp::model::{CallToolResult, ErrorData};
use rmcp::schemars;
use serde::Deserialize;
use serde_json::Value;

use super::text_result;
use crate::access::{ResultSet, at, text, text_or};
use crate::client::NbaClient;
use crate::convert::{format_number, format_percent, format_stat, numeric};
use crate::error::domain_error;
use crate::models::{self, AllTimeStat};
use crate::season;

const TOP_N: usize = 10;
const DEFAULT_ALL_TIME_LIMIT: i64 = 10;
const MAX_ALL_TIME_LIMIT: i64 = 50;

#[derive(Deserialize, schemars::JsonSchema)]
pub struct LeagueLeadersParams {
    #[serde(default)]
    #[schemars(
        description = "Stat to rank by: Points, Assists, Rebounds, Steals, Blocks, FG%, 3P%, FT%. Defaults to Points."
    )]
    pub stat_type: Option<String>,

    #[serde(default)]
    #[schemars(
        description = "Season in format YYYY-YY (e.g., '2024-25'). Defaults to current season."
    )]
    pub season: Option<String>,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub struct AllTimeLeadersParams {
    #[serde(default)]
    #[schemars(
        description = "Stat category, e.g. points, rebounds, assists, steals, blocks, games, three_pointers_made, field_goal_pct. Defaults to points."
    )]
    pub stat_category: Option<String>,

    #[serde(default)]
    #[schemars(description = "Number of leaders to return (1-50, default: 10)")]
    pub limit: Option<i64>,
}

pub async fn league(
    client: &NbaClient,
    params: LeagueLeadersParams,
) -> Result<CallToolResult, ErrorData> {
    let stat_type = params
        .stat_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Points");
    let season = match season::resolve(params.season.as_deref()) {
        Ok(s) => s,
        Err(msg) => return Ok(domain_error(msg)),
    };
    let code = models::leader_code(stat_type);

    let request = [
        ("LeagueID", "00"),
        ("Season", season.as_str()),
        ("SeasonType", "Regular Season"),
        ("PlayerOrTeam", "P"),
        ("Sorter", code),
        ("Direction", "DESC"),
    ];
    let Ok(data) = client.stats("leaguegamelog", &request).await else {
        return Ok(domain_error("Error fetching league leaders. Please try again."));
    };
    Ok(text_result(render_league_leaders(
        &data, stat_type, code, &season,
    )))
}

pub async fn all_time(
    client: &NbaClient,
    params: AllTimeLeadersParams,
) -> Result<CallToolResult, ErrorData> {
    let key = params
        .stat_category
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or("points")
        .to_lowercase();
    let Some(stat) = models::all_time_stat(&key) else {
        return Ok(domain_error(format!(
            "Invalid stat category. Choose from: {}",
            models::all_time_keys()
        )));
    };
    let limit = params.limit.unwrap_or(DEFAULT_ALL_TIME_LIMIT);
    if limit < 1 {
        return Ok(domain_error("limit must be at least 1"));
    }
    let top = limit.min(MAX_ALL_TIME_LIMIT).to_string();

    let request = [
        ("LeagueID", "00"),
        ("PerMode", "Totals"),
        ("SeasonType", "Regular Season"),
        ("TopX", top.as_str()),
    ];
    let Ok(data) = client.stats("alltimeleadersgrids", &request).await else {
        return Ok(domain_error("Error fetching all-time leaders. Please try again."));
    };
    Ok(text_result(render_all_time(&data, stat)))
}

struct PlayerTotals {
    name: String,
    team: String,
    total: f64,
    games: u32,
}

/// Aggregates per-game log rows into per-player averages, best first.
pub fn render_league_leaders(data: &Value, stat_type: &str, code: &str, season: &str) -> String {
    let set = ResultSet::at(data, 0);
    if set.rows().is_empty() || !set.has_headers() {
        return format!("No data found for {stat_type} leaders.");
    }
    let Some(stat_col) = set.column(code) else {
        return format!("Stat category {stat_type} not found in data.");
    };
    let id_col = set.column_or("PLAYER_ID", 1);
    let name_col = set.column_or("PLAYER_NAME", 2);
    let team_col = set.column_or("TEAM_ABBREVIATION", 4);

    // insertion order keeps ties in log order after the stable sort
    let mut players: Vec<(String, PlayerTotals)> = Vec::new();
    for row in set.rows() {
        let id = text(at!(row, id_col));
        let index = match players.iter().position(|(pid, _)| *pid == id) {
            Some(i) => i,
            None => {
                players.push((
                    id,
                    PlayerTotals {
                        name: text(at!(row, name_col)),
                        team: text(at!(row, team_col)),
                        total: 0.0,
                        games: 0,
                    },
                ));
                players.len() - 1
            }
        };
        let entry = &mut players[index].1;
        match at!(row, stat_col) {
            None => entry.games += 1,
            Some(value) => {
                if let Some(n) = numeric(value) {
                    entry.total += n;
                    entry.games += 1;
                }
            }
        }
    }

    let mut ranked: Vec<(f64, PlayerTotals)> = players
        .into_iter()
        .map(|(_, p)| p)
        .filter(|p| p.games > 0)
        .map(|p| (p.total / f64::from(p.games), p))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    let percentage = models::is_percentage_code(code);
    let mut out = format!("League Leaders - {stat_type} ({season}):\n\n");
    for (rank, (avg, player)) in ranked.iter().take(TOP_N).enumerate() {
        let shown = if percentage {
            format_percent(*avg)
        } else {
            format!("{avg:.1}")
        };
        out.push_str(&format!(
            "{}. {} ({}): {shown} | GP: {}\n",
            rank + 1,
            player.name,
            player.team,
            player.games,
        ));
    }
    out
}

pub fn render_all_time(data: &Value, stat: &AllTimeStat) -> String {
    let Some(set) = ResultSet::named(data, stat.result_set).filter(|s| !s.rows().is_empty()) else {
        return format!("No all-time leaders found for {}.", stat.key);
    };
    let name_col = set.column_or("PLAYER_NAME", 1);
    let value_col = set.column_or(stat.result_set.trim_end_matches("Leaders"), 2);
    let active_col = set
        .column("IS_ACTIVE_FLAG")
        .or_else(|| set.column("IS_ACTIVE"))
        .unwrap_or(4);

    let mut any_active = false;
    let mut out = format!("All-Time Career Leaders - {}:\n\n", stat.title());
    for (rank, row) in set.rows().iter().enumerate() {
        let value = at!(row, value_col);
        let shown = if stat.is_percentage() {
            format_stat(value, true)
        } else {
            match value.and_then(numeric) {
                Some(n) => format_number(n as i64),
                None => text_or(value, "0"),
            }
        };
        let active = at!(row, active_col).and_then(numeric) == Some(1.0);
        any_active |= active;
        out.push_str(&format!(
            "{}. {}: {shown}{}\n",
            rank + 1,
            text_or(at!(row, name_col), "Unknown"),
            if active { " ✓" } else { "" },
        ));
    }
    if any_active {
        out.push_str("\n✓ = Active player");
    }
    out
}
