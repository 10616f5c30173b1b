use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use rmcp::model::{CallToolResult, ErrorData};
use rmcp::schemars;
use serde::Deserialize;
use serde_json::Value;

use super::text_result;
use crate::access::{at, items, text};
use crate::client::NbaClient;
use crate::error::domain_error;
use crate::teams;

const SCHEDULE_PATH: &str = "scheduleLeagueV2.json";
const DEFAULT_DAYS_AHEAD: i64 = 7;
const MAX_DAYS_AHEAD: i64 = 90;

#[derive(Deserialize, schemars::JsonSchema)]
pub struct ScheduleParams {
    #[serde(default)]
    #[schemars(description = "NBA team ID (use get_all_teams to find IDs)")]
    pub team_id: String,

    #[serde(default)]
    #[schemars(description = "Number of days ahead to look (default: 7, max: 90)")]
    pub days_ahead: Option<i64>,
}

pub async fn run(client: &NbaClient, params: ScheduleParams) -> Result<CallToolResult, ErrorData> {
    let raw_id = params.team_id.trim();
    if raw_id.is_empty() {
        return Ok(domain_error(
            "Please specify a team_id to get schedule. Use get_all_teams to find team IDs. \
             For today's games, use get_todays_scoreboard instead.",
        ));
    }
    let Ok(team_id) = raw_id.parse::<i64>() else {
        return Ok(domain_error(format!(
            "Invalid team_id '{raw_id}'. Use get_all_teams to find team IDs."
        )));
    };
    let days = params
        .days_ahead
        .unwrap_or(DEFAULT_DAYS_AHEAD)
        .clamp(0, MAX_DAYS_AHEAD);

    let Ok(data) = client.static_data(SCHEDULE_PATH).await else {
        return Ok(domain_error("Error fetching schedule. Please try again."));
    };
    let today = Local::now().date_naive();
    Ok(text_result(render_schedule(&data, team_id, days, today)))
}

/// Eastern wall-clock tip-off. The feed marks EST times with a `Z` suffix.
fn tip_off(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn plays_in(game: &Value, team_id: i64) -> bool {
    ["homeTeam", "awayTeam"]
        .iter()
        .any(|side| at!(game, *side, "teamId").and_then(Value::as_i64) == Some(team_id))
}

pub fn render_schedule(data: &Value, team_id: i64, days: i64, today: NaiveDate) -> String {
    let game_dates = items(at!(data, "leagueSchedule", "gameDates"));
    if game_dates.is_empty() {
        return "No schedule data available.".into();
    }

    let mut upcoming: Vec<(NaiveDateTime, &Value)> = game_dates
        .iter()
        .flat_map(|entry| items(at!(entry, "games")))
        .filter(|game| plays_in(game, team_id))
        .filter_map(|game| {
            let when = at!(game, "gameDateTimeEst")
                .and_then(Value::as_str)
                .and_then(tip_off)?;
            let days_until = (when.date() - today).num_days();
            (0..=days).contains(&days_until).then_some((when, game))
        })
        .collect();
    upcoming.sort_by_key(|(when, _)| *when);

    if upcoming.is_empty() {
        return format!("No upcoming games found within the next {days} days for this team.");
    }

    let team_name = teams::team_name(team_id)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Team {team_id}"));
    let mut out = format!("Upcoming Games for {team_name}:\n(Next {days} days)\n\n");
    for (when, game) in upcoming {
        let side = |key: &str| {
            format!(
                "{} {}",
                text(at!(game, key, "teamCity")),
                text(at!(game, key, "teamName"))
            )
        };
        out.push_str(&format!(
            "{} at {} ET\n  {} @ {}\n  {}, {}, {}\n  Game ID: {}\n\n",
            when.format("%A, %B %d, %Y"),
            when.format("%I:%M %p"),
            side("awayTeam"),
            side("homeTeam"),
            text(at!(game, "arenaName")),
            text(at!(game, "arenaCity")),
            text(at!(game, "arenaState")),
            text(at!(game, "gameId")),
        ));
    }
    out
}
