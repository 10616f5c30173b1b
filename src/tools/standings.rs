use rmcp::model::{CallToolResult, ErrorData};
use rmcp::schemars;
use serde::Deserialize;
use serde_json::Value;

use super::text_result;
use crate::access::{ResultSet, at, text};
use crate::client::NbaClient;
use crate::convert::{format_stat, numeric};
use crate::error::domain_error;
use crate::season;

#[derive(Deserialize, schemars::JsonSchema)]
pub struct StandingsParams {
    #[serde(default)]
    #[schemars(
        description = "Season in format YYYY-YY (e.g., '2024-25'). Defaults to current season."
    )]
    pub season: Option<String>,
}

pub async fn run(client: &NbaClient, params: StandingsParams) -> Result<CallToolResult, ErrorData> {
    let season = match season::resolve(params.season.as_deref()) {
        Ok(s) => s,
        Err(msg) => return Ok(domain_error(msg)),
    };
    let request = [
        ("LeagueID", "00"),
        ("Season", season.as_str()),
        ("SeasonType", "Regular Season"),
    ];
    let Ok(data) = client.stats("leaguestandingsv3", &request).await else {
        return Ok(domain_error("Error fetching standings. Please try again."));
    };
    Ok(text_result(render_standings(&data, &season)))
}

pub fn render_standings(data: &Value, season: &str) -> String {
    let set = ResultSet::at(data, 0);
    if set.rows().is_empty() {
        return "No standings found.".into();
    }
    let conference = set.column_or("Conference", 5);
    let rank = set.column_or("PlayoffRank", 6);
    let name = set.column_or("TeamName", 4);
    let wins = set.column_or("WINS", 13);
    let losses = set.column_or("LOSSES", 14);
    let pct = set.column_or("WinPCT", 15);

    let (mut east, mut west): (Vec<&Value>, Vec<&Value>) = set
        .rows()
        .iter()
        .partition(|row| at!(row, conference).and_then(Value::as_str) == Some("East"));
    let seed = |row: &&Value| at!(row, rank).and_then(numeric).unwrap_or(99.0);
    east.sort_by(|a, b| seed(a).total_cmp(&seed(b)));
    west.sort_by(|a, b| seed(a).total_cmp(&seed(b)));

    let mut out = format!("NBA Standings ({season}):\n\n");
    for (title, teams) in [("Eastern Conference", &east), ("Western Conference", &west)] {
        if title.starts_with("Western") {
            out.push('\n');
        }
        out.push_str(&format!("{title}:\n"));
        for (i, team) in teams.iter().enumerate() {
            out.push_str(&format!(
                "{}. {}: {}-{} ({})\n",
                i + 1,
                text(at!(team, name)),
                text(at!(team, wins)),
                text(at!(team, losses)),
                format_stat(at!(team, pct), false),
            ));
        }
    }
    out
}
