use rmcp::model::{CallToolResult, ErrorData};
use rmcp::schemars;
use serde::Deserialize;
use serde_json::Value;

use super::text_result;
use crate::access::{ResultSet, at, text};
use crate::client::NbaClient;
use crate::error::domain_error;
use crate::season;
use crate::teams;

#[derive(Deserialize, schemars::JsonSchema)]
pub struct RosterParams {
    #[schemars(description = "NBA team ID (use get_all_teams to find IDs)")]
    pub team_id: String,

    #[serde(default)]
    #[schemars(
        description = "Season in format YYYY-YY (e.g., '2024-25'). Defaults to current season."
    )]
    pub season: Option<String>,
}

pub fn render_all_teams() -> String {
    let mut out = String::from("NBA Teams:\n\n");
    for (id, name) in teams::sorted_by_name() {
        out.push_str(&format!("ID: {id} | {name}\n"));
    }
    out
}

pub async fn roster(client: &NbaClient, params: RosterParams) -> Result<CallToolResult, ErrorData> {
    let team_id = params.team_id.trim();
    if team_id.is_empty() {
        return Ok(domain_error("team_id must be non-empty"));
    }
    let season = match season::resolve(params.season.as_deref()) {
        Ok(s) => s,
        Err(msg) => return Ok(domain_error(msg)),
    };
    let request = [("TeamID", team_id), ("Season", season.as_str())];
    let Ok(data) = client.stats("commonteamroster", &request).await else {
        return Ok(domain_error("Error fetching roster. Please try again."));
    };
    Ok(text_result(render_roster(&data, &season)))
}

pub fn render_roster(data: &Value, season: &str) -> String {
    let set = ResultSet::at(data, 0);
    if set.rows().is_empty() {
        return "No roster found for this team.".into();
    }
    let col = |name: &str, fallback: usize| set.column_or(name, fallback);
    let (player, num, position) = (col("PLAYER", 3), col("NUM", 4), col("POSITION", 5));
    let (height, weight) = (col("HEIGHT", 6), col("WEIGHT", 7));
    let (exp, age) = (col("EXP", 8), col("AGE", 9));

    let mut out = format!("Team Roster ({season}):\n\n");
    for row in set.rows() {
        out.push_str(&format!(
            "#{} {} - {}\n   Height: {} | Weight: {} lbs | Age: {} | Exp: {}\n",
            text(at!(row, num)),
            text(at!(row, player)),
            text(at!(row, position)),
            text(at!(row, height)),
            text(at!(row, weight)),
            text(at!(row, age)),
            text(at!(row, exp)),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn all_teams_sorted_by_name() {
        let out = render_all_teams();
        assert!(out.starts_with("NBA Teams:\n\nID: 1610612737 | Atlanta Hawks\n"));
        assert!(out.ends_with("ID: 1610612764 | Washington Wizards\n"));
        assert_eq!(out.lines().filter(|l| l.starts_with("ID: ")).count(), 30);
    }

    #[test]
    fn roster_by_fixed_offsets() {
        let data = json!({"resultSets": [{"rowSet": [
            [1610612747, "2024", "00", "LeBron James", "23", "F", "6-9", "250", "21", 40.0]
        ]}]});
        assert_eq!(
            render_roster(&data, "2024-25"),
            "Team Roster (2024-25):\n\n#23 LeBron James - F\n   Height: 6-9 | Weight: 250 lbs | Age: 40.0 | Exp: 21\n"
        );
    }

    #[test]
    fn roster_prefers_headers() {
        let data = json!({"resultSets": [{
            "headers": ["PLAYER", "NUM", "POSITION"],
            "rowSet": [["Austin Reaves", "15", "G"]]
        }]});
        let out = render_roster(&data, "2024-25");
        assert!(out.contains("#15 Austin Reaves - G\n"));
        assert!(out.contains("Height: N/A"));
    }

    #[test]
    fn empty_roster() {
        assert_eq!(
            render_roster(&json!({"resultSets": [{"rowSet": []}]}), "2024-25"),
            "No roster found for this team."
        );
    }
}
