mod box_score;
mod hustle;
mod leaders;
mod players;
mod schedule;
mod scoreboard;
mod standings;
mod team;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ServerHandler, tool, tool_handler, tool_router};

use crate::client::NbaClient;
use crate::convert::truncate_output;

/// Successful text report, capped to the output size limit.
fn text_result(report: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(truncate_output(report))])
}

#[derive(Clone)]
pub struct NbaServer {
    client: NbaClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NbaServer {
    pub fn new(client: NbaClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Get today's NBA games with live scores, status, and real-time updates. Most reliable for current games."
    )]
    async fn get_todays_scoreboard(&self) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_todays_scoreboard");
        scoreboard::today(&self.client).await
    }

    #[tool(description = "Get NBA games for a specific date with scores and status.")]
    async fn get_scoreboard_by_date(
        &self,
        params: Parameters<scoreboard::ScoreboardByDateParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_scoreboard_by_date", date = %params.0.date);
        scoreboard::by_date(&self.client, params.0).await
    }

    #[tool(description = "Get detailed information about a specific game including live stats.")]
    async fn get_game_details(
        &self,
        params: Parameters<scoreboard::GameParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_game_details", game_id = %params.0.game_id);
        scoreboard::game_details(&self.client, params.0).await
    }

    #[tool(
        description = "Get full box score with player-by-player statistics for a specific game. Best for detailed stats."
    )]
    async fn get_box_score(
        &self,
        params: Parameters<scoreboard::GameParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_box_score", game_id = %params.0.game_id);
        box_score::run(&self.client, params.0).await
    }

    #[tool(
        description = "Search for NBA players by name. Returns a list of matching players with IDs."
    )]
    async fn search_players(
        &self,
        params: Parameters<players::SearchPlayersParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "search_players", query = %params.0.query);
        players::search(&self.client, params.0).await
    }

    #[tool(
        description = "Get detailed information about a specific player including bio and career info."
    )]
    async fn get_player_info(
        &self,
        params: Parameters<players::PlayerParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_player_info", player_id = %params.0.player_id);
        players::info(&self.client, params.0).await
    }

    #[tool(description = "Get player statistics for a specific season.")]
    async fn get_player_season_stats(
        &self,
        params: Parameters<players::PlayerSeasonParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_player_season_stats", player_id = %params.0.player_id);
        players::season_stats(&self.client, params.0).await
    }

    #[tool(
        description = "Get comprehensive career statistics for a player including total points, games, averages, and more."
    )]
    async fn get_player_career_stats(
        &self,
        params: Parameters<players::PlayerParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_player_career_stats", player_id = %params.0.player_id);
        players::career_stats(&self.client, params.0).await
    }

    #[tool(
        description = "Get hustle statistics including deflections, charges drawn, screen assists, loose balls recovered, and box outs."
    )]
    async fn get_player_hustle_stats(
        &self,
        params: Parameters<players::PlayerSeasonParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_player_hustle_stats", player_id = %params.0.player_id);
        hustle::player_hustle(&self.client, params.0).await
    }

    #[tool(
        description = "Get league leaders in hustle stats categories (deflections, charges, screen assists, loose balls, box outs)."
    )]
    async fn get_league_hustle_leaders(
        &self,
        params: Parameters<hustle::HustleLeadersParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_league_hustle_leaders");
        hustle::league_leaders(&self.client, params.0).await
    }

    #[tool(
        description = "Get defensive impact statistics showing opponent field goal percentage when defended by this player."
    )]
    async fn get_player_defense_stats(
        &self,
        params: Parameters<players::PlayerSeasonParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_player_defense_stats", player_id = %params.0.player_id);
        hustle::defense(&self.client, params.0).await
    }

    #[tool(
        description = "Get all-time career leaders across NBA history for any stat category (points, rebounds, assists, etc.)."
    )]
    async fn get_all_time_leaders(
        &self,
        params: Parameters<leaders::AllTimeLeadersParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_all_time_leaders");
        leaders::all_time(&self.client, params.0).await
    }

    #[tool(description = "Get list of all NBA teams with IDs, names, and basic info.")]
    async fn get_all_teams(&self) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_all_teams");
        Ok(text_result(team::render_all_teams()))
    }

    #[tool(description = "Get current roster for a specific NBA team.")]
    async fn get_team_roster(
        &self,
        params: Parameters<team::RosterParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_team_roster", team_id = %params.0.team_id);
        team::roster(&self.client, params.0).await
    }

    #[tool(description = "Get current NBA standings for all teams.")]
    async fn get_standings(
        &self,
        params: Parameters<standings::StandingsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_standings");
        standings::run(&self.client, params.0).await
    }

    #[tool(
        description = "Get statistical leaders across the league for a specific stat category."
    )]
    async fn get_league_leaders(
        &self,
        params: Parameters<leaders::LeagueLeadersParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_league_leaders");
        leaders::league(&self.client, params.0).await
    }

    #[tool(
        description = "Get upcoming NBA games schedule for a specific team. Shows future games with dates, times, locations, and opponent info."
    )]
    async fn get_schedule(
        &self,
        params: Parameters<schedule::ScheduleParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(tool = "get_schedule", team_id = %params.0.team_id);
        schedule::run(&self.client, params.0).await
    }
}

#[tool_handler]
impl ServerHandler for NbaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: Some(false) }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "nba-mcp-rs".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "NBA stats tools. Use search_players or get_all_teams to find IDs, \
                 and get_todays_scoreboard to find game IDs."
                    .into(),
            ),
            ..Default::default()
        }
    }
}
